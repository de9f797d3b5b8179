use serde::{Deserialize, Serialize};

/// Projection of one user identity row.
///
/// The membership engine never creates or updates accounts; it reads them
/// through joins and references them by numeric id. The column list fetched
/// for this struct is part of the query contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: String,
    pub lower_user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub backend: String,
    pub state: AccountState,
    pub quota: Option<String>,
    pub home: String,
    /// Unix timestamp of the last login, 0 = never.
    pub last_login: i64,
}

/// Lifecycle state of an account, stored as an INTEGER column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountState {
    Initial,
    Enabled,
    Disabled,
}

impl AccountState {
    pub fn as_i64(self) -> i64 {
        match self {
            AccountState::Initial => 0,
            AccountState::Enabled => 1,
            AccountState::Disabled => 2,
        }
    }
}

impl TryFrom<i64> for AccountState {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountState::Initial),
            1 => Ok(AccountState::Enabled),
            2 => Ok(AccountState::Disabled),
            other => Err(format!("unknown account state: {}", other)),
        }
    }
}

/// Projection of one group identity row, scoped to a provisioning backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendGroup {
    pub id: i64,
    pub group_id: String,
    pub display_name: String,
    pub backend: String,
}

/// Role discriminator on a membership row.
///
/// An account may hold both roles in the same group at once (two rows);
/// the UNIQUE constraint forbids two rows of the same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MembershipType {
    User,
    Admin,
}

impl MembershipType {
    pub fn as_i64(self) -> i64 {
        match self {
            MembershipType::User => 0,
            MembershipType::Admin => 1,
        }
    }
}

impl TryFrom<i64> for MembershipType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MembershipType::User),
            1 => Ok(MembershipType::Admin),
            other => Err(format!("unknown membership type: {}", other)),
        }
    }
}
