//! Membership store abstraction.
//!
//! The store answers set-membership, enumeration, search and counting
//! queries over the account/group relationship and owns the two mutation
//! entry points (add, remove). Query construction is shared:
//!
//! ```text
//! Operations (read_impl.rs, write_impl.rs)
//!     ↓ build an immutable QuerySpec (predicate.rs, search.rs)
//!     ↓ execute one statement    (sqlite/executor.rs)
//! ```
//!
//! Account and group rows themselves are owned by external persistence
//! layers; this component reads them via joins and references them by
//! numeric id.

pub mod config;
pub mod predicate;
pub mod search;
pub mod sqlite;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::{Account, BackendGroup, MembershipType};
use config::StoreConfig;
use predicate::{AccountRef, GroupRef};

/// Supported database backend types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    SQLite,
}

/// Result of a filtered membership removal.
///
/// `Refused` is the safety rail for a removal with neither an account nor a
/// group filter: the statement is never issued, so the table cannot be
/// emptied by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    NothingMatched,
    Refused,
}

/// Connection lifecycle shared by every store implementation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect to the underlying store.
    async fn connect(config: &StoreConfig) -> EngineResult<Self>
    where
        Self: Sized;

    /// Check that the store is reachable.
    async fn health_check(&self) -> EngineResult<()>;

    /// Create tables, constraints and indexes if they do not exist.
    async fn init_schema(&self) -> EngineResult<()>;

    /// Release pooled connections when the store is no longer needed.
    async fn cleanup(&self) -> EngineResult<()> {
        Ok(())
    }
}

/// Read side of the membership contract: lookups, enumeration, search,
/// counting and existence checks. No ordering contract except where noted.
#[async_trait]
pub trait MembershipReader: Backend {
    /// All groups in which the account is an ordinary member, distinct.
    async fn get_user_groups(&self, account: &AccountRef) -> EngineResult<Vec<BackendGroup>>;

    /// All groups in which the account is a group administrator, distinct.
    async fn get_admin_groups(&self, account: &AccountRef) -> EngineResult<Vec<BackendGroup>>;

    /// Members of one group, or of any group when `group` is `None`.
    async fn get_group_members(&self, group: Option<&GroupRef>) -> EngineResult<Vec<Account>>;

    /// Administrators of one group, or of any group when `group` is `None`.
    async fn get_group_admins(&self, group: Option<&GroupRef>) -> EngineResult<Vec<Account>>;

    /// Whether the account is a member of the group, or of at least one
    /// group when `group` is `None`.
    async fn is_member(&self, account: &AccountRef, group: Option<&GroupRef>)
        -> EngineResult<bool>;

    /// Whether the account administers the group, or at least one group
    /// when `group` is `None`.
    async fn is_admin(&self, account: &AccountRef, group: Option<&GroupRef>) -> EngineResult<bool>;

    /// Count of distinct member accounts of the group matching `pattern`
    /// (empty pattern counts every member). Same match semantics as
    /// [`find_members`](Self::find_members).
    async fn count_members(&self, group: &GroupRef, pattern: &str) -> EngineResult<i64>;

    /// Member accounts of the group matching `pattern`, distinct, ordered
    /// by display name ascending, paginated.
    async fn find_members(
        &self,
        group: &GroupRef,
        pattern: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> EngineResult<Vec<Account>>;
}

/// Write side of the membership contract. Mutations take internal ids only;
/// they run after the domain objects were already resolved.
#[async_trait]
pub trait MembershipWriter: Backend {
    /// Insert a member row. Errors with a uniqueness violation when the
    /// triple already exists; existence is never pre-checked.
    async fn add_member(&self, account_id: i64, group_id: i64) -> EngineResult<bool>;

    /// Insert an admin row. Independent of the member role.
    async fn add_admin(&self, account_id: i64, group_id: i64) -> EngineResult<bool>;

    /// Delete exactly the member-role row. `false` when no row existed.
    async fn remove_member(&self, account_id: i64, group_id: i64) -> EngineResult<bool>;

    /// Delete exactly the admin-role row. `false` when no row existed.
    async fn remove_admin(&self, account_id: i64, group_id: i64) -> EngineResult<bool>;

    /// Filtered removal. An absent filter means "any"; with neither an
    /// account nor a group the operation is refused outright.
    async fn remove_memberships(
        &self,
        account_id: Option<i64>,
        group_id: Option<i64>,
        role: Option<MembershipType>,
    ) -> EngineResult<RemovalOutcome>;

    /// Delete every membership row of the group, both roles. Used when the
    /// group itself is being deleted.
    async fn remove_all_group_members(&self, group_id: i64) -> EngineResult<bool>;

    /// Delete every membership row of the account, both roles, across all
    /// groups. Used when the account itself is being deleted.
    async fn remove_all_account_memberships(&self, account_id: i64) -> EngineResult<bool>;
}

/// Combined membership store interface.
pub trait MembershipStore: MembershipReader + MembershipWriter {}

/// Automatic implementation for any type that implements both traits
impl<T> MembershipStore for T where T: MembershipReader + MembershipWriter {}

/// Factory for creating store instances
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store based on configuration
    pub async fn create(config: &StoreConfig) -> EngineResult<Arc<dyn MembershipStore>> {
        match config.database_type {
            DatabaseType::SQLite => {
                let store = sqlite::SqliteMembershipStore::connect(config).await?;
                Ok(Arc::new(store))
            }
        }
    }
}
