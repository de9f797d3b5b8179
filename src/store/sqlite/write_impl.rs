use async_trait::async_trait;
use tracing::{debug, warn};

use super::{executor, SqliteMembershipStore};
use crate::error::EngineResult;
use crate::models::MembershipType;
use crate::store::predicate::BindValue;
use crate::store::{MembershipWriter, RemovalOutcome};

#[async_trait]
impl MembershipWriter for SqliteMembershipStore {
    async fn add_member(&self, account_id: i64, group_id: i64) -> EngineResult<bool> {
        self.insert_membership(account_id, group_id, MembershipType::User)
            .await
    }

    async fn add_admin(&self, account_id: i64, group_id: i64) -> EngineResult<bool> {
        self.insert_membership(account_id, group_id, MembershipType::Admin)
            .await
    }

    async fn remove_member(&self, account_id: i64, group_id: i64) -> EngineResult<bool> {
        let outcome = self
            .remove_memberships(Some(account_id), Some(group_id), Some(MembershipType::User))
            .await?;
        Ok(outcome == RemovalOutcome::Removed)
    }

    async fn remove_admin(&self, account_id: i64, group_id: i64) -> EngineResult<bool> {
        let outcome = self
            .remove_memberships(
                Some(account_id),
                Some(group_id),
                Some(MembershipType::Admin),
            )
            .await?;
        Ok(outcome == RemovalOutcome::Removed)
    }

    async fn remove_memberships(
        &self,
        account_id: Option<i64>,
        group_id: Option<i64>,
        role: Option<MembershipType>,
    ) -> EngineResult<RemovalOutcome> {
        if account_id.is_none() && group_id.is_none() {
            // Safety rail: an unfiltered DELETE would empty the table.
            warn!("refusing membership removal without an account or group filter");
            return Ok(RemovalOutcome::Refused);
        }

        let mut sql = String::from("DELETE FROM memberships");
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(account_id) = account_id {
            conditions.push("account_id = ?");
            binds.push(BindValue::Int(account_id));
        }
        if let Some(group_id) = group_id {
            conditions.push("backend_group_id = ?");
            binds.push(BindValue::Int(group_id));
        }
        if let Some(role) = role {
            conditions.push("membership_type = ?");
            binds.push(BindValue::Int(role.as_i64()));
        }

        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));

        debug!(account_id, group_id, ?role, "removing membership rows");

        let removed = executor::execute(self.pool(), &sql, &binds).await?;
        Ok(if removed {
            RemovalOutcome::Removed
        } else {
            RemovalOutcome::NothingMatched
        })
    }

    async fn remove_all_group_members(&self, group_id: i64) -> EngineResult<bool> {
        let outcome = self.remove_memberships(None, Some(group_id), None).await?;
        Ok(outcome == RemovalOutcome::Removed)
    }

    async fn remove_all_account_memberships(&self, account_id: i64) -> EngineResult<bool> {
        let outcome = self
            .remove_memberships(Some(account_id), None, None)
            .await?;
        Ok(outcome == RemovalOutcome::Removed)
    }
}

impl SqliteMembershipStore {
    /// Insert one role row. Duplicate triples fail with a uniqueness
    /// violation; existence is never pre-checked (check-then-act race).
    async fn insert_membership(
        &self,
        account_id: i64,
        group_id: i64,
        role: MembershipType,
    ) -> EngineResult<bool> {
        debug!(account_id, group_id, ?role, "adding membership row");

        let sql = "INSERT INTO memberships (account_id, backend_group_id, membership_type) \
                   VALUES (?, ?, ?)";
        let binds = [
            BindValue::Int(account_id),
            BindValue::Int(group_id),
            BindValue::Int(role.as_i64()),
        ];

        executor::execute(self.pool(), sql, &binds).await
    }
}
