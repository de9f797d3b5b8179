use async_trait::async_trait;
use tracing::debug;

use super::{executor, SqliteMembershipStore};
use crate::error::EngineResult;
use crate::models::{Account, BackendGroup, MembershipType};
use crate::store::predicate::{AccountRef, GroupRef, QuerySpec};
use crate::store::search::SearchFilter;
use crate::store::MembershipReader;

#[async_trait]
impl MembershipReader for SqliteMembershipStore {
    async fn get_user_groups(&self, account: &AccountRef) -> EngineResult<Vec<BackendGroup>> {
        self.groups_for(account, MembershipType::User).await
    }

    async fn get_admin_groups(&self, account: &AccountRef) -> EngineResult<Vec<BackendGroup>> {
        self.groups_for(account, MembershipType::Admin).await
    }

    async fn get_group_members(&self, group: Option<&GroupRef>) -> EngineResult<Vec<Account>> {
        self.accounts_in_role(group, MembershipType::User).await
    }

    async fn get_group_admins(&self, group: Option<&GroupRef>) -> EngineResult<Vec<Account>> {
        self.accounts_in_role(group, MembershipType::Admin).await
    }

    async fn is_member(
        &self,
        account: &AccountRef,
        group: Option<&GroupRef>,
    ) -> EngineResult<bool> {
        self.holds_role(account, group, MembershipType::User).await
    }

    async fn is_admin(&self, account: &AccountRef, group: Option<&GroupRef>) -> EngineResult<bool> {
        self.holds_role(account, group, MembershipType::Admin).await
    }

    async fn count_members(&self, group: &GroupRef, pattern: &str) -> EngineResult<i64> {
        let spec = QuerySpec::count_accounts()
            .with_group(group)
            .with_role(MembershipType::User)
            .with_search(SearchFilter::for_pattern(pattern, self.match_mode()));

        executor::count(self.pool(), &spec).await
    }

    async fn find_members(
        &self,
        group: &GroupRef,
        pattern: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> EngineResult<Vec<Account>> {
        debug!(?group, pattern, limit, offset, "searching group members");

        let spec = QuerySpec::accounts()
            .with_group(group)
            .with_role(MembershipType::User)
            .with_search(SearchFilter::for_pattern(pattern, self.match_mode()))
            .ordered_by_display_name()
            .paginate(limit, offset);

        executor::fetch_accounts(self.pool(), &spec).await
    }
}

impl SqliteMembershipStore {
    async fn groups_for(
        &self,
        account: &AccountRef,
        role: MembershipType,
    ) -> EngineResult<Vec<BackendGroup>> {
        let spec = QuerySpec::groups().with_account(account).with_role(role);
        executor::fetch_groups(self.pool(), &spec).await
    }

    async fn accounts_in_role(
        &self,
        group: Option<&GroupRef>,
        role: MembershipType,
    ) -> EngineResult<Vec<Account>> {
        let mut spec = QuerySpec::accounts().with_role(role);
        if let Some(group) = group {
            spec = spec.with_group(group);
        }
        executor::fetch_accounts(self.pool(), &spec).await
    }

    // No group means "holds the role in at least one group".
    async fn holds_role(
        &self,
        account: &AccountRef,
        group: Option<&GroupRef>,
        role: MembershipType,
    ) -> EngineResult<bool> {
        let spec = QuerySpec::exists()
            .with_account_and_group(account, group)
            .with_role(role);
        executor::exists(self.pool(), &spec).await
    }
}
