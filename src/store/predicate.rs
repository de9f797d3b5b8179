//! Query specification for membership queries.
//!
//! A [`QuerySpec`] is an immutable value: a projection, a set of predicates
//! and pagination. Joins are never requested directly; each predicate and
//! projection declares the tables it needs and rendering attaches every
//! required join exactly once. Operations build a spec functionally and
//! hand it to the executor.

use super::search::SearchFilter;
use crate::models::MembershipType;

/// A value to bind to a `?` placeholder, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Int(i64),
    Text(String),
}

/// Addressing mode for an account: by external string id or by internal
/// numeric key. No coercion between the two; the internal form is strictly
/// cheaper (no join) and must be preferred when the id is already known.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountRef {
    UserId(String),
    Id(i64),
}

/// Addressing mode for a group, mirroring [`AccountRef`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupRef {
    GroupId(String),
    Id(i64),
}

/// One WHERE fragment. Each shape knows which joined tables it reads.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `a.user_id = ?` — requires the accounts join.
    AccountExternal(String),
    /// `g.group_id = ?` — requires the groups join.
    GroupExternal(String),
    /// Both external ids in a single fragment, resolving both joins in one
    /// pass instead of two sequential restrictions.
    ExternalPair { user_id: String, group_id: String },
    /// `m.account_id = ?` — direct column, no join.
    AccountInternal(i64),
    /// `m.backend_group_id = ?` — direct column, no join.
    GroupInternal(i64),
    /// Both foreign-key columns, no join.
    InternalPair { account_id: i64, group_id: i64 },
    /// `m.membership_type = ?`.
    Role(MembershipType),
    /// Pattern search across identity fields and free-text terms.
    Matches(SearchFilter),
}

/// Which tables beyond `memberships` a rendered query joins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinSet {
    pub accounts: bool,
    pub groups: bool,
    pub terms: bool,
}

impl JoinSet {
    fn union(self, other: JoinSet) -> JoinSet {
        JoinSet {
            accounts: self.accounts || other.accounts,
            groups: self.groups || other.groups,
            terms: self.terms || other.terms,
        }
    }
}

impl Predicate {
    fn joins(&self) -> JoinSet {
        match self {
            Predicate::AccountExternal(_) => JoinSet {
                accounts: true,
                ..JoinSet::default()
            },
            Predicate::GroupExternal(_) => JoinSet {
                groups: true,
                ..JoinSet::default()
            },
            Predicate::ExternalPair { .. } => JoinSet {
                accounts: true,
                groups: true,
                terms: false,
            },
            Predicate::AccountInternal(_)
            | Predicate::GroupInternal(_)
            | Predicate::InternalPair { .. }
            | Predicate::Role(_) => JoinSet::default(),
            Predicate::Matches(_) => JoinSet {
                accounts: true,
                terms: true,
                groups: false,
            },
        }
    }

    fn fragment(&self) -> &'static str {
        match self {
            Predicate::AccountExternal(_) => "a.user_id = ?",
            Predicate::GroupExternal(_) => "g.group_id = ?",
            Predicate::ExternalPair { .. } => "(a.user_id = ? AND g.group_id = ?)",
            Predicate::AccountInternal(_) => "m.account_id = ?",
            Predicate::GroupInternal(_) => "m.backend_group_id = ?",
            Predicate::InternalPair { .. } => "(m.account_id = ? AND m.backend_group_id = ?)",
            Predicate::Role(_) => "m.membership_type = ?",
            Predicate::Matches(filter) => filter.fragment(),
        }
    }

    fn push_binds(&self, binds: &mut Vec<BindValue>) {
        match self {
            Predicate::AccountExternal(user_id) => binds.push(BindValue::Text(user_id.clone())),
            Predicate::GroupExternal(group_id) => binds.push(BindValue::Text(group_id.clone())),
            Predicate::ExternalPair { user_id, group_id } => {
                binds.push(BindValue::Text(user_id.clone()));
                binds.push(BindValue::Text(group_id.clone()));
            }
            Predicate::AccountInternal(id) => binds.push(BindValue::Int(*id)),
            Predicate::GroupInternal(id) => binds.push(BindValue::Int(*id)),
            Predicate::InternalPair {
                account_id,
                group_id,
            } => {
                binds.push(BindValue::Int(*account_id));
                binds.push(BindValue::Int(*group_id));
            }
            Predicate::Role(role) => binds.push(BindValue::Int(role.as_i64())),
            Predicate::Matches(filter) => filter.push_binds(binds),
        }
    }
}

/// What a query returns. The column lists are part of the query contract:
/// domain rows are mapped column by column, never via wildcard select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Distinct group rows.
    Groups,
    /// Distinct account rows.
    Accounts,
    /// `COUNT(DISTINCT a.id)`.
    CountAccounts,
    /// `SELECT 1`, for existence checks.
    One,
}

impl Projection {
    fn select_clause(self) -> &'static str {
        match self {
            Projection::Groups => {
                "SELECT DISTINCT g.id AS g_id, g.group_id AS g_group_id, \
                 g.display_name AS g_display_name, g.backend AS g_backend"
            }
            Projection::Accounts => {
                "SELECT DISTINCT a.id AS a_id, a.user_id AS a_user_id, \
                 a.lower_user_id AS a_lower_user_id, a.display_name AS a_display_name, \
                 a.email AS a_email, a.backend AS a_backend, a.state AS a_state, \
                 a.quota AS a_quota, a.home AS a_home, a.last_login AS a_last_login"
            }
            Projection::CountAccounts => "SELECT COUNT(DISTINCT a.id)",
            Projection::One => "SELECT 1",
        }
    }

    fn joins(self) -> JoinSet {
        match self {
            Projection::Groups => JoinSet {
                groups: true,
                ..JoinSet::default()
            },
            Projection::Accounts | Projection::CountAccounts => JoinSet {
                accounts: true,
                ..JoinSet::default()
            },
            Projection::One => JoinSet::default(),
        }
    }
}

/// Immutable specification of one SELECT over the membership relation.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    projection: Projection,
    predicates: Vec<Predicate>,
    order_by_display_name: bool,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl QuerySpec {
    fn new(projection: Projection) -> Self {
        Self {
            projection,
            predicates: Vec::new(),
            order_by_display_name: false,
            limit: None,
            offset: None,
        }
    }

    pub fn groups() -> Self {
        Self::new(Projection::Groups)
    }

    pub fn accounts() -> Self {
        Self::new(Projection::Accounts)
    }

    pub fn count_accounts() -> Self {
        Self::new(Projection::CountAccounts)
    }

    pub fn exists() -> Self {
        Self::new(Projection::One)
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn with_account(self, account: &AccountRef) -> Self {
        match account {
            AccountRef::UserId(user_id) => self.with(Predicate::AccountExternal(user_id.clone())),
            AccountRef::Id(id) => self.with(Predicate::AccountInternal(*id)),
        }
    }

    pub fn with_group(self, group: &GroupRef) -> Self {
        match group {
            GroupRef::GroupId(group_id) => self.with(Predicate::GroupExternal(group_id.clone())),
            GroupRef::Id(id) => self.with(Predicate::GroupInternal(*id)),
        }
    }

    /// Address an account plus an optional group, collapsing two external
    /// ids into one combined predicate and two internal ids into direct
    /// column predicates.
    pub fn with_account_and_group(self, account: &AccountRef, group: Option<&GroupRef>) -> Self {
        match (account, group) {
            (account, None) => self.with_account(account),
            (AccountRef::UserId(user_id), Some(GroupRef::GroupId(group_id))) => {
                self.with(Predicate::ExternalPair {
                    user_id: user_id.clone(),
                    group_id: group_id.clone(),
                })
            }
            (AccountRef::Id(account_id), Some(GroupRef::Id(group_id))) => {
                self.with(Predicate::InternalPair {
                    account_id: *account_id,
                    group_id: *group_id,
                })
            }
            (account, Some(group)) => self.with_account(account).with_group(group),
        }
    }

    pub fn with_role(self, role: MembershipType) -> Self {
        self.with(Predicate::Role(role))
    }

    pub fn with_search(self, filter: Option<SearchFilter>) -> Self {
        match filter {
            Some(filter) => self.with(Predicate::Matches(filter)),
            None => self,
        }
    }

    pub fn ordered_by_display_name(mut self) -> Self {
        self.order_by_display_name = true;
        self
    }

    pub fn paginate(mut self, limit: Option<i64>, offset: Option<i64>) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Tables the rendered query will join.
    pub fn joins(&self) -> JoinSet {
        self.predicates
            .iter()
            .fold(self.projection.joins(), |set, p| set.union(p.joins()))
    }

    /// Render to SQL with `?` placeholders plus the bind values in order.
    pub fn render(&self) -> (String, Vec<BindValue>) {
        let joins = self.joins();

        let mut sql = String::from(self.projection.select_clause());
        sql.push_str(" FROM memberships m");
        if joins.accounts {
            sql.push_str(" INNER JOIN accounts a ON a.id = m.account_id");
        }
        if joins.groups {
            sql.push_str(" INNER JOIN backend_groups g ON g.id = m.backend_group_id");
        }
        if joins.terms {
            // One row per matching term; DISTINCT in the projection collapses
            // them back to one row per account.
            sql.push_str(" LEFT JOIN account_terms t ON t.account_id = a.id");
        }

        let mut binds = Vec::new();
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            for (i, predicate) in self.predicates.iter().enumerate() {
                if i > 0 {
                    sql.push_str(" AND ");
                }
                sql.push_str(predicate.fragment());
                predicate.push_binds(&mut binds);
            }
        }

        if self.order_by_display_name {
            sql.push_str(" ORDER BY a.display_name ASC, a.id ASC");
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                binds.push(BindValue::Int(limit));
                binds.push(BindValue::Int(offset));
            }
            (Some(limit), None) => {
                sql.push_str(" LIMIT ?");
                binds.push(BindValue::Int(limit));
            }
            (None, Some(offset)) => {
                // SQLite accepts OFFSET only after LIMIT; -1 means unbounded.
                sql.push_str(" LIMIT -1 OFFSET ?");
                binds.push(BindValue::Int(offset));
            }
            (None, None) => {}
        }

        (sql, binds)
    }
}
