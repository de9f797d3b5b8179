use chrono::Utc;
use membership_engine::store::config::StoreConfig;
use membership_engine::store::sqlite::SqliteMembershipStore;
use membership_engine::store::Backend;
use membership_engine::MatchMode;

/// Create an in-memory store with the schema initialized.
pub async fn setup_store() -> SqliteMembershipStore {
    setup_store_with_mode(MatchMode::Medial).await
}

pub async fn setup_store_with_mode(mode: MatchMode) -> SqliteMembershipStore {
    let config = StoreConfig::memory_sqlite().with_match_mode(mode);
    let store = SqliteMembershipStore::connect(&config)
        .await
        .expect("connect in-memory store");
    store.init_schema().await.expect("init schema");
    store
}

/// Insert an account fixture and return its internal id. Account rows are
/// owned by an external persistence layer, so tests write them directly.
pub async fn insert_account(
    store: &SqliteMembershipStore,
    user_id: &str,
    display_name: &str,
    email: Option<&str>,
) -> i64 {
    sqlx::query(
        "INSERT INTO accounts (user_id, lower_user_id, display_name, email, backend, state, home, last_login) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(user_id.to_lowercase())
    .bind(display_name)
    .bind(email)
    .bind("Database")
    .bind(1i64)
    .bind(format!("/home/{}", user_id))
    .bind(Utc::now().timestamp())
    .execute(store.pool())
    .await
    .expect("insert account fixture")
    .last_insert_rowid()
}

/// Insert a group fixture and return its internal id.
pub async fn insert_group(store: &SqliteMembershipStore, group_id: &str) -> i64 {
    sqlx::query("INSERT INTO backend_groups (group_id, display_name, backend) VALUES (?, ?, ?)")
        .bind(group_id)
        .bind(group_id)
        .bind("Database")
        .execute(store.pool())
        .await
        .expect("insert group fixture")
        .last_insert_rowid()
}

/// Attach a free-text search term to an account.
pub async fn insert_term(store: &SqliteMembershipStore, account_id: i64, term: &str) {
    sqlx::query("INSERT INTO account_terms (account_id, term) VALUES (?, ?)")
        .bind(account_id)
        .bind(term)
        .execute(store.pool())
        .await
        .expect("insert term fixture");
}

/// Delete an account row directly, as the external account mapper would.
/// Returns the driver result so tests can assert constraint failures.
pub async fn delete_account(
    store: &SqliteMembershipStore,
    account_id: i64,
) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM accounts WHERE id = ?")
        .bind(account_id)
        .execute(store.pool())
        .await
        .map(|r| r.rows_affected())
}

/// Delete a group row directly, as the external group mapper would.
pub async fn delete_group(
    store: &SqliteMembershipStore,
    group_id: i64,
) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM backend_groups WHERE id = ?")
        .bind(group_id)
        .execute(store.pool())
        .await
        .map(|r| r.rows_affected())
}

/// Count all membership rows, both roles.
pub async fn membership_rows(store: &SqliteMembershipStore) -> i64 {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM memberships")
        .fetch_one(store.pool())
        .await
        .expect("count membership rows");
    count.0
}
