use crate::error::{EngineError, EngineResult};
use sqlx::SqlitePool;

/// Initialize the membership schema.
///
/// Creates the accounts, backend_groups, memberships and account_terms
/// tables with the constraints the engine relies on: unique external ids,
/// the unique (account, group, role) triple, and RESTRICT foreign keys so
/// that deleting an account or group with live membership rows fails.
pub async fn init_schema(pool: &SqlitePool) -> EngineResult<()> {
    let accounts_sql = r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE,
            lower_user_id TEXT NOT NULL,
            display_name TEXT NOT NULL,
            email TEXT,
            backend TEXT NOT NULL,
            state INTEGER NOT NULL DEFAULT 0,
            quota TEXT,
            home TEXT NOT NULL,
            last_login INTEGER NOT NULL DEFAULT 0
        )
        "#;

    sqlx::query(accounts_sql)
        .execute(pool)
        .await
        .map_err(|e| EngineError::Database(format!("Failed to create accounts table: {}", e)))?;

    let groups_sql = r#"
        CREATE TABLE IF NOT EXISTS backend_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            backend TEXT NOT NULL
        )
        "#;

    sqlx::query(groups_sql).execute(pool).await.map_err(|e| {
        EngineError::Database(format!("Failed to create backend_groups table: {}", e))
    })?;

    let memberships_sql = r#"
        CREATE TABLE IF NOT EXISTS memberships (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL
                REFERENCES accounts (id) ON DELETE RESTRICT,
            backend_group_id INTEGER NOT NULL
                REFERENCES backend_groups (id) ON DELETE RESTRICT,
            membership_type INTEGER NOT NULL,
            UNIQUE (account_id, backend_group_id, membership_type)
        )
        "#;

    sqlx::query(memberships_sql)
        .execute(pool)
        .await
        .map_err(|e| EngineError::Database(format!("Failed to create memberships table: {}", e)))?;

    let terms_sql = r#"
        CREATE TABLE IF NOT EXISTS account_terms (
            account_id INTEGER NOT NULL
                REFERENCES accounts (id) ON DELETE CASCADE,
            term TEXT NOT NULL
        )
        "#;

    sqlx::query(terms_sql).execute(pool).await.map_err(|e| {
        EngineError::Database(format!("Failed to create account_terms table: {}", e))
    })?;

    create_indexes(pool).await?;

    Ok(())
}

/// Create performance indexes
async fn create_indexes(pool: &SqlitePool) -> EngineResult<()> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_accounts_lower_user_id ON accounts (lower_user_id)",
        "CREATE INDEX IF NOT EXISTS idx_memberships_account_id ON memberships (account_id)",
        "CREATE INDEX IF NOT EXISTS idx_memberships_backend_group_id \
         ON memberships (backend_group_id)",
        "CREATE INDEX IF NOT EXISTS idx_account_terms_account_id ON account_terms (account_id)",
    ];

    for sql in indexes {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| EngineError::Database(format!("Failed to create index: {}", e)))?;
    }

    Ok(())
}

/// Drop the membership schema (for cleanup/testing)
#[allow(dead_code)]
pub async fn drop_schema(pool: &SqlitePool) -> EngineResult<()> {
    // Drop order respects the foreign-key constraints
    for table in ["memberships", "account_terms", "backend_groups", "accounts"] {
        let sql = format!("DROP TABLE IF EXISTS {}", table);
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| EngineError::Database(format!("Failed to drop table {}: {}", table, e)))?;
    }

    Ok(())
}
