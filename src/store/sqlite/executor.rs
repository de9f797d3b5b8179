//! Statement execution shapes over a SQLite pool.
//!
//! Every operation funnels through one of four shapes: existence (LIMIT 1
//! guard), scalar count, explicit row-to-domain mapping, or mutation with
//! an affected-row boolean. One statement per call; constraint failures
//! propagate classified, never demoted to `false`.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::error::{EngineError, EngineResult};
use crate::models::{Account, AccountState, BackendGroup};
use crate::store::predicate::{BindValue, QuerySpec};

fn bind_all<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    binds: &'q [BindValue],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    let mut query = query;
    for bind in binds {
        query = match bind {
            BindValue::Int(value) => query.bind(value),
            BindValue::Text(value) => query.bind(value),
        };
    }
    query
}

/// Existence check: true iff the spec matches at least one row.
pub async fn exists(pool: &SqlitePool, spec: &QuerySpec) -> EngineResult<bool> {
    let (mut sql, binds) = spec.render();
    sql.push_str(" LIMIT 1");

    let row = bind_all(sqlx::query(&sql), &binds)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Aggregate count: the single scalar result as an integer.
pub async fn count(pool: &SqlitePool, spec: &QuerySpec) -> EngineResult<i64> {
    let (sql, binds) = spec.render();

    let row = bind_all(sqlx::query(&sql), &binds).fetch_one(pool).await?;
    let value: i64 = row.try_get(0)?;
    Ok(value)
}

/// Row-set mapped to accounts, column by column.
pub async fn fetch_accounts(pool: &SqlitePool, spec: &QuerySpec) -> EngineResult<Vec<Account>> {
    let (sql, binds) = spec.render();

    let rows = bind_all(sqlx::query(&sql), &binds).fetch_all(pool).await?;
    rows.iter().map(map_account).collect()
}

/// Row-set mapped to groups, column by column.
pub async fn fetch_groups(pool: &SqlitePool, spec: &QuerySpec) -> EngineResult<Vec<BackendGroup>> {
    let (sql, binds) = spec.render();

    let rows = bind_all(sqlx::query(&sql), &binds).fetch_all(pool).await?;
    rows.iter().map(map_group).collect()
}

/// Mutation: true iff at least one row was affected. Uniqueness and
/// referential-integrity violations surface to the caller unmodified.
pub async fn execute(pool: &SqlitePool, sql: &str, binds: &[BindValue]) -> EngineResult<bool> {
    let result = bind_all(sqlx::query(sql), binds).execute(pool).await?;
    Ok(result.rows_affected() >= 1)
}

fn map_account(row: &SqliteRow) -> EngineResult<Account> {
    let state_raw: i64 = row.try_get("a_state")?;
    let state = AccountState::try_from(state_raw).map_err(EngineError::Internal)?;

    Ok(Account {
        id: row.try_get("a_id")?,
        user_id: row.try_get("a_user_id")?,
        lower_user_id: row.try_get("a_lower_user_id")?,
        display_name: row.try_get("a_display_name")?,
        email: row.try_get("a_email")?,
        backend: row.try_get("a_backend")?,
        state,
        quota: row.try_get("a_quota")?,
        home: row.try_get("a_home")?,
        last_login: row.try_get("a_last_login")?,
    })
}

fn map_group(row: &SqliteRow) -> EngineResult<BackendGroup> {
    Ok(BackendGroup {
        id: row.try_get("g_id")?,
        group_id: row.try_get("g_group_id")?,
        display_name: row.try_get("g_display_name")?,
        backend: row.try_get("g_backend")?,
    })
}
