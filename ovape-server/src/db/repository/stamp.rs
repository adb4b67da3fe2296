//! Stamp Ledger Repository
//!
//! Counter changes are single SQL statements so concurrent requests on the
//! same customer never lose an update.

use super::RepoResult;
use shared::models::StampLedgerEntry;
use sqlx::Sqlite;

pub async fn find_by_customer(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> RepoResult<Option<StampLedgerEntry>> {
    let row = sqlx::query_as::<_, StampLedgerEntry>(
        "SELECT customer_id, count, created_at, updated_at FROM stamps WHERE customer_id = ?",
    )
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn find_count(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
) -> RepoResult<Option<i64>> {
    let count = sqlx::query_scalar::<_, i64>("SELECT count FROM stamps WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_optional(conn)
        .await?;
    Ok(count)
}

/// Increment, creating the ledger row on first use; returns the new count
pub async fn increment(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "INSERT INTO stamps (customer_id, count, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) \
         ON CONFLICT(customer_id) DO UPDATE SET count = stamps.count + excluded.count, updated_at = excluded.updated_at \
         RETURNING count",
    )
    .bind(customer_id)
    .bind(amount)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(count)
}

/// Decrement only if enough stamps remain; `None` when the guard failed
/// or no ledger row exists
pub async fn decrement_if_enough(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer_id: i64,
    amount: i64,
    now: i64,
) -> RepoResult<Option<i64>> {
    let count = sqlx::query_scalar::<_, i64>(
        "UPDATE stamps SET count = count - ?1, updated_at = ?2 \
         WHERE customer_id = ?3 AND count >= ?1 RETURNING count",
    )
    .bind(amount)
    .bind(now)
    .bind(customer_id)
    .fetch_optional(conn)
    .await?;
    Ok(count)
}
