//! Audit Log Repository
//!
//! Insert and read only. The schema triggers reject deletes and any change
//! to actor, category, action or created_at; the only write after insert is
//! [`update_note`].

use super::RepoResult;
use shared::PageRequest;
use shared::models::{AuditLogRecord, LogAction, LogCategory, LogListItem, LogPayload};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite};

const RECORD_COLUMNS: &str = "l.id, l.admin_id, l.customer_id, l.after_service_id, l.category, l.action, l.note, l.payload, l.created_at";

const LIST_SELECT: &str = "SELECT l.id, l.admin_id, l.customer_id, l.after_service_id, l.category, l.action, l.note, l.payload, l.created_at, \
    u.name AS actor_name, u.email AS actor_email, c.name AS customer_name, c.phone AS customer_phone \
    FROM logs l \
    LEFT JOIN users u ON u.id = l.admin_id \
    LEFT JOIN customers c ON c.id = l.customer_id";

/// Row to append; category is derived from the action
#[derive(Debug, Clone)]
pub struct NewLog<'a> {
    pub admin_id: &'a str,
    pub customer_id: Option<i64>,
    pub after_service_id: Option<i64>,
    pub action: LogAction,
    pub note: &'a str,
    pub payload: &'a LogPayload,
}

/// Subject a listing is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Customer(i64),
    AfterService(i64),
}

/// Append one record; returns its id
pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    log: NewLog<'_>,
    now: i64,
) -> RepoResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO logs (admin_id, customer_id, after_service_id, category, action, note, payload, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
    )
    .bind(log.admin_id)
    .bind(log.customer_id)
    .bind(log.after_service_id)
    .bind(log.action.category())
    .bind(log.action.to_string())
    .bind(log.note)
    .bind(Json(log.payload))
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<AuditLogRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM logs l WHERE l.id = ?");
    let row = sqlx::query_as::<_, AuditLogRecord>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Record with actor and customer display info
pub async fn find_item(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<LogListItem>> {
    let sql = format!("{LIST_SELECT} WHERE l.id = ?");
    let row = sqlx::query_as::<_, LogListItem>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Rewrite the mutable parts of a record; returns affected row count
pub async fn update_note(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    note: &str,
    payload: &LogPayload,
) -> RepoResult<u64> {
    let result = sqlx::query("UPDATE logs SET note = ?1, payload = ?2 WHERE id = ?3")
        .bind(note)
        .bind(Json(payload))
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Newest first, ties broken by id so offset paging never skips or repeats
pub async fn list(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    subject: Option<Subject>,
    category: Option<LogCategory>,
    actor_id: Option<&str>,
    page: PageRequest,
) -> RepoResult<Vec<LogListItem>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(LIST_SELECT);
    qb.push(" WHERE 1 = 1");

    match subject {
        Some(Subject::Customer(id)) => {
            qb.push(" AND l.customer_id = ").push_bind(id);
        }
        Some(Subject::AfterService(id)) => {
            qb.push(" AND l.after_service_id = ").push_bind(id);
        }
        None => {}
    }
    if let Some(category) = category {
        qb.push(" AND l.category = ").push_bind(category);
    }
    if let Some(actor_id) = actor_id {
        qb.push(" AND l.admin_id = ").push_bind(actor_id.to_string());
    }

    qb.push(" ORDER BY l.created_at DESC, l.id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows = qb.build_query_as::<LogListItem>().fetch_all(conn).await?;
    Ok(rows)
}
