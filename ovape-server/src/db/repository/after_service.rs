//! After-Service Ticket Repository

use super::{RepoResult, like_pattern};
use shared::PageRequest;
use shared::models::{
    AfterServiceItemType, AfterServiceListItem, AfterServiceSearchTarget, AfterServiceStatus,
    AfterServiceTicket,
};
use sqlx::{QueryBuilder, Sqlite};

const TICKET_COLUMNS: &str = "a.id, a.customer_id, a.admin_id, a.item_type, a.item_name, a.quantity, a.symptom, a.note, a.status, a.created_at, a.updated_at";

const LIST_FROM: &str = "FROM after_services a \
    LEFT JOIN customers c ON c.id = a.customer_id \
    LEFT JOIN users u ON u.id = a.admin_id";

/// Fields of a new ticket; status starts at `received`
#[derive(Debug, Clone)]
pub struct NewTicket<'a> {
    pub customer_id: i64,
    pub admin_id: &'a str,
    pub item_type: AfterServiceItemType,
    pub item_name: &'a str,
    pub quantity: i64,
    pub symptom: &'a str,
    pub note: Option<&'a str>,
}

pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    ticket: NewTicket<'_>,
    now: i64,
) -> RepoResult<AfterServiceTicket> {
    let row = sqlx::query_as::<_, AfterServiceTicket>(
        "INSERT INTO after_services (customer_id, admin_id, item_type, item_name, quantity, symptom, note, status, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) \
         RETURNING id, customer_id, admin_id, item_type, item_name, quantity, symptom, note, status, created_at, updated_at",
    )
    .bind(ticket.customer_id)
    .bind(ticket.admin_id)
    .bind(ticket.item_type)
    .bind(ticket.item_name)
    .bind(ticket.quantity)
    .bind(ticket.symptom)
    .bind(ticket.note)
    .bind(AfterServiceStatus::Received)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<AfterServiceTicket>> {
    let sql = format!("SELECT {TICKET_COLUMNS} FROM after_services a WHERE a.id = ?");
    let row = sqlx::query_as::<_, AfterServiceTicket>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Ticket with customer and staff display info
pub async fn find_item(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<AfterServiceListItem>> {
    let sql = format!(
        "SELECT {TICKET_COLUMNS}, c.name AS customer_name, c.phone AS customer_phone, u.name AS admin_name \
         {LIST_FROM} WHERE a.id = ?"
    );
    let row = sqlx::query_as::<_, AfterServiceListItem>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Set the status, returning the updated ticket (`None` if it does not exist)
pub async fn update_status(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
    status: AfterServiceStatus,
    now: i64,
) -> RepoResult<Option<AfterServiceTicket>> {
    let row = sqlx::query_as::<_, AfterServiceTicket>(
        "UPDATE after_services SET status = ?1, updated_at = ?2 WHERE id = ?3 \
         RETURNING id, customer_id, admin_id, item_type, item_name, quantity, symptom, note, status, created_at, updated_at",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Newest tickets first, optionally filtered by status and keyword
pub async fn list(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    status: Option<AfterServiceStatus>,
    target: AfterServiceSearchTarget,
    keyword: Option<&str>,
    page: PageRequest,
) -> RepoResult<Vec<AfterServiceListItem>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {TICKET_COLUMNS}, c.name AS customer_name, c.phone AS customer_phone, u.name AS admin_name \
         {LIST_FROM} WHERE 1 = 1"
    ));

    if let Some(status) = status {
        qb.push(" AND a.status = ").push_bind(status);
    }

    if let Some(keyword) = keyword {
        let columns: &[&str] = match target {
            AfterServiceSearchTarget::All => &["c.name", "c.phone", "a.item_name"],
            AfterServiceSearchTarget::Name => &["c.name"],
            AfterServiceSearchTarget::Phone => &["c.phone"],
            AfterServiceSearchTarget::ItemName => &["a.item_name"],
        };
        let pattern = like_pattern(keyword);
        qb.push(" AND (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\'");
        }
        qb.push(")");
    }

    qb.push(" ORDER BY a.created_at DESC, a.id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows = qb
        .build_query_as::<AfterServiceListItem>()
        .fetch_all(conn)
        .await?;
    Ok(rows)
}
