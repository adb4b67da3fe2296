//! Customer Repository

use super::{RepoResult, like_pattern};
use shared::PageRequest;
use shared::models::{Customer, CustomerWithStamps};
use sqlx::{QueryBuilder, Sqlite};

const CUSTOMER_COLUMNS: &str = "c.id, c.name, c.phone, c.gender, c.note, c.created_at, c.updated_at";

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<Customer>> {
    let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers c WHERE c.id = ?");
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn exists(conn: impl sqlx::Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM customers WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

/// Customer plus current stamp count (0 without a ledger row)
pub async fn find_with_stamps(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: i64,
) -> RepoResult<Option<CustomerWithStamps>> {
    let sql = format!(
        "SELECT {CUSTOMER_COLUMNS}, COALESCE(s.count, 0) AS stamp_count \
         FROM customers c LEFT JOIN stamps s ON s.customer_id = c.id WHERE c.id = ?"
    );
    let row = sqlx::query_as::<_, CustomerWithStamps>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Newest customers first
pub async fn list(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    page: PageRequest,
) -> RepoResult<Vec<CustomerWithStamps>> {
    let sql = format!(
        "SELECT {CUSTOMER_COLUMNS}, COALESCE(s.count, 0) AS stamp_count \
         FROM customers c LEFT JOIN stamps s ON s.customer_id = c.id \
         ORDER BY c.created_at DESC, c.id DESC LIMIT ? OFFSET ?"
    );
    let rows = sqlx::query_as::<_, CustomerWithStamps>(&sql)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

/// Substring search on name and/or phone digits
///
/// A `None` pattern disables that column. Both `None` yields nothing.
pub async fn search(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    name: Option<&str>,
    phone: Option<&str>,
    page: PageRequest,
) -> RepoResult<Vec<CustomerWithStamps>> {
    if name.is_none() && phone.is_none() {
        return Ok(Vec::new());
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {CUSTOMER_COLUMNS}, COALESCE(s.count, 0) AS stamp_count \
         FROM customers c LEFT JOIN stamps s ON s.customer_id = c.id WHERE "
    ));
    let mut first = true;
    if let Some(name) = name {
        qb.push("c.name LIKE ")
            .push_bind(like_pattern(name))
            .push(r" ESCAPE '\'");
        first = false;
    }
    if let Some(phone) = phone {
        if !first {
            qb.push(" OR ");
        }
        qb.push("c.phone LIKE ")
            .push_bind(like_pattern(phone))
            .push(r" ESCAPE '\'");
    }
    qb.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows = qb
        .build_query_as::<CustomerWithStamps>()
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

pub async fn insert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer: &Customer,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO customers (id, name, phone, gender, note, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(customer.id)
    .bind(&customer.name)
    .bind(&customer.phone)
    .bind(customer.gender)
    .bind(&customer.note)
    .bind(customer.created_at)
    .bind(customer.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Overwrite all mutable fields; returns affected row count
pub async fn update(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    customer: &Customer,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE customers SET name = ?1, phone = ?2, gender = ?3, note = ?4, updated_at = ?5 WHERE id = ?6",
    )
    .bind(&customer.name)
    .bind(&customer.phone)
    .bind(customer.gender)
    .bind(&customer.note)
    .bind(customer.updated_at)
    .bind(customer.id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected())
}

/// Ledger and tickets cascade; logs keep their rows with `customer_id` nulled
pub async fn delete(conn: impl sqlx::Executor<'_, Database = Sqlite>, id: i64) -> RepoResult<u64> {
    let result = sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}
