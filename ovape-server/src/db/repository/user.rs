//! User Repository
//!
//! Mirror of the staff accounts the auth provider knows about. Rows are
//! upserted whenever an actor performs a mutation.

use super::RepoResult;
use shared::models::Actor;
use sqlx::Sqlite;

pub async fn upsert(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    actor: &Actor,
    now: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO users (id, name, email, role, updated_at) VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, email = excluded.email, role = excluded.role, updated_at = excluded.updated_at",
    )
    .bind(&actor.id)
    .bind(&actor.name)
    .bind(&actor.email)
    .bind(actor.role)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(
    conn: impl sqlx::Executor<'_, Database = Sqlite>,
    id: &str,
) -> RepoResult<Option<Actor>> {
    let row = sqlx::query_as::<_, Actor>("SELECT id, name, email, role FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}
