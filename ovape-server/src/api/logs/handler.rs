//! Audit Log Handlers
//!
//! Records are append-only: there is no delete route and only the note
//! (plus a stamp payment type) can be edited.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{
    AuditLogRecord, LogCategory, LogExport, LogFilter, LogListItem, LogNoteUpdate, RemarkCreate,
};
use shared::{Page, PageRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<LogCategory>,
    pub actor_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/logs?category=&actor_id=&limit=&offset=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<LogListItem>>> {
    let filter = LogFilter {
        category: query.category,
        actor_id: query.actor_id.filter(|a| !a.is_empty()),
    };
    let page = PageRequest::from_query(query.limit, query.offset);
    Ok(Json(state.audit.list_all(&filter, page).await?))
}

/// GET /api/logs/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LogListItem>> {
    Ok(Json(state.audit.get(id).await?))
}

/// PUT /api/logs/{id}/note
pub async fn update_note(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<LogNoteUpdate>,
) -> AppResult<Json<AuditLogRecord>> {
    let record = state.audit.update_note(id, payload).await?;
    tracing::debug!(log_id = id, user_id = %current_user.id, "Log note edited");
    Ok(Json(record))
}

/// POST /api/logs/remarks
pub async fn add_remark(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RemarkCreate>,
) -> AppResult<Json<LogListItem>> {
    let item = state
        .audit
        .add_remark(&current_user.actor(), payload)
        .await?;
    Ok(Json(item))
}

/// GET /api/logs/{id}/export - ledger-sheet line for a stamp log
pub async fn export(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LogExport>> {
    Ok(Json(state.audit.export(id).await?))
}
