//! After-Service Ticket Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::audit_log::Subject;
use crate::utils::AppResult;
use shared::models::{
    AfterServiceCreate, AfterServiceFilter, AfterServiceListItem, AfterServiceSearchTarget,
    AfterServiceStatus, AfterServiceTicket, LogListItem, StatusTransition,
};
use shared::{Page, PageRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<AfterServiceStatus>,
    #[serde(default)]
    pub target: AfterServiceSearchTarget,
    pub keyword: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/after-services?status=&target=&keyword=&limit=&offset=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<AfterServiceListItem>>> {
    let filter = AfterServiceFilter {
        status: query.status,
        target: query.target,
        keyword: query.keyword,
    };
    let page = PageRequest::from_query(query.limit, query.offset);
    Ok(Json(state.tickets.list(&filter, page).await?))
}

/// POST /api/after-services
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<AfterServiceCreate>,
) -> AppResult<Json<AfterServiceTicket>> {
    let ticket = state.tickets.create(&current_user.actor(), payload).await?;
    Ok(Json(ticket))
}

/// GET /api/after-services/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AfterServiceListItem>> {
    Ok(Json(state.tickets.get(id).await?))
}

/// PUT /api/after-services/{id}/status
pub async fn transition(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StatusTransition>,
) -> AppResult<Json<AfterServiceTicket>> {
    let ticket = state
        .tickets
        .transition(&current_user.actor(), id, payload)
        .await?;
    Ok(Json(ticket))
}

/// GET /api/after-services/{id}/logs?limit=&offset=
pub async fn logs(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<LogListItem>>> {
    state.tickets.get(id).await?;
    let page = PageRequest::from_query(query.limit, query.offset);
    let records = state
        .audit
        .list_by_subject(Subject::AfterService(id), None, page)
        .await?;
    Ok(Json(records))
}
