//! Customer API Handlers

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
    Customer, CustomerCreate, CustomerSearch, CustomerSearchTarget, CustomerUpdate,
    CustomerWithStamps, LogCategory, LogListItem,
};
use shared::{Page, PageRequest};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub target: CustomerSearchTarget,
    pub keyword: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub category: Option<LogCategory>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/customers?target=&keyword= - list, or search when a keyword is given
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<CustomerWithStamps>>> {
    let page = PageRequest::from_query(query.limit, query.offset);
    let result = match query.keyword {
        Some(keyword) => {
            let search = CustomerSearch {
                target: query.target,
                keyword,
            };
            state.directory.search(&search, page).await?
        }
        None => state.directory.list(page).await?,
    };
    Ok(Json(result))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    let customer = state
        .directory
        .create(&current_user.actor(), payload)
        .await?;
    Ok(Json(customer))
}

/// GET /api/customers/{id} - detail with stamp count
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CustomerWithStamps>> {
    Ok(Json(state.directory.get(id).await?))
}

/// PUT /api/customers/{id} - partial update
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    let customer = state
        .directory
        .update(&current_user.actor(), id, payload)
        .await?;
    Ok(Json(customer))
}

/// DELETE /api/customers/{id} - admin only
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.directory.delete(&current_user.actor(), id).await?;
    Ok(Json(true))
}

/// GET /api/customers/{id}/logs?category=&limit=&offset=
pub async fn logs(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<LogsQuery>,
) -> AppResult<Json<Page<LogListItem>>> {
    state.directory.get(id).await?;
    let page = PageRequest::from_query(query.limit, query.offset);
    let records = state
        .audit
        .list_by_subject(Subject::Customer(id), query.category, page)
        .await?;
    Ok(Json(records))
}
