//! Stamp Ledger Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NOTE_LEN, validate_max_len, validate_stamp_amount};
use shared::models::{StampAdd, StampCount, StampRedeem, StampRemove};

/// GET /api/customers/{id}/stamps
pub async fn count(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StampCount>> {
    Ok(Json(state.ledger.count(id).await?))
}

/// POST /api/customers/{id}/stamps/add
pub async fn add(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StampAdd>,
) -> AppResult<Json<StampCount>> {
    validate_stamp_amount(payload.amount)?;
    validate_max_len(&payload.note, "note", MAX_NOTE_LEN)?;

    let count = state
        .ledger
        .add(
            &current_user.actor(),
            id,
            payload.amount,
            payload.note.trim(),
            payload.payment_type,
        )
        .await?;
    Ok(Json(count))
}

/// POST /api/customers/{id}/stamps/remove
pub async fn remove(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StampRemove>,
) -> AppResult<Json<StampCount>> {
    validate_stamp_amount(payload.amount)?;
    validate_max_len(&payload.note, "note", MAX_NOTE_LEN)?;

    let count = state
        .ledger
        .remove(&current_user.actor(), id, payload.amount, payload.note.trim())
        .await?;
    Ok(Json(count))
}

/// POST /api/customers/{id}/stamps/redeem - spend one coupon
pub async fn redeem(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StampRedeem>,
) -> AppResult<Json<StampCount>> {
    validate_max_len(&payload.note, "note", MAX_NOTE_LEN)?;

    let count = state
        .ledger
        .redeem(&current_user.actor(), id, payload.note.trim())
        .await?;
    Ok(Json(count))
}
