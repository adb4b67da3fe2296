//! Audit log API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/logs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/remarks", post(handler::add_remark))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/note", put(handler::update_note))
        .route("/{id}/export", get(handler::export))
}
