//! Stamp ledger API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers/{id}/stamps", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::count))
        .route("/add", post(handler::add))
        .route("/remove", post(handler::remove))
        .route("/redeem", post(handler::redeem))
}
