//! Customer API

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    let staff_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/logs", get(handler::logs));

    let admin_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    staff_routes.merge(admin_routes)
}
