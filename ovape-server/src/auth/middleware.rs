//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::ErrorCode;

/// Require a valid bearer token on every `/api/` route
///
/// On success the [`CurrentUser`] is inserted into the request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - non `/api/` paths (health, 404)
///
/// # Errors
///
/// | Error | Code |
/// |-------|------|
/// | no Authorization header | Unauthorized |
/// | expired token | TokenExpired |
/// | anything else | InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    if !req.uri().path().starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match state.get_jwt_service().validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin-only routes
///
/// Must run inside [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id.clone(),
            user_name = user.name.clone(),
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
