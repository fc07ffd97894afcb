use crate::api::state::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Guard mutating locker routes behind the admin secret.
///
/// Reads stay public; only writes need the bearer secret.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if req.method() != Method::PUT {
        return next.run(req).await;
    }

    let token = match extract_bearer(req.headers().get(header::AUTHORIZATION)) {
        Some(token) => token,
        None => return unauthorized(),
    };

    if state.verifier.verify(&token) {
        next.run(req).await
    } else {
        unauthorized()
    }
}

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(|token| token.trim().to_string())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Unauthorized"})),
    )
        .into_response()
}
