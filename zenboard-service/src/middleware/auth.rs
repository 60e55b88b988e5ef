use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::services::TokenKind;
use crate::AppState;

/// Middleware gating every protected route.
///
/// Requires `Authorization: Bearer <access token>`. Absence or any
/// verification failure is a 401 carrying the specific error code - a bad
/// token is never downgraded to an anonymous request. Verification is
/// stateless; there is no revocation list to consult.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match token {
        Some(token) => token,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing or invalid Authorization header",
                    "code": "Unauthorized",
                })),
            ));
        }
    };

    let claims = state.tokens.verify(token).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": e.to_string(), "code": e.code() })),
        )
    })?;

    // Refresh tokens only buy new access tokens, never resource access.
    if claims.kind != TokenKind::Access {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Wrong token kind for this operation",
                "code": "WrongKind",
            })),
        ));
    }

    let principal = state
        .db
        .find_principal_by_id(claims.sub)
        .await
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Principal no longer exists",
                    "code": "Unauthorized",
                })),
            )
        })?;

    // Handlers pull the resolved principal from request extensions.
    req.extensions_mut().insert(AuthPrincipal(principal));

    Ok(next.run(req).await)
}

/// Extractor for the authenticated principal.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub crate::models::Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts.extensions.get::<AuthPrincipal>().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Auth principal missing from request extensions",
                "code": "InternalError",
            })),
        ))?;

        Ok(principal.clone())
    }
}
