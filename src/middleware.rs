use std::sync::Arc;

use axum::{
    extract::State,
    http::{self, Request},
    middleware::Next,
    response::Response,
};

use crate::{
    auth,
    error::ApiError,
    model::{CurrentUser, Role},
    AppState,
};

const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Owner tier: requires a valid bearer token. Verifies the claims, joins
/// them against the credential store and attaches the resolved
/// `CurrentUser` to the request extensions. Expired, forged and
/// missing-claim tokens are all reported identically as 401.
pub async fn mw_require_auth<B>(
    State(state): State<Arc<AppState>>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok());

    let auth_header = match auth_header {
        Some(auth_header) => auth_header,
        None => return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS)),
    };

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated(INVALID_CREDENTIALS))?;

    let claims = auth::decode_token(&state.jwt_secret, token)
        .map_err(|_| ApiError::Unauthenticated(INVALID_CREDENTIALS))?;

    // claims are untrusted until joined against the credential store
    let user = state
        .users
        .find_by_id(claims.id)
        .await?
        .ok_or(ApiError::Unauthenticated(INVALID_CREDENTIALS))?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        username: user.username,
        role: Role::from_db(&user.role),
    });

    Ok(next.run(request).await)
}

/// Admin tier: owner tier plus the admin role. Layered inside
/// `mw_require_auth`, so the resolved identity is already present; a valid
/// caller without the role gets 403, not 401.
pub async fn mw_require_admin<B>(request: Request<B>, next: Next<B>) -> Result<Response, ApiError> {
    let is_admin = request
        .extensions()
        .get::<CurrentUser>()
        .map(|user| user.role.is_admin())
        .unwrap_or(false);

    if !is_admin {
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
