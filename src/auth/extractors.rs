use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{
    claims::Claims,
    cookie::{parse_cookie, SESSION_COOKIE},
    session::SessionKeys,
};
use crate::error::ApiError;

/// Identity resolved from the `token` cookie.
///
/// No cookie rejects with 401; a cookie that fails verification for any
/// reason rejects with 403. The handler never runs in either case.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parse_cookie(&parts.headers, SESSION_COOKIE)
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized, no token".into()))?;

        let keys = SessionKeys::from_ref(state);
        match keys.verify(&token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(reason) => {
                warn!(%reason, path = %parts.uri.path(), "session token rejected");
                Err(ApiError::Forbidden("Invalid token".into()))
            }
        }
    }
}
