use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::cookies::{ACCESS_COOKIE, get_cookie_value};
use crate::AppState;
use crate::auth::Claims;
use crate::error::ApiError;

/// Authentication middleware.
///
/// Accepts the access token either from the `accessToken` cookie or from a
/// `Authorization: Bearer` header, verifies it, and injects the claims into
/// request extensions for handlers downstream.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) => token,
        None => {
            return ApiError::Unauthorized("Authentication required".to_string()).into_response();
        }
    };

    match state.jwt_service.decode_access(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

fn extract_token(request: &Request<Body>) -> Option<String> {
    if let Some(token) = get_cookie_value(request.headers(), ACCESS_COOKIE) {
        return Some(token);
    }

    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Extractor for authenticated user claims.
#[derive(Clone)]
pub struct AuthenticatedUser(pub Claims);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("No authentication found".to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_takes_priority_over_bearer_header() {
        let mut request = Request::new(Body::empty());
        request.headers_mut().insert(
            "cookie",
            HeaderValue::from_static("accessToken=cookie-token"),
        );
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );

        assert_eq!(extract_token(&request).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn bearer_header_is_accepted_without_cookie() {
        let mut request = Request::new(Body::empty());
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer header-token"),
        );

        assert_eq!(extract_token(&request).as_deref(), Some("header-token"));
    }

    #[test]
    fn missing_credentials_yield_none() {
        let request = Request::new(Body::empty());
        assert_eq!(extract_token(&request), None);

        let mut request = Request::new(Body::empty());
        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&request), None);
    }
}
