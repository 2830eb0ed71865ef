use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use std::sync::Arc;

use super::token::TokenError;
use crate::gateway::{state::AppState, types::ApiError};

/// Caller identity attached to the request by [`bearer_auth_middleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: i64,
}

/// Require `Authorization: Bearer <access token>`.
///
/// A missing or malformed header is 401; a token failing verification is 403.
pub async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("no auth header"))?;

    let token = bearer_token(auth_header)?;

    let claims = state.auth.tokens().verify_access(token).map_err(|e| {
        tracing::warn!("Bearer token rejected: {}", e);
        ApiError::forbidden(rejection_message(&e))
    })?;
    let user_id = claims
        .user_id()
        .map_err(|e| ApiError::forbidden(rejection_message(&e)))?;

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    Ok(response)
}

fn bearer_token(auth_header: &str) -> Result<&str, ApiError> {
    let mut parts = auth_header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        (Some(scheme), Some(_), None) if scheme != "Bearer" => {
            Err(ApiError::unauthorized("unauthorized - no bearer"))
        }
        _ => Err(ApiError::unauthorized("invalid auth header")),
    }
}

fn rejection_message(err: &TokenError) -> &'static str {
    match err {
        TokenError::Invalid(e) => match e.kind() {
            ErrorKind::ExpiredSignature => "unauthorized - token expired",
            ErrorKind::InvalidAudience => "unauthorized - invalid audience",
            ErrorKind::InvalidIssuer => "unauthorized - invalid issuer",
            ErrorKind::InvalidSignature => "unauthorized - failed hmac check",
            _ => "unauthorized - invalid token",
        },
        _ => "unauthorized - invalid token",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");

        let err = bearer_token("Basic dXNlcjpwYXNz").unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "unauthorized - no bearer");

        for header in ["Bearer", "Bearer ", "Bearer a b", "token"] {
            let err = bearer_token(header).unwrap_err();
            assert_eq!(err.status, StatusCode::UNAUTHORIZED, "header {:?}", header);
        }
    }

    #[test]
    fn test_rejection_message_fallback() {
        assert_eq!(
            rejection_message(&TokenError::InvalidSubject),
            "unauthorized - invalid token"
        );
    }
}
