//! Request extractors that reject with the JSON error envelope
//! instead of axum's plain-text rejections.
//!
//! Clients get a fixed message; the rejection detail is only logged.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::response::ApiError;

pub const INVALID_BODY: &str = "invalid request body";
pub const INVALID_QUERY: &str = "invalid query";
pub const INVALID_PATH: &str = "invalid path";

/// JSON body; decode failures become 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!(detail = %rejection.body_text(), "Rejected request body");
    match rejection {
        JsonRejection::JsonDataError(_)
        | JsonRejection::JsonSyntaxError(_)
        | JsonRejection::MissingJsonContentType(_) => ApiError::bad_request(INVALID_BODY),
        // unreadable or oversized body
        _ => ApiError::bad_gateway(INVALID_BODY),
    }
}

/// Integer `{id}` path segment; anything else becomes 400.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(path_rejection)?;
        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| ApiError::bad_request(format!("invalid id: {}", raw)))
    }
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    tracing::debug!(detail = %rejection.body_text(), "Rejected path parameters");
    match rejection {
        PathRejection::FailedToDeserializePathParams(_) => ApiError::bad_request(INVALID_PATH),
        _ => ApiError::bad_gateway(INVALID_PATH),
    }
}

/// Query string; decode failures become 400.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    tracing::debug!(detail = %rejection.body_text(), "Rejected query string");
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(_) => ApiError::bad_request(INVALID_QUERY),
        _ => ApiError::bad_gateway(INVALID_QUERY),
    }
}
