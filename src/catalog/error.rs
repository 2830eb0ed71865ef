use thiserror::Error;

use crate::db::StoreError;
use crate::gateway::types::ApiError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("no places available")]
    NoPlacesAvailable,

    #[error("invalid value for {name}: {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("the ID list is empty")]
    EmptyIdList,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) | CatalogError::NoPlacesAvailable => {
                ApiError::not_found(err.to_string())
            }
            CatalogError::InvalidFlag { .. } | CatalogError::EmptyIdList => {
                ApiError::bad_request(err.to_string())
            }
            CatalogError::Store(StoreError::EmptyIdList) => {
                ApiError::bad_request(StoreError::EmptyIdList.to_string())
            }
            CatalogError::Store(StoreError::NotFound) => ApiError::not_found("record not found"),
            CatalogError::Store(StoreError::Conflict) => {
                ApiError::conflict("record conflicts with existing data")
            }
            CatalogError::Store(other) => ApiError::internal(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::NotFound("category"), StatusCode::NOT_FOUND, "category not found"),
            (CatalogError::NoPlacesAvailable, StatusCode::NOT_FOUND, "no places available"),
            (CatalogError::EmptyIdList, StatusCode::BAD_REQUEST, "the ID list is empty"),
            (
                CatalogError::Store(StoreError::EmptyIdList),
                StatusCode::BAD_REQUEST,
                "the ID list is empty",
            ),
            (
                CatalogError::Store(StoreError::Timeout),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error",
            ),
        ];
        for (err, status, message) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.message, message);
        }
    }

    #[test]
    fn test_invalid_flag_message() {
        let api = ApiError::from(CatalogError::InvalidFlag {
            name: "is_halal",
            value: "maybe".to_string(),
        });
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "invalid value for is_halal: \"maybe\"");
    }
}
