//! Gateway types module
//!
//! - [`response`]: success envelope, error envelope, `ApiResult`
//! - [`extract`]: extractors that reject with the error envelope

pub mod extract;
pub mod response;

pub use extract::{IdPath, JsonBody, QueryParams};
pub use response::{ApiError, ApiResponse, ApiResult, MessageData, ok};
