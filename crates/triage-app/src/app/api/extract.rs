//! Request decoding shared by the resource handlers.

use salvo::Request;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Reads a UUID path parameter.
///
/// ## Errors
/// Returns `BadRequest` if the parameter is missing or not a UUID.
pub fn path_id(req: &Request, name: &str) -> AppResult<Uuid> {
    req.param::<Uuid>(name)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {name}")))
}

/// ## Summary
/// Decodes the JSON request body.
///
/// ## Errors
/// Returns `BadRequest` if the body is not valid JSON for `T`.
pub async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Failed to parse request body");
        AppError::BadRequest("Invalid request body".to_string())
    })
}
