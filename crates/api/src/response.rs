//! Shared response envelope for API handlers.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: params }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
