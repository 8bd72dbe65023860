use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, GENERIC_ERROR_MESSAGE};

/// The uniform `{ success, data, error }` response shape.
///
/// Internally every call returns `Result<T, CoreError>`; this envelope is
/// only a boundary adapter for consumers that want the flat shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Turn the envelope back into a `Result`.
    /// A failed envelope becomes `CoreError::Api` with status 0.
    pub fn into_result(self) -> Result<T, CoreError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (true, None) => Err(CoreError::Deserialization(
                "successful response carried no data".into(),
            )),
            (false, _) => Err(CoreError::Api {
                status: 0,
                message: self
                    .error
                    .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            }),
        }
    }
}

impl<T> From<Result<T, CoreError>> for ApiResponse<T> {
    fn from(result: Result<T, CoreError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failure(e.user_message()),
        }
    }
}
