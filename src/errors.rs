use crate::models::ErrorResponse;
use axum::{extract::rejection::QueryRejection, http::StatusCode, Json};
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            detail: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failures seen by the board when talking to the activities API.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid api url: {0}")]
    Url(String),
    #[error("server rejected request with status {status}")]
    Rejected { status: u16, detail: Option<String> },
}

impl BoardError {
    /// Server-supplied explanation, only present for application rejections.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BoardError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn app_error_renders_detail_status() {
        let response = AppError::not_found("Activity not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn only_rejections_carry_detail() {
        let rejected = BoardError::Rejected {
            status: 400,
            detail: Some("Student is already signed up".to_string()),
        };
        assert_eq!(rejected.detail(), Some("Student is already signed up"));

        let decode = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(BoardError::from(decode).detail(), None);
    }
}
