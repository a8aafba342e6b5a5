use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Error type returned by HTTP handlers.
///
/// Every variant renders as `{"error": "<message>"}` so that browser clients
/// only ever have to look for a single field.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", first_validation_message(.0))]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(anyhow::Error),

    /// An extractor rejected the request body (malformed JSON, body too large...).
    #[error("{message}")]
    PayloadRejected { status: StatusCode, message: String },

    /// A dependency answered with a non-success status; it is relayed as is.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("{0}")]
    ConfigError(anyhow::Error),

    #[error("{0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadRejected { status, .. } | AppError::Upstream { status, .. } => {
                *status
            }
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation error".to_string())
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[derive(Validate)]
    struct Upload {
        #[validate(required(message = "file is required"))]
        file: Option<String>,
    }

    #[tokio::test]
    async fn validation_error_uses_field_message() {
        let err = Upload { file: None }.validate().unwrap_err();
        let response = AppError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "file is required" })
        );
    }

    #[tokio::test]
    async fn upstream_status_is_preserved() {
        let response = AppError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "rate limited".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "rate limited" })
        );
    }

    #[tokio::test]
    async fn internal_error_exposes_message_only() {
        let response = AppError::InternalError(anyhow::anyhow!("boom")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn config_error_maps_to_500() {
        let err = AppError::ConfigError(anyhow::anyhow!("missing key"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "missing key");
    }
}
