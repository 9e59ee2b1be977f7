//! Unified error handling for the API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::ValidationError;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub mensagem: String,
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found. Carries the user-facing message.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client. Carries the user-facing message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Database(RepositoryError::ForeignKey(_) | RepositoryError::InvalidData(_))
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Server errors never expose details.
    fn client_message(&self) -> String {
        match self {
            Self::NotFound(message) | Self::BadRequest(message) => message.clone(),
            Self::Database(RepositoryError::NotFound) => "Registro não encontrado.".to_string(),
            Self::Database(RepositoryError::ForeignKey(_)) => {
                "Registro relacionado não encontrado.".to_string()
            }
            Self::Database(RepositoryError::InvalidData(_)) => {
                "Valor inválido para o campo informado.".to_string()
            }
            Self::Database(_) => "Erro interno do servidor.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, %status, "Client error");
        }

        let body = ErrorBody {
            mensagem: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Usuário não encontrado.".to_string());
        assert_eq!(err.to_string(), "Not found: Usuário não encontrado.");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::NotFound.into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(RepositoryError::ForeignKey("devices_room_id_fkey".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(RepositoryError::DataCorruption("bad row".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(RepositoryError::InvalidData("numeric field overflow".to_string()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "row in users has an unexpected type".to_string(),
        ));
        assert_eq!(err.client_message(), "Erro interno do servidor.");

        let err = AppError::Database(RepositoryError::InvalidData(
            "numeric field overflow".to_string(),
        ));
        assert_eq!(err.client_message(), "Valor inválido para o campo informado.");

        let err = AppError::Database(RepositoryError::ForeignKey("users_pkey".to_string()));
        assert!(!err.client_message().contains("users_pkey"));
    }

    #[test]
    fn test_validation_error_is_bad_request() {
        let err = AppError::from(ValidationError::Required("cep"));
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("cep")));
    }
}
