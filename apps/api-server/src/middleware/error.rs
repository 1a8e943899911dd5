//! Error handling - maps domain failures onto RFC 7807 responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use masterblog_core::DomainError;
use masterblog_core::error::FieldError;
use masterblog_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(Vec<FieldError>),
    Persistence(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {}", describe(errors)),
            AppError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::Validation(errors) => ErrorResponse::validation(
                describe(errors),
                errors.iter().map(|e| e.field.to_string()).collect(),
            ),
            AppError::Persistence(detail) => {
                tracing::error!("Persistence error: {}", detail);
                ErrorResponse::persistence_failure()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, id } => {
                AppError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Persistence(e) => AppError::Persistence(e.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use masterblog_core::error::StoreError;

    #[test]
    fn domain_errors_get_distinct_statuses() {
        let not_found: AppError = DomainError::post_not_found(9).into();
        let invalid: AppError = DomainError::invalid("title", "missing required field").into();
        let unsaved: AppError = DomainError::from(StoreError::Io("full".into())).into();

        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unsaved.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(not_found.to_string(), "Not found: Post with id 9 not found");
    }
}
