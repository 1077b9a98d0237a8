use crate::domain::content::Collection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Internal => "internal_error",
        }
    }
}

// Details stay in the server log; clients only see this.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Clone, Debug)]
pub struct AppError {
    code: ErrorCode,
    message: String,
    status: StatusCode,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NotFound,
            message: message.into(),
            status: StatusCode::NOT_FOUND,
        }
    }

    /// `"<Kind> not found: <identifier>"`
    pub fn unit_not_found(collection: Collection, identifier: impl AsRef<str>) -> Self {
        Self::not_found(format!(
            "{} not found: {}",
            collection.kind(),
            identifier.as_ref()
        ))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{error:#}"), "content request failed");
        Self::internal(INTERNAL_ERROR_MESSAGE)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                code: self.code.as_str(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_not_found_names_kind_and_identifier() {
        let error = AppError::unit_not_found(Collection::Skills, "nonexistent");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), "Skill not found: nonexistent");
    }

    #[test]
    fn anyhow_errors_become_internal() {
        let error = AppError::from(
            anyhow::anyhow!("disk on fire").context("failed to read /srv/site/skills/a/SKILL.md"),
        );
        assert_eq!(error.code_str(), "internal_error");
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message(), "Internal server error");
        assert!(!error.message().contains("/srv/site"));
    }
}
