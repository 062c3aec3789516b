//! Request errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use shopform_db::DbError;
use shopform_sheets::SheetsError;
use shopform_types::ValidationError;
use tracing::{error, warn};

use crate::html;

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("this form has expired, please start again")]
    DraftExpired,

    #[error("this form is still being saved, please wait a moment and check before submitting again")]
    InFlight,

    #[error("database error: {0}")]
    Db(DbError),

    #[error("spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Db(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DraftExpired => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InFlight => StatusCode::CONFLICT,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Sheets(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to show to the client. Server-side faults stay in the log.
    pub fn detail(&self) -> String {
        match self {
            AppError::Db(_) | AppError::Internal(_) => "internal server error".to_string(),
            AppError::Sheets(_) => "could not save to the spreadsheet, please try again".to_string(),
            other => other.to_string(),
        }
    }

    fn log(&self) {
        if self.status().is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Request rejected: {self}");
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        (
            self.status(),
            Json(serde_json::json!({ "detail": self.detail() })),
        )
            .into_response()
    }
}

/// Renders an [`AppError`] as an HTML page instead of JSON.
#[derive(Debug)]
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        HtmlError(err)
    }
}

impl From<ValidationError> for HtmlError {
    fn from(err: ValidationError) -> Self {
        HtmlError(err.into())
    }
}

impl From<SheetsError> for HtmlError {
    fn from(err: SheetsError) -> Self {
        HtmlError(err.into())
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        self.0.log();
        let status = self.0.status();
        (status, Html(html::error_page(status, &self.0.detail()))).into_response()
    }
}
