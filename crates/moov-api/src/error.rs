use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use moov_db::UniqueField;
use thiserror::Error;
use tracing::error;

use crate::notice::Notice;
use crate::page;
use crate::views::{ErrorView, LoginFormView};

/// Everything a handler can fail with. Each variant renders as a page or a
/// redirect; none of them take the process down.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("only {available} tickets are available for '{event}'")]
    InsufficientInventory { event: String, available: i64 },

    #[error("email already exists")]
    DuplicateEmail,

    #[error("name already exists")]
    DuplicateName,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Sends the visitor to the login page with the given notice.
    #[error("login required")]
    Unauthenticated(Notice),

    #[error("{0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Marks a rendered error page so [`crate::session::load_session`] can
/// re-render it with the signed-in user's nav.
#[derive(Debug, Clone)]
pub(crate) struct ErrorPage(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated(notice) => {
                return Redirect::to(&notice.on("/login")).into_response();
            }
            Self::InvalidCredentials => {
                tracing::debug!("Request rejected: invalid credentials");
                let view = LoginFormView {
                    notice: Some("Invalid credentials. Please try again."),
                };
                return (StatusCode::UNAUTHORIZED, page::render(None, &view)).into_response();
            }
            Self::Internal(detail) => {
                error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again later.".to_string(),
                )
            }
            Self::NotFound(what) => (StatusCode::NOT_FOUND, what),
            Self::InsufficientInventory { event, available } => (
                StatusCode::CONFLICT,
                format!("Only {available} tickets are available for '{event}'."),
            ),
            Self::DuplicateEmail => (
                StatusCode::CONFLICT,
                "Email already exists. Try a different one.".to_string(),
            ),
            Self::DuplicateName => (
                StatusCode::CONFLICT,
                "Username already exists. Try a different one.".to_string(),
            ),
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        tracing::debug!(%status, "Request rejected: {}", message);

        let view = ErrorView {
            message: message.clone(),
        };
        let mut res = (status, page::render(None, &view)).into_response();
        res.extensions_mut().insert(ErrorPage(message));
        res
    }
}

impl From<moov_db::Error> for AppError {
    fn from(err: moov_db::Error) -> Self {
        match err {
            moov_db::Error::NotFound => Self::NotFound("Not found.".into()),
            moov_db::Error::Duplicate(UniqueField::Email) => Self::DuplicateEmail,
            moov_db::Error::Duplicate(UniqueField::Name) => Self::DuplicateName,
            moov_db::Error::InvalidQuantity(q) => {
                Self::InvalidInput(format!("Ticket quantity must be at least 1, got {q}."))
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("spawn_blocking join error: {err}"))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        Self::Internal(format!("password hashing failed: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::Internal(format!("session token error: {err}"))
    }
}
