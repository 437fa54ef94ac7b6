use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use thiserror::Error;

use crate::forms::FormErrors;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Note not found")]
    NotFound,

    #[error("Invalid form submission")]
    Validation(FormErrors),

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Username already in use: {0}")]
    UsernameTaken(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> Status {
        match self {
            AppError::Unauthenticated => Status::Unauthorized,
            AppError::NotFound => Status::NotFound,
            AppError::Validation(_) | AppError::SlugTaken(_) | AppError::UsernameTaken(_) => {
                Status::UnprocessableEntity
            }
            AppError::Database(_)
            | AppError::Migrate(_)
            | AppError::PasswordHash(_)
            | AppError::Internal(_) => Status::InternalServerError,
        }
    }
}

// Errors are handed to the catchers; a 401 turns into the login redirect.
impl<'r> Responder<'r, 'static> for AppError {
    fn respond_to(self, _request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.class().is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.code, "request rejected");
        }
        Err(status)
    }
}
