use crate::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError
{
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
    #[error("session store error: {0}")]
    SessionStore(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("{0}")]
    Usage(String),
    #[error("Please log in first (vocab-typing login).")]
    NotAuthenticated,
    #[error("Your session has expired. Please log in again (vocab-typing login).")]
    SessionExpired,
}
