use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("server responded {status}: {reason}")]
    Server {
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("couldn't read `{path}`: {source}")]
    FileRead { path: String, source: io::Error },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
