use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("at path {path:?}: {error}")]
    Io {
        error: std::io::Error,
        path: PathBuf,
    },
    #[error("couldn't find the config directory of this platform")]
    ConfigDirNotFound,
}

/// Attaches the path that was being accessed to an [`std::io::Error`].
///
/// ```no_run
/// # use dms_core::{IntoIoError, IoError};
/// # fn f() -> Result<String, IoError> {
/// let path = "config.json";
/// let text = std::fs::read_to_string(path).path(path)?;
/// # Ok(text) }
/// ```
pub trait IntoIoError<T> {
    #[allow(clippy::missing_errors_doc)]
    fn path(self, p: impl AsRef<Path>) -> Result<T, IoError>;
}

impl<T> IntoIoError<T> for std::io::Result<T> {
    fn path(self, p: impl AsRef<Path>) -> Result<T, IoError> {
        self.map_err(|error| IoError::Io {
            error,
            path: p.as_ref().to_owned(),
        })
    }
}

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("couldn't parse JSON: {error}\n\n{json}")]
    From {
        error: serde_json::Error,
        json: String,
    },
    #[error("couldn't serialize JSON: {error}")]
    To { error: serde_json::Error },
}

pub trait IntoJsonError<T> {
    /// For deserialization errors, keeping the offending document around.
    #[allow(clippy::missing_errors_doc)]
    fn json(self, doc: String) -> Result<T, JsonError>;
    /// For serialization errors.
    #[allow(clippy::missing_errors_doc)]
    fn json_to(self) -> Result<T, JsonError>;
}

impl<T> IntoJsonError<T> for Result<T, serde_json::Error> {
    fn json(self, doc: String) -> Result<T, JsonError> {
        self.map_err(|error| JsonError::From { error, json: doc })
    }

    fn json_to(self) -> Result<T, JsonError> {
        self.map_err(|error| JsonError::To { error })
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request failed with code {code} at url {url}")]
    DownloadError {
        code: reqwest::StatusCode,
        url: reqwest::Url,
    },
    #[error("request error: {0}")]
    ReqwestError(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum JsonFileError {
    #[error(transparent)]
    SerdeError(#[from] JsonError),
    #[error(transparent)]
    Io(#[from] IoError),
}
