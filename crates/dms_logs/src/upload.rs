//! Sharing a log through <https://mclo.gs>.
//!
//! One-shot: the whole buffer is sent in a single request,
//! nothing is retried.

use dms_core::{
    file_utils::check_for_success, info, IntoJsonError, JsonError, RequestError, CLIENT,
};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;

use crate::{transport::censor, LogEntry};

pub const MCLOGS_ENDPOINT: &str = "https://api.mclo.gs/1/log";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Joins the entries' text with `\n`, one entry per line.
#[must_use]
pub fn join_entries(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(LogEntry::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A successfully uploaded log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedLog {
    pub id: String,
    /// Page to share with others
    pub url: String,
    /// The log as plain text
    pub raw: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum McLogsResponse {
    Success(UploadedLog),
    Failure { error: String },
}

impl McLogsResponse {
    fn into_result(self) -> Result<UploadedLog, UploadError> {
        match self {
            McLogsResponse::Success(log) => Ok(log),
            McLogsResponse::Failure { error } => Err(UploadError::Service(error)),
        }
    }
}

const UPLOAD_ERR_PREFIX: &str = "while uploading log:\n";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{UPLOAD_ERR_PREFIX}the log is empty")]
    EmptyLog,
    #[error("{UPLOAD_ERR_PREFIX}{0}")]
    Request(#[from] RequestError),
    #[error("{UPLOAD_ERR_PREFIX}{0}")]
    Json(#[from] JsonError),
    /// The service answered, but refused the log.
    #[error("{UPLOAD_ERR_PREFIX}mclo.gs: {0}")]
    Service(String),
}

impl From<reqwest::Error> for UploadError {
    fn from(value: reqwest::Error) -> Self {
        Self::Request(RequestError::ReqwestError(value))
    }
}

/// Uploads logs to mclo.gs (or a compatible endpoint).
#[derive(Clone)]
pub struct LogUploader {
    endpoint: String,
    censors: Vec<String>,
    client: reqwest::Client,
}

impl Default for LogUploader {
    fn default() -> Self {
        Self {
            endpoint: MCLOGS_ENDPOINT.to_owned(),
            censors: Vec::new(),
            client: CLIENT.clone(),
        }
    }
}

impl LogUploader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Strings replaced by `[REDACTED]` before anything is sent.
    #[must_use]
    pub fn with_censors(mut self, censors: Vec<String>) -> Self {
        self.censors = censors;
        self
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The form-encoded request body for `entries`.
    ///
    /// # Errors
    /// [`UploadError::EmptyLog`] if there's nothing to upload.
    pub fn request_body(&self, entries: &[LogEntry]) -> Result<String, UploadError> {
        if entries.is_empty() {
            return Err(UploadError::EmptyLog);
        }
        let content = censor(&join_entries(entries), &self.censors);
        Ok(format!("content={}", urlencoding::encode(&content)))
    }

    /// Uploads `entries` and returns where they can be viewed.
    ///
    /// # Errors
    /// - if `entries` is empty
    /// - if the service couldn't be reached
    /// - if the service rejected the log ([`UploadError::Service`])
    /// - if the response couldn't be understood
    pub async fn upload(&self, entries: &[LogEntry]) -> Result<UploadedLog, UploadError> {
        let body = self.request_body(entries)?;
        info!("Uploading log ({} lines) to {}", entries.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;
        let status = check_for_success(&response);
        let text = response.text().await?;

        let response = match serde_json::from_str::<McLogsResponse>(&text).json(text) {
            Ok(n) => n,
            Err(err) => {
                // An unreadable error page says less than the status code
                status?;
                return Err(err.into());
            }
        };
        response.into_result()
    }
}
