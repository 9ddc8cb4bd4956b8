use std::path::Path;

use dms_core::{info, pt, IntoIoError};
use dms_logs::{
    upload::{LogUploader, UploadError, UploadedLog},
    view, LogEntry, LogStream,
};

use crate::{config::DashboardConfig, renderer::TerminalRenderer, AppResult};

/// Appends a log file to `stream`, one entry per line.
async fn append_file(stream: &mut LogStream, path: &Path) -> AppResult<()> {
    let text = tokio::fs::read_to_string(path).await.path(path)?;
    for line in text.lines() {
        stream.append(line);
    }
    Ok(())
}

/// Reads a log file into a fresh stream.
pub async fn load_file(path: &Path) -> AppResult<LogStream> {
    let mut stream = LogStream::new();
    append_file(&mut stream, path).await?;
    Ok(stream)
}

/// `dms logs <file>`
pub async fn view_file(path: &Path, upload: bool, config: &DashboardConfig) -> AppResult<()> {
    let mut stream = LogStream::new();
    let view = view::attach(
        &stream,
        TerminalRenderer::new(std::io::stdout(), config.c_theme()),
    );
    let result = append_file(&mut stream, path).await;
    view.unsubscribe();
    result?;

    if upload {
        upload_entries(stream.current_entries(), config).await?;
    }
    Ok(())
}

/// `dms upload <file>`
pub async fn upload_file(path: &Path, config: &DashboardConfig) -> AppResult<()> {
    let stream = load_file(path).await?;
    pt!("Read {} lines from {path:?}", stream.len());
    upload_entries(stream.current_entries(), config).await?;
    Ok(())
}

/// Uploads a log and tells the user where it went.
pub async fn upload_entries(
    entries: &[LogEntry],
    config: &DashboardConfig,
) -> Result<UploadedLog, UploadError> {
    let log = LogUploader::new()
        .with_censors(config.c_censors())
        .upload(entries)
        .await?;
    info!("Log uploaded to mclo.gs! Share this link: {}", log.url);
    Ok(log)
}
