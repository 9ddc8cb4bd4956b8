//! # Core utilities for the DMS dashboard
//!
//! Shared by every other crate in the workspace:
//! - Logging macros ([`info!`], [`pt!`], [`err!`]), see [`print`]
//! - Error types with path/JSON context ([`IoError`], [`JsonError`], ...)
//! - The shared HTTP [`CLIENT`]
//! - Server entry data model ([`ServerEntry`], [`Modpack`], [`Loader`])

use std::{path::PathBuf, sync::LazyLock};

mod error;
pub mod file_utils;
pub mod print;
mod structs;

pub use error::{IntoIoError, IntoJsonError, IoError, JsonError, JsonFileError, RequestError};
pub use structs::{Loader, Modpack, ServerEntry, ServerSoftware};

pub const DMS_VERSION_NAME: &str = env!("CARGO_PKG_VERSION");

/// Directory name used under the platform config/data directories.
const DMS_DIR_NAME: &str = "DMS";

/// Short git commit this build was made from (`unknown` outside a checkout).
const GIT_SHA: &str = env!("DMS_GIT_SHA");

/// Comma-separated features this build was compiled with.
const CRATE_FEATURES: &str = env!("DMS_CRATE_FEATURES");

/// HTTP client shared by everything that talks to the outside world.
pub static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .user_agent(format!("dms/{DMS_VERSION_NAME}"))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Returns the version string of the dashboard backend, for example
/// `dms backend v0.1.0 (a1b2c3d4, default)`.
///
/// The commit and feature list are resolved by the build script.
#[must_use]
pub fn backend_version() -> String {
    format!("dms backend v{DMS_VERSION_NAME} ({GIT_SHA}, {CRATE_FEATURES})")
}

/// The DMS config directory (`~/.config/DMS` on Linux).
/// Created if it doesn't exist.
///
/// # Errors
/// - if the platform has no config directory
/// - if the directory couldn't be created
pub fn dms_dir() -> Result<PathBuf, IoError> {
    let dir = dirs::config_dir()
        .ok_or(IoError::ConfigDirNotFound)?
        .join(DMS_DIR_NAME);
    std::fs::create_dir_all(&dir).path(&dir)?;
    Ok(dir)
}

/// Where log files of the dashboard itself go
/// (`~/.local/share/DMS/logs` on Linux).
///
/// # Errors
/// See [`dms_dir`].
pub fn logs_dir() -> Result<PathBuf, IoError> {
    let dir = dirs::data_dir()
        .ok_or(IoError::ConfigDirNotFound)?
        .join(DMS_DIR_NAME)
        .join("logs");
    std::fs::create_dir_all(&dir).path(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_version_format() {
        let version = backend_version();
        let rest = version
            .strip_prefix(&format!("dms backend v{DMS_VERSION_NAME} ("))
            .unwrap();
        let (sha, features) = rest.strip_suffix(')').unwrap().split_once(", ").unwrap();

        assert!(
            sha == "unknown" || (sha.len() == 8 && sha.chars().all(|c| c.is_ascii_hexdigit())),
            "bad sha: {sha}"
        );
        assert!(!features.is_empty());
        assert!(!features.contains(' '));
    }

    #[test]
    fn default_feature_is_reported() {
        // `default` is always on unless built with --no-default-features
        assert!(CRATE_FEATURES.split(',').any(|n| n == "default"));
    }
}
