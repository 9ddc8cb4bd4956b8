use std::path::{Path, PathBuf};

use dms_core::{
    dms_dir, err, IntoIoError, IntoJsonError, JsonFileError, ServerEntry, DMS_VERSION_NAME,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeLightness {
    #[serde(rename = "Dark")]
    #[default]
    Dark,
    #[serde(rename = "Light")]
    Light,
}

/// Dashboard configuration stored in
/// `DMS/config.json` inside the platform config directory.
///
/// Loaded once at startup and handed to whatever needs it;
/// [`DashboardConfig::save`] is the only place it's written.
///
/// # Why `Option`?
///
/// Fields are `Option`s for backwards compatibility.
/// Missing fields in older config files deserialize
/// as `None`, which is treated as the default value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DashboardConfig {
    /// The theme (Light/Dark) set by the user.
    pub theme: Option<ThemeLightness>,

    /// The version of the dashboard that last
    /// wrote this file.
    pub version: Option<String>,

    /// Servers shown in the server list.
    pub servers: Option<Vec<ServerEntry>>,

    /// Strings (passwords, IPs, ...) that get replaced by
    /// `[REDACTED]` in server output and uploaded logs.
    pub censors: Option<Vec<String>>,

    #[serde(skip)]
    dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            theme: None,
            version: Some(DMS_VERSION_NAME.to_owned()),
            servers: None,
            censors: None,
            dir: None,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from the DMS config directory.
    ///
    /// # Errors
    /// - if the config directory couldn't be found or accessed
    ///
    /// A missing or corrupted config is *not* an error:
    /// it's reset to the default (keeping a `.bak` copy of
    /// the corrupted file).
    pub fn load_s() -> Result<Self, JsonFileError> {
        Self::load_from(&dms_dir()?)
    }

    /// Same as [`DashboardConfig::load_s`] but for
    /// a config stored in `dir`.
    pub fn load_from(dir: &Path) -> Result<Self, JsonFileError> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::create(dir);
        }

        let mut config = std::fs::read_to_string(&config_path).path(&config_path)?;
        if config.is_empty() {
            // Might have caught another write halfway
            for _ in 0..5 {
                config = std::fs::read_to_string(&config_path).path(&config_path)?;
                if !config.is_empty() {
                    break;
                }
            }
        }

        let mut config: Self = match serde_json::from_str(&config) {
            Ok(config) => config,
            Err(err) => {
                err!("Invalid dashboard config! This may be a sign of corruption!\nError: {err}");
                let old_path = dir.join("config.json.bak");
                _ = std::fs::copy(&config_path, &old_path);
                return Self::create(dir);
            }
        };
        config.dir = Some(dir.to_owned());
        Ok(config)
    }

    pub async fn save(&self) -> Result<(), JsonFileError> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => dms_dir()?,
        };
        let config_path = dir.join(CONFIG_FILE);
        let config = serde_json::to_string_pretty(&self).json_to()?;

        tokio::fs::write(&config_path, config.as_bytes())
            .await
            .path(config_path)?;
        Ok(())
    }

    fn create(dir: &Path) -> Result<Self, JsonFileError> {
        let mut config = Self::default();
        let path = dir.join(CONFIG_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(&config).json_to()?.as_bytes())
            .path(&path)?;
        config.dir = Some(dir.to_owned());
        Ok(config)
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|n| n.join(CONFIG_FILE))
    }

    pub fn c_theme(&self) -> ThemeLightness {
        self.theme.unwrap_or_default()
    }

    pub fn c_servers(&self) -> &[ServerEntry] {
        self.servers.as_deref().unwrap_or_default()
    }

    pub fn c_censors(&self) -> Vec<String> {
        self.censors.clone().unwrap_or_default()
    }
}
