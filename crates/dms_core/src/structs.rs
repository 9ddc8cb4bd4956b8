use std::{fmt::Display, path::PathBuf};

use serde::{Deserialize, Serialize};

/// The server software a Minecraft server runs on.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Loader {
    #[serde(rename = "Vanilla")]
    #[default]
    Vanilla,
    #[serde(rename = "Fabric")]
    Fabric,
    #[serde(rename = "Quilt")]
    Quilt,
    #[serde(rename = "Forge")]
    Forge,
    #[serde(rename = "NeoForge")]
    Neoforge,

    // Plugin servers, no mod loader involved
    #[serde(rename = "Paper")]
    Paper,
    #[serde(rename = "Purpur")]
    Purpur,
}

impl Display for Loader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(s) = serde_json::to_string(self)
            .ok()
            .and_then(|n| n.strip_prefix('"').map(str::to_owned))
            .and_then(|n| n.strip_suffix('"').map(str::to_owned))
        {
            write!(f, "{s}")
        } else {
            write!(f, "{self:?}")
        }
    }
}

impl Loader {
    #[must_use]
    pub fn is_vanilla(self) -> bool {
        matches!(self, Loader::Vanilla)
    }

    /// Whether the loader has a version of its own,
    /// separate from the Minecraft version.
    #[must_use]
    pub fn has_loader_version(self) -> bool {
        !self.is_vanilla()
    }
}

/// Where a server's modpack came from.
///
/// A server without a modpack has `modpack: None`
/// in its [`ServerEntry`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Modpack {
    Modrinth { project_id: String, version: String },
    Curseforge { project_id: String, file_id: String },
    /// Imported from a local archive.
    Local { name: String },
}

impl Display for Modpack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modpack::Modrinth {
                project_id,
                version,
            } => write!(f, "{project_id} {version} (Modrinth)"),
            Modpack::Curseforge {
                project_id,
                file_id,
            } => write!(f, "{project_id} #{file_id} (CurseForge)"),
            Modpack::Local { name } => write!(f, "{name} (local)"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerSoftware {
    pub loader: Loader,
    /// Minecraft version, like `1.20.1`
    pub server_version: String,
    /// Only for loaders with their own versioning,
    /// see [`Loader::has_loader_version`]
    pub loader_version: Option<String>,
}

/// A server shown in the dashboard's server list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerEntry {
    /// URL-friendly id, like `my-cool-server`
    pub id: String,
    pub path: PathBuf,
    /// Whether the Minecraft EULA was accepted
    /// for this server.
    pub eula: bool,
    pub software: ServerSoftware,
    #[serde(default)]
    pub modpack: Option<Modpack>,
}

impl ServerEntry {
    /// `my-cool-server` -> `MY COOL SERVER`
    #[must_use]
    pub fn display_name(&self) -> String {
        self.id.replace('-', " ").to_uppercase()
    }

    /// `Fabric 1.20.1 (0.15.7)` or `Vanilla 1.20.1`
    #[must_use]
    pub fn software_summary(&self) -> String {
        let ServerSoftware {
            loader,
            server_version,
            loader_version,
        } = &self.software;
        match loader_version {
            Some(v) if loader.has_loader_version() => format!("{loader} {server_version} ({v})"),
            _ => format!("{loader} {server_version}"),
        }
    }
}
