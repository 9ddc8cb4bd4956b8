//! DMS: a dashboard for Minecraft servers.
//!
//! Run `dms --help` for the list of commands.

use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use config::{DashboardConfig, ThemeLightness};
use dms_core::{err, info, print, DMS_VERSION_NAME};
use owo_colors::OwoColorize;

mod config;
mod console;
mod logs;
mod renderer;

pub type AppResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "dms", version, about = "A dashboard for managing Minecraft servers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Don't write the dashboard's own log to a file
    #[arg(long)]
    no_file_log: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start a server and attach to its console.
    ///
    /// Lines typed are sent to the server as commands.
    /// `:upload` uploads the console log, `:clear` clears it.
    Console {
        /// Working directory of the server
        #[arg(long)]
        dir: Option<PathBuf>,
        /// The server command, like `java -jar server.jar nogui`
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
    /// Show a log file with line numbers
    Logs {
        file: PathBuf,
        /// Also upload it to mclo.gs
        #[arg(long)]
        upload: bool,
    },
    /// Upload a log file to mclo.gs
    Upload { file: PathBuf },
    /// List configured servers
    Servers,
    /// Show or change the theme
    Theme { theme: Option<ThemeLightness> },
    /// Show frontend and backend versions
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.no_file_log {
        if let Err(error) = print::init_file_logging() {
            err!(no_log, "Couldn't start logging to a file: {error}");
        }
    }

    let config = match DashboardConfig::load_s() {
        Ok(n) => n,
        Err(error) => {
            err!("Couldn't load config: {error}");
            std::process::exit(1);
        }
    };

    if let Err(error) = run(cli.command, config).await {
        err!("{error}");
        std::process::exit(1);
    }
}

async fn run(command: Command, mut config: DashboardConfig) -> AppResult<()> {
    match command {
        Command::Console { dir, command } => {
            let Some((program, args)) = command.split_first() else {
                return Err("no server command given".into());
            };
            console::run(program, args, dir.as_deref(), &config).await?;
        }
        Command::Logs { file, upload } => logs::view_file(&file, upload, &config).await?,
        Command::Upload { file } => logs::upload_file(&file, &config).await?,
        Command::Servers => list_servers(&config),
        Command::Theme { theme: None } => println!("{:?}", config.c_theme()),
        Command::Theme { theme: Some(theme) } => {
            config.theme = Some(theme);
            config.save().await?;
            info!("Theme set to {theme:?}");
        }
        Command::Version => {
            println!("dms v{DMS_VERSION_NAME}");
            println!("{}", dms_core::backend_version());
        }
    }
    Ok(())
}

fn list_servers(config: &DashboardConfig) {
    let servers = config.c_servers();
    if servers.is_empty() {
        match config.path() {
            Some(path) => println!("No servers yet. Add some to {path:?}"),
            None => println!("No servers yet."),
        }
        return;
    }

    for server in servers {
        println!("{}", server.display_name().bold());
        println!("  {}", server.software_summary());
        match &server.modpack {
            Some(modpack) => println!("  modpack: {modpack}"),
            None => println!("  modpack: none"),
        }
        if !server.eula {
            println!("  {}", "EULA not accepted".yellow());
        }
        println!("  {}", server.path.display().bright_black());
    }
}
