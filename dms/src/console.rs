use std::path::Path;

use dms_core::{err, info};
use dms_logs::{transport::ServerProcess, view, Console};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    config::DashboardConfig, logs::upload_entries, renderer::TerminalRenderer, AppResult,
};

/// Console commands handled by the dashboard instead of the server.
#[derive(Debug, PartialEq, Eq)]
enum LocalCommand {
    Upload,
    Clear,
}

impl LocalCommand {
    fn parse(command: &str) -> Option<Self> {
        match command {
            ":upload" => Some(Self::Upload),
            ":clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

/// `dms console -- <program> [args..]`
///
/// Streams the server's output and forwards lines typed
/// on stdin as commands, until the server exits.
pub async fn run(
    program: &str,
    args: &[String],
    dir: Option<&Path>,
    config: &DashboardConfig,
) -> AppResult<()> {
    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut server = ServerProcess::spawn(program, args, dir, config.c_censors(), sender)?;

    let mut console = Console::new();
    let view = view::attach(
        console.stream(),
        TerminalRenderer::new(std::io::stdout(), config.c_theme()),
    );

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = receiver.recv() => match line {
                Some(line) => console.push(line),
                // Both output pipes closed
                None => break,
            },
            command = stdin.next_line(), if stdin_open => match command? {
                Some(command) => {
                    let Some(command) = console.submit(&command) else {
                        continue;
                    };
                    match LocalCommand::parse(&command) {
                        Some(LocalCommand::Upload) => {
                            let entries = console.stream().current_entries();
                            if let Err(error) = upload_entries(entries, config).await {
                                err!("{error}");
                            }
                        }
                        Some(LocalCommand::Clear) => console.stream_mut().clear(),
                        None => {
                            if let Err(error) = server.send_command(&command).await {
                                err!("{error}");
                            }
                        }
                    }
                }
                None => {
                    stdin_open = false;
                    server.close_stdin();
                }
            },
        }
    }

    let (status, _) = server.wait().await?;
    view.unsubscribe();
    info!("Server exited ({status})");
    Ok(())
}
