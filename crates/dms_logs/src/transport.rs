//! Feeding a log stream from a running server process.
//!
//! Readers run as tokio tasks and only talk to the session
//! through a channel; the session drains it and does the appending.

use std::{fmt::Display, path::Path, process::ExitStatus};

use dms_core::{info, pt};
use owo_colors::OwoColorize;
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, Command},
    sync::mpsc::UnboundedSender,
    task::{JoinError, JoinHandle},
};

/// A line of server output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine {
    /// From stdout
    Message(String),
    /// From stderr
    Error(String),
}

impl LogLine {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            LogLine::Message(n) | LogLine::Error(n) => n,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            LogLine::Message(n) | LogLine::Error(n) => n,
        }
    }

    #[must_use]
    pub fn print_colored(&self) -> String {
        match self {
            LogLine::Message(message) => message.clone(),
            LogLine::Error(error) => error.bright_red().to_string(),
        }
    }
}

impl Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

const READ_ERR_PREFIX: &str = "while reading the server log:\n";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{READ_ERR_PREFIX}{0}")]
    Io(#[from] std::io::Error),
    #[error("{READ_ERR_PREFIX}couldn't join async task:\n{0}")]
    Join(#[from] JoinError),
    #[error("couldn't start server ({program}):\n{error}")]
    Spawn {
        program: String,
        error: std::io::Error,
    },
    #[error("the server process has no stdin to send commands to")]
    NoStdin,
}

/// Replaces every occurrence of each censor with `[REDACTED]`.
/// Empty censors are skipped.
#[must_use]
pub fn censor(input: &str, censors: &[String]) -> String {
    censors
        .iter()
        .filter(|n| !n.is_empty())
        .fold(input.to_owned(), |acc, censor| {
            acc.replace(censor.as_str(), "[REDACTED]")
        })
}

/// Reads `stream` line by line until it ends, censoring each line
/// and forwarding it to `sender` in arrival order.
///
/// Invalid UTF-8 is replaced with `U+FFFD` rather than ending the read.
///
/// Without a sender, lines are printed to the terminal instead.
/// Returns the (censored) lines that were read.
///
/// # Errors
/// If reading from the stream fails. Lines read before
/// the failure have already been forwarded.
pub async fn read_lines<R: AsyncBufRead + Unpin>(
    mut stream: R,
    sender: Option<UnboundedSender<LogLine>>,
    censors: Vec<String>,
    is_stderr: bool,
) -> Result<Vec<String>, TransportError> {
    let mut buf = Vec::new();
    let mut log_raw = Vec::new();

    loop {
        buf.clear();
        if stream.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = censor(&String::from_utf8_lossy(trim_newline(&buf)), &censors);
        log_raw.push(line.clone());
        send(
            sender.as_ref(),
            if is_stderr {
                LogLine::Error(line)
            } else {
                LogLine::Message(line)
            },
        );
    }

    Ok(log_raw)
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn send(sender: Option<&UnboundedSender<LogLine>>, msg: LogLine) {
    if let Some(sender) = sender {
        // Receiver gone means the session ended, nothing to do
        _ = sender.send(msg);
    } else {
        println!("{}", msg.print_colored());
    }
}

type Reader = JoinHandle<Result<Vec<String>, TransportError>>;

/// A running server whose output is being streamed.
pub struct ServerProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    readers: Vec<Reader>,
}

impl ServerProcess {
    /// Starts `program` with piped stdio and begins forwarding
    /// its stdout and stderr to `sender`.
    ///
    /// The process is killed if the returned value is dropped.
    ///
    /// # Errors
    /// If the process couldn't be started.
    pub fn spawn(
        program: &str,
        args: &[String],
        dir: Option<&Path>,
        censors: Vec<String>,
        sender: UnboundedSender<LogLine>,
    ) -> Result<Self, TransportError> {
        info!("Starting server: {program} {}", args.join(" "));
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = dir {
            pt!("Working directory: {dir:?}");
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|error| TransportError::Spawn {
            program: program.to_owned(),
            error,
        })?;

        let mut readers = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            readers.push(tokio::spawn(read_lines(
                BufReader::new(stdout),
                Some(sender.clone()),
                censors.clone(),
                false,
            )));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(tokio::spawn(read_lines(
                BufReader::new(stderr),
                Some(sender),
                censors,
                true,
            )));
        }

        Ok(Self {
            stdin: child.stdin.take(),
            child,
            readers,
        })
    }

    #[must_use]
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Writes `command` to the server's stdin, followed by a newline.
    ///
    /// # Errors
    /// If the server closed its stdin or the write failed.
    pub async fn send_command(&mut self, command: &str) -> Result<(), TransportError> {
        let stdin = self.stdin.as_mut().ok_or(TransportError::NoStdin)?;
        stdin.write_all(command.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    /// Returns the exit status if the server has already exited.
    ///
    /// # Errors
    /// If the process status couldn't be queried.
    pub fn try_wait(&mut self) -> Result<Option<ExitStatus>, TransportError> {
        Ok(self.child.try_wait()?)
    }

    /// Asks the server to stop, by closing its stdin.
    pub fn close_stdin(&mut self) {
        self.stdin = None;
    }

    pub async fn kill(&mut self) -> Result<(), TransportError> {
        Ok(self.child.kill().await?)
    }

    /// Waits for the server to exit and for all of its output
    /// to be read.
    ///
    /// Returns the exit status and the raw output
    /// (stdout lines first, then stderr).
    ///
    /// # Errors
    /// If waiting on the process or one of the readers failed.
    pub async fn wait(mut self) -> Result<(ExitStatus, Vec<String>), TransportError> {
        self.stdin = None;
        let status = self.child.wait().await?;
        let mut log_raw = Vec::new();
        for reader in self.readers {
            log_raw.extend(reader.await??);
        }
        Ok((status, log_raw))
    }
}
