//! Logging for the dashboard itself.
//!
//! Use the [`crate::info!`], [`crate::pt!`] and [`crate::err!`] macros.
//! Every message is:
//! - printed to the terminal (unless disabled with [`set_print`])
//! - kept in memory, see [`get_logs`]
//! - appended to a dated file under [`crate::logs_dir`],
//!   once [`init_file_logging`] was called.
//!
//! The `no_log` form of the macros skips the file.

use std::{
    fmt::{Arguments, Display},
    fs::File,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        LazyLock, Mutex,
    },
};

use owo_colors::OwoColorize;

use crate::{IntoIoError, IoError};

mod macros;

static IS_PRINT: AtomicBool = AtomicBool::new(true);
/// Whether home-directory usernames get replaced
/// by `[REDACTED]` in logged messages.
pub static REDACT_SENSITIVE_INFO: AtomicBool = AtomicBool::new(true);

/// `(home directory strings, username)`
pub static REDACTION_USERNAME: LazyLock<(Vec<String>, String)> = LazyLock::new(|| {
    let Some(home) = dirs::home_dir() else {
        return (Vec::new(), String::new());
    };
    let username = home
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let home_str = home.to_string_lossy().to_string();
    let alt = home_str.replace('\\', "/");
    (vec![home_str, alt], username)
});

static LOGGER: LazyLock<Mutex<LoggingState>> = LazyLock::new(|| {
    Mutex::new(LoggingState {
        file: None,
        lines: Vec::new(),
    })
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    Info,
    Error,
    Point,
}

impl Display for LogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                LogType::Info => "[info] ",
                LogType::Error => "[error] ",
                LogType::Point => "- ",
            }
        )
    }
}

struct LoggingState {
    file: Option<(File, PathBuf)>,
    lines: Vec<(String, LogType)>,
}

impl LoggingState {
    fn write_to_storage(&mut self, msg: &str, t: LogType) {
        self.lines.push((msg.to_owned(), t));
    }

    fn write_to_file(&mut self, msg: &str, t: LogType) {
        let Some((file, _)) = &mut self.file else {
            return;
        };
        let time = chrono::Local::now().format("%H:%M:%S");
        _ = writeln!(file, "[{time}] {t}{msg}");
    }
}

/// Starts mirroring log messages into
/// `<logs dir>/<date>-<time>.log`.
///
/// Returns the path of the new log file.
///
/// # Errors
/// If the logs directory or the file couldn't be created.
pub fn init_file_logging() -> Result<PathBuf, IoError> {
    let dir = crate::logs_dir()?;
    let path = dir.join(format!(
        "{}.log",
        chrono::Local::now().format("%Y-%m-%d-%H-%M-%S")
    ));
    let mut file = File::create(&path).path(&path)?;

    if let Ok(mut logger) = LOGGER.lock() {
        // Messages logged before file logging started
        for (line, t) in &logger.lines {
            writeln!(file, "{t}{line}").path(&path)?;
        }
        logger.file = Some((file, path.clone()));
    }
    Ok(path)
}

/// Backend of the logging macros.
///
/// Redacts `args`, prints it with a colored tag
/// (errors go to stderr) and records it. `to_file` is
/// false for the `no_log` form.
#[doc(hidden)]
pub fn log(t: LogType, args: Arguments<'_>, to_file: bool) {
    let msg = auto_redact(&args.to_string());
    if is_print() {
        match t {
            LogType::Info => println!("{} {msg}", "[info]".yellow()),
            LogType::Error => eprintln!("{} {msg}", "[error]".red()),
            LogType::Point => println!("{} {msg}", "-".bold()),
        }
    }

    if let Ok(mut logger) = LOGGER.lock() {
        logger.write_to_storage(&msg, t);
        if to_file {
            logger.write_to_file(&msg, t);
        }
    }
}

/// Everything logged so far in this process,
/// formatted like `[info] message`.
#[must_use]
pub fn get_logs() -> Vec<String> {
    LOGGER
        .lock()
        .map(|n| n.lines.iter().map(|(msg, t)| format!("{t}{msg}")).collect())
        .unwrap_or_default()
}

/// Path of the current log file, if file logging was started.
#[must_use]
pub fn log_file_path() -> Option<PathBuf> {
    LOGGER
        .lock()
        .ok()
        .and_then(|n| n.file.as_ref().map(|(_, path)| path.clone()))
}

pub fn set_print(enabled: bool) {
    IS_PRINT.store(enabled, Ordering::SeqCst);
}

#[must_use]
pub fn is_print() -> bool {
    IS_PRINT.load(Ordering::SeqCst)
}

/// Removes the current user's name from
/// home-directory paths mentioned in `msg`.
#[must_use]
pub fn auto_redact(msg: &str) -> String {
    if !REDACT_SENSITIVE_INFO.load(Ordering::SeqCst) {
        return msg.to_owned();
    }
    let (home_dirs, username) = &*REDACTION_USERNAME;
    if username.is_empty() {
        return msg.to_owned();
    }
    let mut out = msg.to_owned();
    for home in home_dirs {
        if out.contains(home.as_str()) {
            let redacted_home = home.replace(username.as_str(), "[REDACTED]");
            out = out.replace(home.as_str(), &redacted_home);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_keep_messages_in_memory() {
        set_print(false);
        crate::info!(no_log, "server {} started", "alpha");
        crate::err!(no_log, "server {} crashed", "beta");
        let logs = get_logs();
        assert!(logs.iter().any(|n| n == "[info] server alpha started"));
        assert!(logs.iter().any(|n| n == "[error] server beta crashed"));
    }

    #[test]
    fn point_messages_use_dash_prefix() {
        set_print(false);
        crate::pt!("copied {} files", 3);
        assert!(get_logs().iter().any(|n| n == "- copied 3 files"));
    }

    #[test]
    fn redacts_home_username() {
        let (homes, username) = &*REDACTION_USERNAME;
        let Some(home) = homes.first() else {
            return;
        };
        if username.is_empty() {
            return;
        }
        let msg = format!("reading {home}/servers/config.json");
        let redacted = auto_redact(&msg);
        assert!(redacted.contains("[REDACTED]"));
        assert!(redacted.ends_with("/servers/config.json"));
    }

    #[test]
    fn leaves_other_text_alone() {
        assert_eq!(auto_redact("plain message"), "plain message");
    }
}
