use crate::{transport::LogLine, LogStream};

/// A server console: the server's live output
/// plus a command line.
///
/// Commands aren't interpreted here, they are echoed into
/// the log and handed back for the caller to send to the server.
#[derive(Default)]
pub struct Console {
    stream: LogStream,
}

impl Console {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Echoes `command` into the log and returns it, trimmed.
    ///
    /// Blank commands are ignored and return `None`.
    pub fn submit(&mut self, command: &str) -> Option<String> {
        let command = command.trim();
        if command.is_empty() {
            return None;
        }
        self.stream.append(format!("> {command}"));
        Some(command.to_owned())
    }

    /// Appends a line of server output.
    pub fn push(&mut self, line: LogLine) {
        self.stream.append(line.into_text());
    }

    #[must_use]
    pub fn stream(&self) -> &LogStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut LogStream {
        &mut self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoes_commands() {
        let mut console = Console::new();
        console.push(LogLine::Message("[Server thread/INFO]: Done (3.2s)!".to_owned()));
        let sent = console.submit("  say hello world!  ");
        assert_eq!(sent.as_deref(), Some("say hello world!"));
        assert_eq!(
            console.stream().current_entries(),
            ["[Server thread/INFO]: Done (3.2s)!", "> say hello world!"]
        );
    }

    #[test]
    fn blank_commands_do_nothing() {
        let mut console = Console::new();
        assert_eq!(console.submit(""), None);
        assert_eq!(console.submit("   \t"), None);
        assert!(console.stream().is_empty());
    }

    #[test]
    fn errors_are_appended_as_text() {
        let mut console = Console::new();
        console.push(LogLine::Error("java.lang.OutOfMemoryError".to_owned()));
        assert_eq!(
            console.stream().current_entries(),
            ["java.lang.OutOfMemoryError"]
        );

        console.stream_mut().clear();
        assert!(console.stream().is_empty());
    }
}
