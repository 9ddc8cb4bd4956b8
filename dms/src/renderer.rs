use std::io::Write;

use dms_logs::view::{LogRow, Renderer};
use owo_colors::OwoColorize;

use crate::config::ThemeLightness;

/// Remembers where the placeholder starts.
const SAVE_CURSOR: &str = "\x1b7";
/// Goes back to the placeholder and erases it along with anything
/// written below it since (typed commands, dashboard messages).
const ERASE_FROM_SAVED: &str = "\x1b8\x1b[0J";

/// Paints a log into a terminal, with line numbers.
///
/// The terminal scrolls by itself as lines are written,
/// so scrolling only needs to flush what was painted.
pub struct TerminalRenderer<W: Write> {
    out: W,
    theme: ThemeLightness,
    placeholder_shown: bool,
    rows_painted: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, theme: ThemeLightness) -> Self {
        Self {
            out,
            theme,
            placeholder_shown: false,
            rows_painted: false,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn show_placeholder(&mut self, text: &str) {
        _ = writeln!(self.out, "{SAVE_CURSOR}{}", text.italic().dimmed());
        self.placeholder_shown = true;
    }

    fn clear_rows(&mut self) {
        if self.placeholder_shown {
            _ = write!(self.out, "{ERASE_FROM_SAVED}");
            self.placeholder_shown = false;
        }
        if self.rows_painted {
            // Already printed lines can't be taken back
            _ = writeln!(self.out, "{}", "-- log cleared --".dimmed());
            self.rows_painted = false;
        }
    }

    fn paint_row(&mut self, row: LogRow<'_>) {
        let number = format!("{:>5}", row.line_number());
        let number = match self.theme {
            ThemeLightness::Dark => number.bright_black().to_string(),
            ThemeLightness::Light => number.black().to_string(),
        };
        _ = writeln!(self.out, "{number} {}", row.text);
        self.rows_painted = true;
    }

    fn scroll_to(&mut self, _index: usize) {
        _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn numbers_rows_from_one() {
        let mut renderer = TerminalRenderer::new(Vec::new(), ThemeLightness::Dark);
        renderer.paint_row(LogRow {
            index: 0,
            text: "server started",
        });
        renderer.paint_row(LogRow {
            index: 1,
            text: "Done!",
        });
        let out = text(renderer.into_inner());
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].contains("    1"));
        assert!(lines[0].ends_with(" server started"));
        assert!(lines[1].contains("    2"));
        assert!(lines[1].ends_with(" Done!"));
    }

    #[test]
    fn placeholder_is_erased_by_first_row() {
        let mut renderer = TerminalRenderer::new(Vec::new(), ThemeLightness::Light);
        renderer.show_placeholder("Fetching logs...");
        renderer.clear_rows();
        renderer.paint_row(LogRow {
            index: 0,
            text: "hello",
        });
        let out = text(renderer.into_inner());
        let saved = out.find(SAVE_CURSOR).unwrap();
        let placeholder = out.find("Fetching logs...").unwrap();
        let erased = out.find(ERASE_FROM_SAVED).unwrap();
        let row = out.find("hello").unwrap();
        assert!(saved < placeholder && placeholder < erased && erased < row);
        assert!(!out.contains("log cleared"));
    }

    #[test]
    fn clearing_painted_rows_prints_separator() {
        let mut renderer = TerminalRenderer::new(Vec::new(), ThemeLightness::Dark);
        renderer.paint_row(LogRow { index: 0, text: "a" });
        renderer.clear_rows();
        assert!(text(renderer.into_inner()).contains("-- log cleared --"));
    }
}
