//! Rendering a [`LogStream`].
//!
//! [`attach`] keeps a [`Renderer`] in sync with a stream:
//! every appended entry is painted **before** the viewport
//! is scrolled to it, so the scroll never targets a stale height.

use crate::{LogChange, LogStream, Subscription};

/// Shown while a stream has no entries yet.
pub const PLACEHOLDER: &str = "Fetching logs...";

/// A log entry together with its position, ready to be painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRow<'a> {
    /// Zero-based position in the buffer.
    pub index: usize,
    pub text: &'a str,
}

impl LogRow<'_> {
    /// One-based number shown next to the row.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.index + 1
    }
}

/// Something that can display a log, like a terminal or a widget.
pub trait Renderer {
    fn show_placeholder(&mut self, text: &str);
    /// Removes every painted row (and the placeholder).
    fn clear_rows(&mut self);
    fn paint_row(&mut self, row: LogRow<'_>);
    /// Bring the row at `index` into view, at the bottom.
    fn scroll_to(&mut self, index: usize);
}

/// The rows of a stream, in order.
pub fn rows(stream: &LogStream) -> impl Iterator<Item = LogRow<'_>> {
    stream
        .current_entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| LogRow {
            index,
            text: entry.text(),
        })
}

/// Index of the row a view following the stream should be scrolled to,
/// `None` for an empty stream. Recomputed after every change.
#[must_use]
pub fn scroll_target(len: usize) -> Option<usize> {
    len.checked_sub(1)
}

/// Paints the current contents of `stream` into `renderer`,
/// then keeps it updated until the returned subscription is removed.
pub fn attach<R: Renderer + 'static>(stream: &LogStream, mut renderer: R) -> Subscription {
    renderer.clear_rows();
    if stream.is_empty() {
        renderer.show_placeholder(PLACEHOLDER);
    } else {
        for row in rows(stream) {
            renderer.paint_row(row);
        }
    }
    if let Some(bottom) = scroll_target(stream.len()) {
        renderer.scroll_to(bottom);
    }

    stream.subscribe(move |change| match change {
        LogChange::Appended { index, entry } => {
            if *index == 0 {
                // Drop the placeholder
                renderer.clear_rows();
            }
            renderer.paint_row(LogRow {
                index: *index,
                text: entry.text(),
            });
            if let Some(bottom) = scroll_target(index + 1) {
                renderer.scroll_to(bottom);
            }
        }
        LogChange::Cleared => {
            renderer.clear_rows();
            renderer.show_placeholder(PLACEHOLDER);
        }
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Placeholder(String),
        Clear,
        Paint(usize, String),
        Scroll(usize),
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Call>>>);

    impl Recorder {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.0.borrow_mut())
        }

        /// What a real screen would show: the painted rows,
        /// or the placeholder.
        fn screen(calls: &[Call]) -> Vec<String> {
            let mut screen = Vec::new();
            for call in calls {
                match call {
                    Call::Placeholder(n) => screen.push(n.clone()),
                    Call::Clear => screen.clear(),
                    Call::Paint(_, n) => screen.push(n.clone()),
                    Call::Scroll(_) => {}
                }
            }
            screen
        }
    }

    impl Renderer for Recorder {
        fn show_placeholder(&mut self, text: &str) {
            self.0.borrow_mut().push(Call::Placeholder(text.to_owned()));
        }

        fn clear_rows(&mut self) {
            self.0.borrow_mut().push(Call::Clear);
        }

        fn paint_row(&mut self, row: LogRow<'_>) {
            self.0
                .borrow_mut()
                .push(Call::Paint(row.index, row.text.to_owned()));
        }

        fn scroll_to(&mut self, index: usize) {
            self.0.borrow_mut().push(Call::Scroll(index));
        }
    }

    #[test]
    fn placeholder_then_first_line() {
        let mut stream = LogStream::new();
        let recorder = Recorder::default();
        let _sub = attach(&stream, recorder.clone());

        let calls = recorder.take();
        assert_eq!(Recorder::screen(&calls), [PLACEHOLDER]);

        stream.append("server started");
        let calls = recorder.take();
        assert_eq!(
            calls,
            [
                Call::Clear,
                Call::Paint(0, "server started".to_owned()),
                Call::Scroll(0)
            ]
        );
    }

    #[test]
    fn paints_before_scrolling() {
        let mut stream = LogStream::new();
        let recorder = Recorder::default();
        let _sub = attach(&stream, recorder.clone());
        recorder.take();

        stream.append("line 1");
        stream.append("line 2");
        stream.append("line 3");

        let calls = recorder.take();
        for (i, call) in calls.iter().enumerate() {
            if let Call::Scroll(target) = call {
                let painted = calls[..i]
                    .iter()
                    .any(|n| matches!(n, Call::Paint(idx, _) if idx == target));
                assert!(painted, "scrolled to row {target} before painting it");
            }
        }
        assert_eq!(calls.last(), Some(&Call::Scroll(2)));
        assert_eq!(Recorder::screen(&calls), ["line 1", "line 2", "line 3"]);
    }

    #[test]
    fn row_indices_and_numbers() {
        let mut stream = LogStream::new();
        stream.append("line 1");
        stream.append("line 2");
        stream.append("line 3");
        let rows: Vec<_> = rows(&stream).collect();
        assert_eq!(
            rows.iter().map(|n| n.index).collect::<Vec<_>>(),
            [0, 1, 2]
        );
        assert_eq!(rows[2].line_number(), 3);
        assert_eq!(rows[0].text, "line 1");
    }

    #[test]
    fn attaching_to_existing_stream_scrolls_to_bottom() {
        let mut stream = LogStream::new();
        stream.append("a");
        stream.append("b");
        let recorder = Recorder::default();
        let _sub = attach(&stream, recorder.clone());
        let calls = recorder.take();
        assert_eq!(calls.last(), Some(&Call::Scroll(1)));
        assert_eq!(Recorder::screen(&calls), ["a", "b"]);
    }

    #[test]
    fn clear_shows_placeholder_again() {
        let mut stream = LogStream::new();
        let recorder = Recorder::default();
        let _sub = attach(&stream, recorder.clone());
        stream.append("a");
        stream.clear();
        assert_eq!(Recorder::screen(&recorder.take()), [PLACEHOLDER]);
    }

    #[test]
    fn detached_view_stops_painting() {
        let mut stream = LogStream::new();
        let recorder = Recorder::default();
        let sub = attach(&stream, recorder.clone());
        recorder.take();
        sub.unsubscribe();
        stream.append("ignored");
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn scroll_target_of_empty_is_none() {
        assert_eq!(scroll_target(0), None);
        assert_eq!(scroll_target(3), Some(2));
    }
}
