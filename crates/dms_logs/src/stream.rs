use std::{
    cell::{Cell, RefCell},
    fmt::Display,
    rc::{Rc, Weak},
};

/// A single line of log output.
///
/// Its position isn't stored: it's the entry's
/// index in [`LogStream::current_entries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry(String);

impl LogEntry {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl From<String> for LogEntry {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LogEntry {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl PartialEq<&str> for LogEntry {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to a [`LogStream`], passed to every observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogChange<'a> {
    /// `entry` is now the last entry, at `index`.
    Appended { index: usize, entry: &'a LogEntry },
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Nothing received yet (or cleared). Views show a placeholder.
    Empty,
    Streaming,
}

type Callback = Rc<RefCell<dyn FnMut(&LogChange<'_>)>>;

struct Observer {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Callback,
}

#[derive(Default)]
struct Observers {
    next_id: Cell<u64>,
    list: RefCell<Vec<Observer>>,
}

/// The ordered, append-only log buffer of one dashboard session.
///
/// Entries are never reordered or modified once appended;
/// the buffer only grows, or is emptied all at once with [`LogStream::clear`].
///
/// Observers registered with [`LogStream::subscribe`] are called
/// synchronously after every mutation, in subscription order,
/// once the mutation is visible through [`LogStream::current_entries`].
///
/// A stream belongs to the session that created it,
/// so it's neither `Send` nor `Sync`.
#[derive(Default)]
pub struct LogStream {
    entries: Vec<LogEntry>,
    observers: Rc<Observers>,
}

impl LogStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `line` as the new last entry. Any text is allowed,
    /// including empty strings.
    pub fn append(&mut self, line: impl Into<String>) {
        self.entries.push(LogEntry(line.into()));
        let index = self.entries.len() - 1;
        self.notify(&LogChange::Appended {
            index,
            entry: &self.entries[index],
        });
    }

    /// Empties the buffer. Observers are notified even if
    /// it was already empty.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.notify(&LogChange::Cleared);
    }

    #[must_use]
    pub fn current_entries(&self) -> &[LogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> StreamState {
        if self.entries.is_empty() {
            StreamState::Empty
        } else {
            StreamState::Streaming
        }
    }

    /// Registers `observer` to be called once for
    /// every future [`LogStream::append`] and [`LogStream::clear`].
    pub fn subscribe(&self, observer: impl FnMut(&LogChange<'_>) + 'static) -> Subscription {
        let id = self.observers.next_id.get();
        self.observers.next_id.set(id + 1);
        let active = Rc::new(Cell::new(true));

        let mut list = self.observers.list.borrow_mut();
        list.retain(|n| n.active.get());
        list.push(Observer {
            id,
            active: active.clone(),
            callback: Rc::new(RefCell::new(observer)),
        });

        Subscription {
            id,
            active,
            observers: Rc::downgrade(&self.observers),
        }
    }

    fn notify(&self, change: &LogChange<'_>) {
        // Snapshot so observers may unsubscribe each other mid-round.
        let round: Vec<(Rc<Cell<bool>>, Callback)> = self
            .observers
            .list
            .borrow()
            .iter()
            .map(|n| (n.active.clone(), n.callback.clone()))
            .collect();

        for (active, callback) in round {
            if !active.get() {
                continue;
            }
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(change);
            };
        }
    }
}

/// Handle returned by [`LogStream::subscribe`].
///
/// Dropping it does **not** remove the observer,
/// call [`Subscription::unsubscribe`] for that.
#[must_use = "the observer stays registered until `unsubscribe` is called"]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
    observers: Weak<Observers>,
}

impl Subscription {
    /// Removes the observer. Once this returns, it won't be called again,
    /// even if a notification round is in progress.
    pub fn unsubscribe(self) {
        self.active.set(false);
        if let Some(observers) = self.observers.upgrade() {
            if let Ok(mut list) = observers.list.try_borrow_mut() {
                list.retain(|n| n.id != self.id);
            };
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get() && self.observers.strong_count() > 0
    }
}
