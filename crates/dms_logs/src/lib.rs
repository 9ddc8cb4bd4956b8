//! # Live log streams for the DMS dashboard
//!
//! - [`LogStream`]: the ordered log buffer of one dashboard session,
//!   with synchronous change notification
//! - [`view`]: binds a stream to a [`view::Renderer`] that paints rows
//!   and scrolls to the newest one
//! - [`Console`]: a log stream with a command line on top
//! - [`transport`]: feeds lines from a running server process
//! - [`upload`]: shares a log on <https://mclo.gs>

mod console;
mod stream;
pub mod transport;
pub mod upload;
pub mod view;

pub use console::Console;
pub use stream::{LogChange, LogEntry, LogStream, StreamState, Subscription};
