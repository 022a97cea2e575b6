//! Chat command handling for Chorebot.
//!
//! Turns a user's message into a rotation engine call and the engine's
//! answer into reply messages:
//! - [`command`]: text → [`Command`]
//! - [`dispatcher`]: [`Command`] → engine → replies
//! - [`render`]: schedules, menus and status as reply messages

pub mod command;
pub mod dispatcher;
pub mod render;

pub use command::{Command, ParseError, parse};
pub use dispatcher::Dispatcher;
