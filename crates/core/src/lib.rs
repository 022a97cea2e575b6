//! # Chorebot Core
//!
//! Domain types, traits, and error definitions for the Chorebot chore
//! rotation service. This crate has **no I/O**: it defines the domain model
//! that the store, engine, channel and gateway crates implement against.
//!
//! ## Contents
//!
//! - [`calendar`]: the week partitioner (pure calendar arithmetic)
//! - [`roster`]: the fixed, ordered roommate list
//! - [`cursor`] / [`schedule`]: the two persisted records
//! - [`store`]: the `StateStore` trait the engine is given
//! - [`channel`] / [`message`]: chat platform abstraction and reply model

pub mod calendar;
pub mod channel;
pub mod cursor;
pub mod error;
pub mod message;
pub mod roster;
pub mod schedule;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use calendar::{ChoreWeek, MonthKey, calendar_weeks, partition};
pub use channel::{Channel, ChannelId, ChannelMessage};
pub use cursor::RotationCursor;
pub use error::{CalendarError, ChannelError, PersistenceError, RosterError};
pub use message::{CardRow, OutboundMessage, QuickReply};
pub use roster::Roster;
pub use schedule::{Assignment, MonthRecord, MonthSchedule, ScheduleBook};
pub use store::StateStore;
