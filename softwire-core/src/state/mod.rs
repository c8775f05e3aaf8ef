//! Controller state machine
//!
//! Tracks where the master is inside a transaction. The state is explicit,
//! finite, and deterministic; the controller only moves it through events.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{ErrorKind, State};
