//! Board-agnostic core logic for the softwire I2C master
//!
//! This crate contains everything about the bit-banged master that does
//! not touch a pin:
//!
//! - Controller state machine and error taxonomy
//! - Transaction contract the controller walks through its phases
//! - Bus timing (delay unit derived from the requested bit rate)

#![no_std]
#![deny(unsafe_code)]

pub mod state;
pub mod timing;
pub mod transaction;

pub use state::{ErrorKind, Event, State};
pub use timing::BusTiming;
pub use transaction::{Ack, AfterStart, AfterTransfer, DetachCause, Starting, Transaction};
