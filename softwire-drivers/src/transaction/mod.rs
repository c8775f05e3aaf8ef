//! Ready-made transactions
//!
//! - [`WriteRead`] - borrowed write and read buffers, optionally joined by a
//!   repeated start; also the address-only presence probe
//! - [`Operations`] - an `embedded-hal` operation list

mod buffer;
mod operations;

pub use buffer::WriteRead;
pub use operations::Operations;
