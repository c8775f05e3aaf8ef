//! Events that trigger state transitions

use super::machine::ErrorKind;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Lifecycle events
    /// A transaction was accepted by the controller
    Attach,

    // Cursor events (the transaction's answer to "what next")
    /// Continue with the write phase
    Write,
    /// Continue with the read phase
    Read,
    /// Issue a repeated start
    Restart,
    /// Close the transaction with a stop condition
    Stop,
    /// Stop condition completed, bus released
    Stopped,

    // Fault events
    /// Bus or slave fault aborted the transaction
    Fault(ErrorKind),
    /// Caller forced the bus back to idle
    Reset,
}
