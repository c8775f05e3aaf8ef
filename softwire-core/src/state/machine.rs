//! State machine definition
//!
//! Every bus action the controller takes is a function of the current
//! state and the transaction's answer to "what next".

use super::events::Event;

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No transaction attached, lines released
    Idle,
    /// Generating a (repeated) start condition and sending the address
    Starting,
    /// Shifting data bytes out to the slave
    Writing,
    /// Shifting data bytes in from the slave
    Reading,
    /// Generating the stop condition
    Stopping,
    /// Transaction aborted; lines released, cause recorded
    Error(ErrorKind),
}

/// Why a transaction was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// A line was low when the protocol needed it released
    BusCondition,
    /// Another bus participant overrode a driven bit
    ArbitrationLost,
    /// A slave held the clock low past the polling budget
    ClockStretchTooLong,
    /// No slave acknowledged the address byte
    AddressNack,
    /// The slave refused a data byte
    DataNack,
}

impl ErrorKind {
    /// Check if the slave declined rather than the bus misbehaving
    ///
    /// A NACK leaves a healthy bus with a listening slave behind, so the
    /// master may still close the transaction with a stop condition.
    pub fn is_nack(&self) -> bool {
        matches!(self, ErrorKind::AddressNack | ErrorKind::DataNack)
    }
}

impl State {
    /// Check if a transaction is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            State::Starting | State::Writing | State::Reading | State::Stopping
        )
    }

    /// Check if this is an error state
    pub fn is_error(&self) -> bool {
        matches!(self, State::Error(_))
    }

    /// Error recorded by the last transaction, if any
    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            State::Error(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Process an event and return the next state
    ///
    /// This is the core state transition logic.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // A new transaction may follow a clean stop or a recorded error
            (Idle, Attach) => Starting,
            (Error(_), Attach) => Starting,

            // Starting transitions (address acknowledged)
            (Starting, Write) => Writing,
            (Starting, Read) => Reading,
            (Starting, Stop) => Stopping,

            // Writing transitions
            (Writing, Restart) => Starting,
            (Writing, Stop) => Stopping,

            // Reading transitions
            (Reading, Restart) => Starting,
            (Reading, Stop) => Stopping,

            // Stopping transitions
            (Stopping, Stopped) => Idle,

            // Faults abort any transaction in flight
            (Starting | Writing | Reading | Stopping, Fault(kind)) => Error(kind),

            // Reset is honoured from everywhere
            (_, Reset) => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
