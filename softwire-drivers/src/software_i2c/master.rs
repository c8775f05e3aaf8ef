//! Transaction controller
//!
//! Drives one caller-supplied [`Transaction`] from start condition to stop
//! condition. All mutable state lives in the master instance, behind `Cell`
//! and `RefCell`, so the public API takes `&self` and a transaction callback
//! may safely call back into the master (`start()` reports `Busy`,
//! `reset()` aborts the running transfer).

use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{self, NoAcknowledgeSource};
use softwire_core::{
    Ack, AfterStart, AfterTransfer, BusTiming, DetachCause, ErrorKind, Event, State, Transaction,
};
use softwire_hal::{I2cConfig, OpenDrainPin};

use super::bus::Bus;

/// Callback run once per accepted transaction, before the start condition
///
/// Typically switches pin modes or bus multiplexers.
pub type ConfigurationHandler = fn();

/// Reason a `start()` call did not complete the transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Another transaction is attached
    Busy,
    /// The transaction refused to attach
    Rejected,
    /// `reset()` was called while the transaction was running
    Aborted,
    /// The transfer failed on the bus
    Bus(ErrorKind),
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::Bus(kind)
    }
}

impl i2c::Error for Error {
    fn kind(&self) -> i2c::ErrorKind {
        match self {
            Error::Bus(ErrorKind::BusCondition) => i2c::ErrorKind::Bus,
            Error::Bus(ErrorKind::ArbitrationLost) => i2c::ErrorKind::ArbitrationLoss,
            Error::Bus(ErrorKind::AddressNack) => {
                i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            Error::Bus(ErrorKind::DataNack) => {
                i2c::ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
            }
            Error::Bus(ErrorKind::ClockStretchTooLong)
            | Error::Busy
            | Error::Rejected
            | Error::Aborted => i2c::ErrorKind::Other,
        }
    }
}

/// Controller cursor: what the bus does next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Restart,
    Write,
    Read,
    Stop,
}

impl From<AfterStart> for Operation {
    fn from(next: AfterStart) -> Self {
        match next {
            AfterStart::Write => Operation::Write,
            AfterStart::Read => Operation::Read,
            AfterStart::Stop => Operation::Stop,
        }
    }
}

impl From<AfterTransfer> for Operation {
    fn from(next: AfterTransfer) -> Self {
        match next {
            AfterTransfer::Restart => Operation::Restart,
            AfterTransfer::Stop => Operation::Stop,
        }
    }
}

impl From<Operation> for Event {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Restart => Event::Restart,
            Operation::Write => Event::Write,
            Operation::Read => Event::Read,
            Operation::Stop => Event::Stop,
        }
    }
}

/// Bit-banged I2C bus master
///
/// Owns the SCL and SDA lines and the delay provider. Several instances on
/// different pins are fully independent.
pub struct SoftwareI2cMaster<SCL, SDA, D> {
    bus: RefCell<Bus<SCL, SDA, D>>,
    timing: BusTiming,
    state: Cell<State>,
}

impl<SCL, SDA, D> SoftwareI2cMaster<SCL, SDA, D>
where
    SCL: OpenDrainPin,
    SDA: OpenDrainPin,
    D: DelayNs,
{
    /// Create a new master and release both lines
    pub fn new(scl: SCL, sda: SDA, delay: D, config: I2cConfig) -> Self {
        let timing = BusTiming::new(config.frequency, config.stretch_budget);
        if !timing.within_tolerance(config.frequency, config.tolerance_percent) {
            warn!(
                "i2c: requested {} Hz, delay unit gives {} Hz",
                config.frequency,
                timing.achieved_baudrate()
            );
        }

        let mut bus = Bus::new(scl, sda, delay, timing);
        bus.release();

        Self {
            bus: RefCell::new(bus),
            timing,
            state: Cell::new(State::Idle),
        }
    }

    /// Timing the master was configured with
    pub fn timing(&self) -> BusTiming {
        self.timing
    }

    /// Current controller state
    pub fn state(&self) -> State {
        self.state.get()
    }

    /// Error recorded by the last transaction, if it failed
    pub fn error_state(&self) -> Option<ErrorKind> {
        self.state.get().error()
    }

    /// Check if a transaction is attached
    pub fn is_busy(&self) -> bool {
        self.state.get().is_busy()
    }

    /// Give back the pins and the delay
    pub fn free(self) -> (SCL, SDA, D) {
        self.bus.into_inner().free()
    }

    /// Run `transaction` to completion
    ///
    /// Blocks until the stop condition has been sent or the transfer
    /// failed. The optional `handler` runs once the transaction agreed to
    /// attach, before the start condition.
    pub fn start(
        &self,
        transaction: &mut dyn Transaction,
        handler: Option<ConfigurationHandler>,
    ) -> Result<(), Error> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let Ok(mut bus) = self.bus.try_borrow_mut() else {
            return Err(Error::Busy);
        };

        if !transaction.attaching() {
            transaction.detaching(DetachCause::FailedToAttach);
            return Err(Error::Rejected);
        }

        if let Some(handler) = handler {
            handler();
        }

        self.apply(Event::Attach);

        match self.drive(&mut bus, transaction) {
            Ok(()) => {
                transaction.detaching(DetachCause::NormalStop);
                Ok(())
            }
            Err(Error::Bus(kind)) => {
                self.error(&mut bus, transaction, kind);
                Err(Error::Bus(kind))
            }
            Err(error) => {
                debug!("i2c: transaction aborted");
                bus.release();
                transaction.detaching(DetachCause::ErrorCondition);
                Err(error)
            }
        }
    }

    /// Release both lines and return to `Idle`
    ///
    /// Clears any recorded error. Called from inside a transaction callback
    /// it makes the running `start()` return `Aborted` at the next phase
    /// boundary.
    pub fn reset(&self) {
        if let Ok(mut bus) = self.bus.try_borrow_mut() {
            bus.release();
        }
        self.apply(Event::Reset);
        debug!("i2c: reset");
    }

    fn apply(&self, event: Event) {
        self.state.set(self.state.get().transition(event));
    }

    fn check_attached(&self) -> Result<(), Error> {
        if self.is_busy() {
            Ok(())
        } else {
            Err(Error::Aborted)
        }
    }

    fn drive(
        &self,
        bus: &mut Bus<SCL, SDA, D>,
        transaction: &mut dyn Transaction,
    ) -> Result<(), Error> {
        let mut operation = Operation::Restart;
        let mut restarts = 0u32;

        loop {
            self.check_attached()?;

            operation = match operation {
                Operation::Restart => {
                    let starting = transaction.starting();
                    self.check_attached()?;

                    if restarts == 0 {
                        debug!("i2c: start {=u8:#x}", starting.address);
                    } else {
                        trace!("i2c: repeated start {=u8:#x}", starting.address);
                    }
                    restarts += 1;

                    bus.start_condition()?;
                    if bus.write(starting.address_byte())? == Ack::Nack {
                        return Err(ErrorKind::AddressNack.into());
                    }
                    starting.next.into()
                }
                Operation::Write => {
                    transaction.writing();
                    loop {
                        let next = transaction.next_write();
                        self.check_attached()?;
                        let Some(byte) = next else { break };
                        if bus.write(byte)? == Ack::Nack {
                            return Err(ErrorKind::DataNack.into());
                        }
                    }
                    transaction.after_write().into()
                }
                Operation::Read => {
                    transaction.reading();
                    loop {
                        let next = transaction.next_read();
                        self.check_attached()?;
                        let Some(ack) = next else { break };
                        let byte = bus.read(ack)?;
                        transaction.read_completed(byte);
                    }
                    transaction.after_read().into()
                }
                Operation::Stop => {
                    bus.stop_condition()?;
                    self.apply(Event::Stopped);
                    return Ok(());
                }
            };

            self.check_attached()?;
            self.apply(operation.into());
        }
    }

    fn error(
        &self,
        bus: &mut Bus<SCL, SDA, D>,
        transaction: &mut dyn Transaction,
        kind: ErrorKind,
    ) {
        warn!("i2c: transaction failed: {}", kind);

        // the addressed slave is still listening and expects a stop
        if kind.is_nack() && bus.stop_condition().is_err() {
            debug!("i2c: stop after NACK failed");
        }
        bus.release();

        self.apply(Event::Fault(kind));
        transaction.detaching(DetachCause::ErrorCondition);
    }
}
