//! Line-level bus primitives
//!
//! Owns the two open-drain lines and the delay provider. All waiting is
//! busy-waiting in quarter or half bit periods; nothing here yields.

use embedded_hal::delay::DelayNs;
use softwire_core::{BusTiming, ErrorKind};
use softwire_hal::OpenDrainPin;

/// SCL, SDA and the delay, plus the timing they are clocked with
pub(crate) struct Bus<SCL, SDA, D> {
    pub(crate) scl: SCL,
    pub(crate) sda: SDA,
    delay: D,
    timing: BusTiming,
}

impl<SCL, SDA, D> Bus<SCL, SDA, D>
where
    SCL: OpenDrainPin,
    SDA: OpenDrainPin,
    D: DelayNs,
{
    /// Create a new bus; the lines are left as they are
    pub(crate) fn new(scl: SCL, sda: SDA, delay: D, timing: BusTiming) -> Self {
        Self {
            scl,
            sda,
            delay,
            timing,
        }
    }

    /// Give back the pins and the delay
    pub(crate) fn free(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }

    /// Quarter bit period
    pub(crate) fn delay4(&mut self) {
        self.delay.delay_ns(self.timing.quarter_period_ns());
    }

    /// Half bit period
    pub(crate) fn delay2(&mut self) {
        self.delay.delay_ns(self.timing.half_period_ns());
    }

    /// Let go of both lines, SCL first
    pub(crate) fn release(&mut self) {
        self.scl.set();
        self.delay2();
        self.sda.set();
        self.delay2();
    }

    /// Release SCL and wait for it to actually go high
    ///
    /// A slave may hold SCL low to stretch the clock. SCL is polled once
    /// per quarter period, at most `stretch_budget` times. Returns `false`
    /// if SCL is still low once the budget is spent.
    pub(crate) fn scl_set_and_wait(&mut self) -> bool {
        self.scl.set();
        let mut budget = self.timing.stretch_budget();
        while self.scl.is_low() {
            if budget == 0 {
                return false;
            }
            budget -= 1;
            self.delay4();
        }
        true
    }

    /// Generate a start (or repeated start) condition
    ///
    /// Both lines must be seen high before SDA is pulled low. Leaves SCL
    /// low, ready for the first data bit.
    pub(crate) fn start_condition(&mut self) -> Result<(), ErrorKind> {
        self.sda.set();
        // a slave may still hold its last bit for the data hold time
        self.delay4();
        if self.sda.is_low() {
            return Err(ErrorKind::BusCondition);
        }
        if !self.scl_set_and_wait() {
            return Err(ErrorKind::BusCondition);
        }
        // a repeated start may find SDA still held by the slave
        if self.sda.is_low() {
            return Err(ErrorKind::BusCondition);
        }

        self.delay2();
        self.sda.reset();
        self.delay2();
        self.scl.reset();
        self.delay2();
        Ok(())
    }

    /// Generate a stop condition and check that SDA came back high
    pub(crate) fn stop_condition(&mut self) -> Result<(), ErrorKind> {
        self.scl.reset();
        self.sda.reset();
        self.delay2();
        if !self.scl_set_and_wait() {
            return Err(ErrorKind::BusCondition);
        }
        self.delay2();
        self.sda.set();
        self.delay2();
        if self.sda.is_low() {
            return Err(ErrorKind::BusCondition);
        }
        Ok(())
    }
}
