//! Open-drain GPIO abstraction
//!
//! Both I2C lines are open-drain: a party can only pull a line low or let
//! go of it. The line reads high only when every party has let go.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};

/// Open-drain capable pin
///
/// Implementations must never actively drive the line high. `set()` hands
/// the line to the pull-up resistor, `reset()` pulls it to ground.
pub trait OpenDrainPin {
    /// Release the line (it floats high unless someone else holds it low)
    fn set(&mut self);

    /// Pull the line low
    fn reset(&mut self);

    /// Sample the electrical level on the line
    ///
    /// Takes `&mut self` because GPIO reads go through the HAL's input
    /// register accessors, which require mutable access in embedded-hal 1.0.
    fn read(&mut self) -> bool;

    /// Check if the line reads high
    fn is_high(&mut self) -> bool {
        self.read()
    }

    /// Check if the line reads low
    fn is_low(&mut self) -> bool {
        !self.read()
    }
}

/// Adapter for embedded-hal 1.0 pins configured as open-drain outputs
///
/// The wrapped pin must already be in open-drain mode with a pull-up (on
/// chip or external). Only infallible pins are accepted; every mainstream
/// HAL uses `Infallible` for plain GPIO.
pub struct EmbeddedHalPin<P> {
    pin: P,
}

impl<P> EmbeddedHalPin<P>
where
    P: OutputPin<Error = Infallible> + InputPin<Error = Infallible>,
{
    /// Wrap an open-drain pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

impl<P> OpenDrainPin for EmbeddedHalPin<P>
where
    P: OutputPin<Error = Infallible> + InputPin<Error = Infallible>,
{
    fn set(&mut self) {
        infallible(self.pin.set_high());
    }

    fn reset(&mut self) {
        infallible(self.pin.set_low());
    }

    fn read(&mut self) -> bool {
        infallible(self.pin.is_high())
    }
}
