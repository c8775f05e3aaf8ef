//! Emulated open-drain pin

use embassy_rp::gpio::{Flex, Pin, Pull};
use embassy_rp::Peri;
use softwire_hal::OpenDrainPin;

/// Flexible GPIO used as an open-drain line
///
/// Starts released. The internal pull-up (50-80 kOhm) is only good enough
/// for short wires at low rates; use external pull-ups for anything else.
pub struct OpenDrainFlex<'d> {
    pin: Flex<'d>,
}

impl<'d> OpenDrainFlex<'d> {
    /// Create a new open-drain pin, optionally enabling the internal pull-up
    pub fn new(pin: Peri<'d, impl Pin>, pull_up: bool) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_pull(if pull_up { Pull::Up } else { Pull::None });
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }
}

impl OpenDrainPin for OpenDrainFlex<'_> {
    fn set(&mut self) {
        self.pin.set_as_input();
    }

    fn reset(&mut self) {
        // output latch stays low, enabling the driver pulls the line down
        self.pin.set_as_output();
    }

    fn read(&mut self) -> bool {
        self.pin.is_high()
    }
}
