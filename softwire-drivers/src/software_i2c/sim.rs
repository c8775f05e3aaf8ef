//! Simulated open-drain bus for host tests
//!
//! Both lines are wired-AND: a line reads high only when the master, the
//! simulated target and every injected fault have let go of it. Edges are
//! fed to a register-file target that behaves like a small EEPROM: the
//! first data byte of a write sets the register pointer, further bytes are
//! stored, reads return bytes from the pointer onwards.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use softwire_core::Ack;
use softwire_hal::OpenDrainPin;

/// Address the simulated target answers to
pub const TARGET_ADDRESS: u8 = 0x50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Scl,
    Sda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Not addressed, waiting for a start condition
    Idle,
    /// Shifting in the address byte
    Address,
    /// Shifting in a data byte
    Receive,
    /// Driving (or withholding) our acknowledge bit
    AckOut,
    /// Shifting a data byte out
    Transmit,
    /// Sampling the master's acknowledge bit
    AckIn,
}

/// Register-file I2C target
pub struct Target {
    pub address: u8,
    pub registers: [u8; 256],
    /// Data bytes acknowledged per write before the target starts NACKing
    pub nack_data_after: Option<usize>,
    /// Every data byte received, pointer bytes included
    pub written: Vec<u8>,
    /// Acknowledge bits the master sent after each byte it read
    pub master_acks: Vec<Ack>,
    /// Times the target recognised its own address
    pub addressed: usize,
    sda_low: bool,
    phase: Phase,
    shift: u8,
    bits: u8,
    transmitting: bool,
    pointer: u8,
    pointer_pending: bool,
    received_in_write: usize,
}

impl Target {
    fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 256],
            nack_data_after: None,
            written: Vec::new(),
            master_acks: Vec::new(),
            addressed: 0,
            sda_low: false,
            phase: Phase::Idle,
            shift: 0,
            bits: 0,
            transmitting: false,
            pointer: 0,
            pointer_pending: false,
            received_in_write: 0,
        }
    }

    fn start(&mut self) {
        self.phase = Phase::Address;
        self.shift = 0;
        self.bits = 0;
        self.sda_low = false;
    }

    fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.sda_low = false;
    }

    fn clock_rising(&mut self, sda: bool) {
        match self.phase {
            Phase::Address | Phase::Receive => {
                self.shift = (self.shift << 1) | u8::from(sda);
                self.bits += 1;
            }
            Phase::AckIn => self.master_acks.push(Ack::from_bit(sda)),
            Phase::Idle | Phase::AckOut | Phase::Transmit => {}
        }
    }

    fn clock_falling(&mut self) {
        match self.phase {
            Phase::Address if self.bits == 8 => {
                if self.shift >> 1 == self.address {
                    self.addressed += 1;
                    self.transmitting = self.shift & 1 == 1;
                    self.pointer_pending = !self.transmitting;
                    self.received_in_write = 0;
                    self.sda_low = true;
                    self.phase = Phase::AckOut;
                } else {
                    self.phase = Phase::Idle;
                }
            }
            Phase::Receive if self.bits == 8 => {
                let byte = self.shift;
                self.written.push(byte);
                if self.pointer_pending {
                    self.pointer = byte;
                    self.pointer_pending = false;
                } else {
                    self.registers[usize::from(self.pointer)] = byte;
                    self.pointer = self.pointer.wrapping_add(1);
                }
                let refuse = self
                    .nack_data_after
                    .is_some_and(|limit| self.received_in_write >= limit);
                self.received_in_write += 1;
                self.sda_low = !refuse;
                self.phase = Phase::AckOut;
            }
            Phase::AckOut => {
                self.sda_low = false;
                if self.transmitting {
                    self.load_next_byte();
                } else {
                    self.phase = Phase::Receive;
                    self.shift = 0;
                    self.bits = 0;
                }
            }
            Phase::Transmit => {
                self.bits += 1;
                if self.bits == 8 {
                    self.sda_low = false;
                    self.phase = Phase::AckIn;
                } else {
                    self.sda_low = (self.shift << self.bits) & 0x80 == 0;
                }
            }
            Phase::AckIn => {
                if self.master_acks.last() == Some(&Ack::Ack) {
                    self.load_next_byte();
                } else {
                    self.sda_low = false;
                    self.phase = Phase::Idle;
                }
            }
            Phase::Idle | Phase::Address | Phase::Receive => {}
        }
    }

    fn load_next_byte(&mut self) {
        self.shift = self.registers[usize::from(self.pointer)];
        self.pointer = self.pointer.wrapping_add(1);
        self.bits = 0;
        self.sda_low = self.shift & 0x80 == 0;
        self.phase = Phase::Transmit;
    }
}

/// Shared bus state
pub struct Wire {
    pub target: Target,
    /// Something outside the model holds SCL low
    pub scl_stuck_low: bool,
    /// Something outside the model holds SDA low
    pub sda_stuck_low: bool,
    /// SCL reads stay low this many polls after each release (`u32::MAX` forever)
    pub stretch_reads: u32,
    /// A competing master grabs SDA after this many falling clock edges
    pub contender_after_falls: Option<usize>,
    /// The target lets go of SDA one delay after the falling clock edge
    pub data_hold: bool,
    pub rising_edges: usize,
    pub falling_edges: usize,
    pub starts: usize,
    pub stops: usize,
    master_scl_low: bool,
    master_sda_low: bool,
    stretch_remaining: u32,
    contender_low: bool,
    holding_sda: bool,
    scl: bool,
    sda: bool,
}

impl Wire {
    fn new() -> Self {
        Self {
            target: Target::new(TARGET_ADDRESS),
            scl_stuck_low: false,
            sda_stuck_low: false,
            stretch_reads: 0,
            contender_after_falls: None,
            data_hold: false,
            rising_edges: 0,
            falling_edges: 0,
            starts: 0,
            stops: 0,
            master_scl_low: false,
            master_sda_low: false,
            stretch_remaining: 0,
            contender_low: false,
            holding_sda: false,
            scl: true,
            sda: true,
        }
    }

    /// Whether the master currently pulls `line` low
    pub fn master_drives_low(&self, line: Line) -> bool {
        match line {
            Line::Scl => self.master_scl_low,
            Line::Sda => self.master_sda_low,
        }
    }

    fn scl_level(&self) -> bool {
        !(self.master_scl_low || self.scl_stuck_low || self.stretch_remaining > 0)
    }

    fn sda_level(&self) -> bool {
        !(self.master_sda_low || self.sda_stuck_low || self.contender_low || self.target.sda_low)
    }

    fn drive(&mut self, line: Line, low: bool) {
        match line {
            Line::Scl => {
                if self.master_scl_low && !low {
                    self.stretch_remaining = self.stretch_reads;
                }
                self.master_scl_low = low;
            }
            Line::Sda => self.master_sda_low = low,
        }
        self.settle();
    }

    fn sample(&mut self, line: Line) -> bool {
        if line == Line::Scl && !self.master_scl_low && self.stretch_remaining > 0 {
            if self.stretch_remaining != u32::MAX {
                self.stretch_remaining -= 1;
            }
            self.settle();
        }
        match line {
            Line::Scl => self.scl,
            Line::Sda => self.sda,
        }
    }

    /// Time passed: a held SDA is let go
    fn tick(&mut self) {
        if self.holding_sda {
            self.holding_sda = false;
            self.target.sda_low = false;
            self.settle();
        }
    }

    /// Propagate level changes to the target until nothing moves
    fn settle(&mut self) {
        loop {
            let scl = self.scl_level();
            if scl != self.scl {
                self.scl = scl;
                if scl {
                    self.rising_edges += 1;
                    self.target.clock_rising(self.sda);
                } else {
                    self.falling_edges += 1;
                    if self
                        .contender_after_falls
                        .is_some_and(|falls| self.falling_edges >= falls)
                    {
                        self.contender_low = true;
                    }
                    let was_low = self.target.sda_low;
                    self.target.clock_falling();
                    if self.data_hold && was_low && !self.target.sda_low {
                        self.target.sda_low = true;
                        self.holding_sda = true;
                    }
                }
                continue;
            }

            let sda = self.sda_level();
            if sda != self.sda {
                self.sda = sda;
                // start and stop are framed by the master's own SDA edge
                if self.scl && self.master_sda_low != sda {
                    if sda {
                        self.stops += 1;
                        self.target.stop();
                    } else {
                        self.starts += 1;
                        self.target.start();
                    }
                }
                continue;
            }

            break;
        }
    }
}

/// One end of a simulated line, held by the master
pub struct SimPin {
    wire: Rc<RefCell<Wire>>,
    line: Line,
}

impl OpenDrainPin for SimPin {
    fn set(&mut self) {
        self.wire.borrow_mut().drive(self.line, false);
    }

    fn reset(&mut self) {
        self.wire.borrow_mut().drive(self.line, true);
    }

    fn read(&mut self) -> bool {
        self.wire.borrow_mut().sample(self.line)
    }
}

/// Delay that counts simulated nanoseconds and lets the wire catch up
pub struct SimDelay {
    wire: Rc<RefCell<Wire>>,
    elapsed_ns: Rc<Cell<u64>>,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
        self.wire.borrow_mut().tick();
    }
}

/// Test bench: the wire, a clock, and the master-side handles
pub struct Bench {
    pub wire: Rc<RefCell<Wire>>,
    pub elapsed_ns: Rc<Cell<u64>>,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            wire: Rc::new(RefCell::new(Wire::new())),
            elapsed_ns: Rc::new(Cell::new(0)),
        }
    }

    /// SCL pin, SDA pin and delay wired to this bench
    pub fn parts(&self) -> (SimPin, SimPin, SimDelay) {
        (
            SimPin {
                wire: Rc::clone(&self.wire),
                line: Line::Scl,
            },
            SimPin {
                wire: Rc::clone(&self.wire),
                line: Line::Sda,
            },
            SimDelay {
                wire: Rc::clone(&self.wire),
                elapsed_ns: Rc::clone(&self.elapsed_ns),
            },
        )
    }
}
