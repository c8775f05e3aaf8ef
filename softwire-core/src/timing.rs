//! Bus timing
//!
//! The bit period is split into four equal quarters. Data changes while the
//! clock is low, is sampled while it is high, and each phase lasts two
//! quarters. Everything downstream busy-waits in multiples of the quarter.

/// Nanoseconds in a quarter bit period at 1 bit/s
///
/// `10^9 / 4`: one second split over the four quarters of a bit.
pub const QUARTER_PERIOD_NS_AT_1_BPS: u32 = 250_000_000;

/// Timing derived from the requested bit rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusTiming {
    /// Quarter bit period in nanoseconds, never zero
    quarter_ns: u32,
    /// Quarter-period polls a slave may hold the clock low
    stretch_budget: u16,
}

impl BusTiming {
    /// Compute timing for `baudrate` bits per second
    ///
    /// The quarter period floors at 1 ns so absurd rates still make
    /// forward progress. A rate of 0 is treated as 1 bit/s.
    pub fn new(baudrate: u32, stretch_budget: u16) -> Self {
        let quarter_ns = (QUARTER_PERIOD_NS_AT_1_BPS / baudrate.max(1)).max(1);
        Self {
            quarter_ns,
            stretch_budget,
        }
    }

    /// Quarter bit period in nanoseconds
    pub fn quarter_period_ns(&self) -> u32 {
        self.quarter_ns
    }

    /// Half bit period in nanoseconds
    pub fn half_period_ns(&self) -> u32 {
        self.quarter_ns.saturating_mul(2)
    }

    /// Polling budget for clock stretching
    pub fn stretch_budget(&self) -> u16 {
        self.stretch_budget
    }

    /// Longest time a slave may stretch one clock pulse, in nanoseconds
    pub fn stretch_timeout_ns(&self) -> u64 {
        u64::from(self.stretch_budget) * u64::from(self.quarter_ns)
    }

    /// Bit rate actually produced by the integer delay unit
    pub fn achieved_baudrate(&self) -> u32 {
        QUARTER_PERIOD_NS_AT_1_BPS / self.quarter_ns
    }

    /// Check if the achieved rate lies within `tolerance_percent` of `baudrate`
    pub fn within_tolerance(&self, baudrate: u32, tolerance_percent: u8) -> bool {
        let requested = u64::from(baudrate.max(1));
        let achieved = u64::from(self.achieved_baudrate());
        let deviation = requested.abs_diff(achieved);
        deviation * 100 <= requested * u64::from(tolerance_percent)
    }
}
