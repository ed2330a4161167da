//! Tick arithmetic, timer modes and unit conversions

use core::fmt;
use crate::{TimerError, TimerResult};

/// Largest period a timer may be configured with.
///
/// Relative times keep one bit of headroom so that adding a period to any
/// rebased relative time never overflows 32 bits.
pub const MAX_PERIOD: u32 = 0x7FFF_FFFF;

/// Relative times reaching this value force a rebase of the pending chain
pub const REBASE_THRESHOLD: u32 = 0x8000_0000;

/// Check that a period can be scheduled
pub const fn validate_period(period: u32) -> TimerResult<u32> {
    if period == 0 || period > MAX_PERIOD {
        Err(TimerError::InvalidPeriod)
    } else {
        Ok(period)
    }
}

/// Expiry mode of a software timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    /// Fire once, then return to the stopped state
    #[default]
    SingleShot,
    /// Fire every period until stopped
    Repeating,
}

impl TimerMode {
    /// Check if the timer reloads itself after firing
    pub const fn is_repeating(self) -> bool {
        matches!(self, Self::Repeating)
    }

    /// Check if the timer stops after firing
    pub const fn is_single_shot(self) -> bool {
        matches!(self, Self::SingleShot)
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleShot => write!(f, "single-shot"),
            Self::Repeating => write!(f, "repeating"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerMode {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SingleShot => defmt::write!(fmt, "SingleShot"),
            Self::Repeating => defmt::write!(fmt, "Repeating"),
        }
    }
}

/// Rate of the physical counter in ticks per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TickRate(u32);

impl TickRate {
    /// One tick per microsecond
    pub const DEFAULT: Self = Self(1_000_000);

    /// Create a tick rate
    ///
    /// A zero rate is a configuration bug and panics.
    pub const fn new(hz: u32) -> Self {
        assert!(hz > 0, "tick rate must be non-zero");
        Self(hz)
    }

    /// Get the rate in Hz
    pub const fn hz(self) -> u32 {
        self.0
    }

    /// Convert seconds to ticks
    pub const fn secs_to_ticks(self, secs: u32) -> u32 {
        saturate(secs as u64 * self.0 as u64)
    }

    /// Convert milliseconds to ticks
    pub const fn millis_to_ticks(self, millis: u32) -> u32 {
        saturate(millis as u64 * self.0 as u64 / 1_000)
    }

    /// Convert microseconds to ticks
    pub const fn micros_to_ticks(self, micros: u32) -> u32 {
        saturate(micros as u64 * self.0 as u64 / 1_000_000)
    }
}

impl Default for TickRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TickRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TickRate {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}Hz", self.0);
    }
}

const fn saturate(value: u64) -> u32 {
    if value > u32::MAX as u64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// Macro to convert compile-time durations into ticks at [`TickRate::DEFAULT`]
#[macro_export]
macro_rules! ticks {
    ($value:literal s) => {
        $crate::TickRate::DEFAULT.secs_to_ticks($value)
    };
    ($value:literal ms) => {
        $crate::TickRate::DEFAULT.millis_to_ticks($value)
    };
    ($value:literal us) => {
        $crate::TickRate::DEFAULT.micros_to_ticks($value)
    };
    ($value:literal ticks) => {
        $value
    };
}
