#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # SWT Core
//!
//! Core types shared by the SWT software timer scheduler: error codes, timer
//! modes, tick-rate conversions and the per-timer configuration builder.
//! The crate has no dependencies on hardware and performs no allocation.

use core::fmt;

pub mod config;
pub mod time;

pub use config::*;
pub use time::*;

/// SWT framework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used by every control operation
pub type TimerResult<T> = Result<T, TimerError>;

/// Status codes reported by the timer control operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// The physical timer adapter has not been registered yet
    AdapterNotRegistered,
    /// The handle does not refer to a created timer
    TimerNotExist,
    /// Period is zero or exceeds [`MAX_PERIOD`]
    InvalidPeriod,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::AdapterNotRegistered => write!(f, "Physical timer adapter not registered"),
            TimerError::TimerNotExist => write!(f, "Timer does not exist"),
            TimerError::InvalidPeriod => write!(f, "Timer period out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TimerError {}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TimerError::AdapterNotRegistered => defmt::write!(fmt, "AdapterNotRegistered"),
            TimerError::TimerNotExist => defmt::write!(fmt, "TimerNotExist"),
            TimerError::InvalidPeriod => defmt::write!(fmt, "InvalidPeriod"),
        }
    }
}
