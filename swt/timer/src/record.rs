//! Per-timer state block and handles

use core::fmt;
use swt_core::{TimerConfig, TimerMode};

/// Non-owning reference to a timer slot.
///
/// A handle is only an index; it is checked against the queue on every
/// operation and reports `TimerNotExist` when the slot was never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(usize);

impl TimerHandle {
    /// Create a handle for a raw slot index
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Get the slot index
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerHandle {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "timer#{}", self.0);
    }
}

/// State of one logical timer
#[derive(Clone, Copy)]
pub struct TimerRecord<C> {
    /// Set once the slot has been initialized by `create`
    pub(crate) created: bool,
    /// Ticks until expiry relative to the current frame; 0 when stopped
    pub(crate) relative_time: u32,
    pub(crate) period: u32,
    pub(crate) mode: TimerMode,
    pub(crate) callback: Option<C>,
    pub(crate) arg: usize,
    pub(crate) next: Option<usize>,
    pub(crate) prev: Option<usize>,
}

impl<C> TimerRecord<C> {
    /// Slot that was never created
    pub(crate) const VACANT: Self = Self {
        created: false,
        relative_time: 0,
        period: 0,
        mode: TimerMode::SingleShot,
        callback: None,
        arg: 0,
        next: None,
        prev: None,
    };

    /// Initialize a record in the stopped state
    pub(crate) fn new(config: TimerConfig<C>) -> Self {
        Self {
            created: true,
            relative_time: 0,
            period: config.period,
            mode: config.mode,
            callback: config.callback,
            arg: config.arg,
            next: None,
            prev: None,
        }
    }

    /// Replace the parameters, leaving schedule and links untouched
    pub(crate) fn configure(&mut self, config: TimerConfig<C>) {
        self.period = config.period;
        self.mode = config.mode;
        self.callback = config.callback;
        self.arg = config.arg;
    }

    /// Ticks until expiry in the current frame, `0` when stopped
    pub fn relative_time(&self) -> u32 {
        self.relative_time
    }

    /// Reload value in ticks
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Single-shot or repeating
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Opaque argument handed to the callback
    pub fn arg(&self) -> usize {
        self.arg
    }
}

impl<C> fmt::Debug for TimerRecord<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRecord")
            .field("created", &self.created)
            .field("relative_time", &self.relative_time)
            .field("period", &self.period)
            .field("mode", &self.mode)
            .field("has_callback", &self.callback.is_some())
            .field("arg", &self.arg)
            .field("next", &self.next)
            .field("prev", &self.prev)
            .finish()
    }
}
