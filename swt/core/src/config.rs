//! Per-timer configuration

use crate::TimerMode;

/// Parameters of a software timer.
///
/// `C` is the callback type; the scheduler crate fixes it to a function
/// pointer that receives the timer queue. Both the callback and the
/// argument are opaque to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig<C> {
    /// Reload value in ticks
    pub period: u32,
    pub mode: TimerMode,
    /// Invoked on expiry; `None` makes expiry a no-op
    pub callback: Option<C>,
    pub arg: usize,
}

impl<C> TimerConfig<C> {
    /// Creates a new timer configuration builder.
    pub fn builder() -> TimerConfigBuilder<C> {
        TimerConfigBuilder::default()
    }

    /// Single-shot timer without a callback.
    pub const fn single_shot(period: u32) -> Self {
        Self {
            period,
            mode: TimerMode::SingleShot,
            callback: None,
            arg: 0,
        }
    }

    /// Repeating timer without a callback.
    pub const fn repeating(period: u32) -> Self {
        Self {
            period,
            mode: TimerMode::Repeating,
            callback: None,
            arg: 0,
        }
    }

    /// Replaces the callback and its argument.
    pub fn with_callback(mut self, callback: C, arg: usize) -> Self {
        self.callback = Some(callback);
        self.arg = arg;
        self
    }
}

impl<C> Default for TimerConfig<C> {
    fn default() -> Self {
        Self::single_shot(1)
    }
}

/// Builder for ergonomic timer configuration construction.
#[derive(Debug, Clone)]
pub struct TimerConfigBuilder<C> {
    config: TimerConfig<C>,
}

impl<C> Default for TimerConfigBuilder<C> {
    fn default() -> Self {
        Self {
            config: TimerConfig::default(),
        }
    }
}

impl<C> TimerConfigBuilder<C> {
    /// Sets the period in ticks.
    pub fn period(mut self, ticks: u32) -> Self {
        self.config.period = ticks;
        self
    }

    /// Sets the expiry mode.
    pub fn mode(mut self, mode: TimerMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Sets the expiry callback.
    pub fn callback(mut self, callback: C) -> Self {
        self.config.callback = Some(callback);
        self
    }

    /// Sets the opaque callback argument.
    pub fn arg(mut self, arg: usize) -> Self {
        self.config.arg = arg;
        self
    }

    /// Builds the final configuration.
    pub fn build(self) -> TimerConfig<C> {
        self.config
    }
}
