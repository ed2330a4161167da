//! Timer queue: control operations and the expiry interrupt handler
//!
//! Relative times of pending timers are offsets within a frame whose zero
//! is an implicit rebase point. The head's relative time minus the
//! hardware counter's remaining ticks is the current position in that
//! frame. Timers are inserted at `position + period`; when that sum would
//! reach [`REBASE_THRESHOLD`] the whole chain is shifted down by the
//! current position first, which moves the frame's zero to "now".

use critical_section::CriticalSection;
use heapless::Vec;
use log::{debug, trace, warn};
use swt_core::{validate_period, TimerConfig, TimerError, TimerMode, TimerResult, REBASE_THRESHOLD};

use crate::adapter::PhysicalTimer;
use crate::chain::TimerChain;
use crate::record::{TimerHandle, TimerRecord};

/// Expiry callback.
///
/// Receives the queue itself so it may start, stop or update timers from
/// interrupt context, the critical section the interrupt runs in, and the
/// timer's opaque argument.
pub type TimerCallback<T, const N: usize> = fn(&mut TimerQueue<T, N>, CriticalSection<'_>, usize);

/// Configuration accepted by [`TimerQueue::create`] and [`TimerQueue::update`]
pub type QueueConfig<T, const N: usize> = TimerConfig<TimerCallback<T, N>>;

/// Software timers multiplexed onto one physical timer.
///
/// Holds up to `N` timer records and the sorted chain of pending ones. All
/// operations that touch the chain take a [`CriticalSection`] token: the
/// caller proves the timer interrupt is masked for the duration.
pub struct TimerQueue<T, const N: usize> {
    chain: TimerChain<TimerCallback<T, N>, N>,
    adapter: Option<T>,
}

impl<T, const N: usize> TimerQueue<T, N> {
    /// Create an empty queue with no adapter registered
    pub const fn new() -> Self {
        Self {
            chain: TimerChain::new(),
            adapter: None,
        }
    }
}

impl<T, const N: usize> Default for TimerQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PhysicalTimer, const N: usize> TimerQueue<T, N> {
    /// Create a queue driving `adapter`
    pub fn with_adapter(adapter: T) -> Self {
        let mut queue = Self::new();
        queue.register_adapter(adapter);
        queue
    }

    /// Register the physical timer. Timers cannot start before this.
    pub fn register_adapter(&mut self, adapter: T) {
        debug!("physical timer registered");
        self.adapter = Some(adapter);
    }

    pub fn adapter(&self) -> Option<&T> {
        self.adapter.as_ref()
    }

    pub fn adapter_mut(&mut self) -> Option<&mut T> {
        self.adapter.as_mut()
    }

    /// Initialize `slot` as a stopped timer and return its handle.
    ///
    /// Re-creating a slot that is still pending stops it first, which may
    /// re-arm the hardware.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below the queue capacity `N`.
    pub fn create(
        &mut self,
        _cs: CriticalSection<'_>,
        slot: usize,
        config: QueueConfig<T, N>,
    ) -> TimerHandle {
        assert!(slot < N, "timer slot {} out of range (capacity {})", slot, N);

        if self.chain.is_linked(slot) {
            self.detach(slot);
        }
        self.chain.install(slot, TimerRecord::new(config));

        let handle = TimerHandle::from_index(slot);
        debug!("create {}: period {} ticks, {}", handle, config.period, config.mode);
        handle
    }

    /// Replace the parameters of a timer.
    ///
    /// A stopped timer is reconfigured in place. A pending timer is
    /// stopped, reconfigured and started again, so its next expiry is one
    /// new period after this call.
    pub fn update(
        &mut self,
        _cs: CriticalSection<'_>,
        handle: TimerHandle,
        config: QueueConfig<T, N>,
    ) -> TimerResult<()> {
        let idx = self.slot(handle)?;

        if !self.chain.is_linked(idx) {
            if let Some(record) = self.chain.get_mut(idx) {
                record.configure(config);
            }
            debug!("update {}: stopped, period {} ticks", handle, config.period);
            return Ok(());
        }

        let period = validate_period(config.period).inspect_err(|_| {
            warn!("update {} rejected: period {} out of range", handle, config.period);
        })?;
        self.require_adapter()?;

        self.detach(idx);
        if let Some(record) = self.chain.get_mut(idx) {
            record.configure(config);
        }
        self.schedule(idx, period);

        debug!("update {}: restarted with period {} ticks", handle, period);
        Ok(())
    }

    /// Start a timer, or restart it if already pending.
    ///
    /// The timer expires one period from now. When it becomes the soonest
    /// deadline the hardware is re-armed for it.
    pub fn start(&mut self, _cs: CriticalSection<'_>, handle: TimerHandle) -> TimerResult<()> {
        let idx = self.slot(handle)?;
        let period = validate_period(self.chain.record(idx).period).inspect_err(|_| {
            warn!("start {} rejected: period out of range", handle);
        })?;
        self.require_adapter()?;

        if self.chain.is_linked(idx) {
            self.detach(idx);
        }
        self.schedule(idx, period);

        debug!("start {}: expires in {} ticks", handle, period);
        Ok(())
    }

    /// Stop a timer. Stopping a stopped timer does nothing.
    pub fn stop(&mut self, _cs: CriticalSection<'_>, handle: TimerHandle) -> TimerResult<()> {
        let idx = self.slot(handle)?;
        if !self.chain.is_linked(idx) {
            return Ok(());
        }
        self.require_adapter()?;

        self.detach(idx);
        debug!("stop {}", handle);
        Ok(())
    }

    /// Expiry handler, called from the physical timer's interrupt vector.
    ///
    /// Fires every timer due at the deadline that just elapsed, in chain
    /// order. Single-shot timers leave the chain; repeating ones are moved
    /// one period ahead. The hardware is re-armed for the next deadline
    /// before each callback runs, so callbacks observe a consistent queue.
    ///
    /// The head is due while the counter still reads `0`: any re-arm, by
    /// this loop or by a callback, ends the episode. Callbacks may start,
    /// stop or update timers, including the one that fired.
    pub fn on_interrupt(&mut self, cs: CriticalSection<'_>) {
        if self.chain.is_empty() {
            warn!("spurious timer interrupt: no pending timer");
            return;
        }
        if !self.head_due() {
            warn!("spurious timer interrupt: counter still running");
            return;
        }

        while let Some(head) = self.chain.head() {
            if !self.head_due() {
                break;
            }

            let mut time = self.chain.time(head);
            let record = self.chain.record(head);
            let callback = record.callback;
            let arg = record.arg;
            let period = record.period;
            let mode = record.mode;

            match mode {
                TimerMode::SingleShot => {
                    self.chain.remove(head);
                    trace!("timer#{} expired", head);
                }
                TimerMode::Repeating => {
                    time = self.reframe(time, period);
                    let next_time = time + period;
                    self.chain.set_time(head, next_time);

                    if let Some(next) = self.chain.next_of(head) {
                        if next_time > self.chain.time(next) {
                            self.chain.unlink(head);
                            self.chain.insert_sorted(head, Some(next));
                        }
                    }
                    trace!("timer#{} expired, next at {}", head, next_time);
                }
            }

            match self.chain.head() {
                Some(next) => {
                    let next_time = self.chain.time(next);
                    if next_time != time {
                        self.arm(next_time - time);
                    }
                }
                None => self.arm(0),
            }

            if let Some(callback) = callback {
                callback(self, cs, arg);
            }
        }
    }

    /// Check if a timer is pending
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.chain.get(handle.index()).is_some() && self.chain.is_linked(handle.index())
    }

    /// Get a created timer's record
    pub fn record(&self, handle: TimerHandle) -> Option<&TimerRecord<TimerCallback<T, N>>> {
        self.chain.get(handle.index())
    }

    /// Relative time of a timer in the current frame; 0 when stopped
    pub fn relative_time(&self, handle: TimerHandle) -> Option<u32> {
        self.record(handle).map(TimerRecord::relative_time)
    }

    pub fn period(&self, handle: TimerHandle) -> Option<u32> {
        self.record(handle).map(TimerRecord::period)
    }

    pub fn mode(&self, handle: TimerHandle) -> Option<TimerMode> {
        self.record(handle).map(TimerRecord::mode)
    }

    /// Ticks left until a pending timer expires
    pub fn remaining(&self, handle: TimerHandle) -> Option<u32> {
        if !self.is_pending(handle) || self.adapter.is_none() {
            return None;
        }
        let position = self.position();
        Some(self.chain.time(handle.index()).saturating_sub(position))
    }

    /// Timer due next
    pub fn head(&self) -> Option<TimerHandle> {
        self.chain.head().map(TimerHandle::from_index)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Pending timers with their relative times, in expiry order
    pub fn pending(&self) -> Vec<(TimerHandle, u32), N> {
        let mut out = Vec::new();
        for (idx, record) in self.chain.iter() {
            // Capacity equals the arena size, which bounds the chain.
            let _ = out.push((TimerHandle::from_index(idx), record.relative_time()));
        }
        out
    }

    /// Access the underlying chain
    pub fn chain(&self) -> &TimerChain<TimerCallback<T, N>, N> {
        &self.chain
    }

    fn slot(&self, handle: TimerHandle) -> TimerResult<usize> {
        match self.chain.get(handle.index()) {
            Some(_) => Ok(handle.index()),
            None => {
                warn!("{} does not exist", handle);
                Err(TimerError::TimerNotExist)
            }
        }
    }

    fn require_adapter(&self) -> TimerResult<()> {
        if self.adapter.is_some() {
            Ok(())
        } else {
            warn!("physical timer adapter not registered");
            Err(TimerError::AdapterNotRegistered)
        }
    }

    fn arm(&mut self, ticks: u32) {
        trace!("arm physical timer: {} ticks", ticks);
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.arm(ticks);
        }
    }

    /// Check if the hardware counter has run out for the current head
    fn head_due(&self) -> bool {
        self.adapter.as_ref().is_some_and(|adapter| adapter.now() == 0)
    }

    /// Current position in the frame: head time minus ticks left on the
    /// hardware counter
    fn position(&self) -> u32 {
        match (self.chain.head(), self.adapter.as_ref()) {
            (Some(head), Some(adapter)) => self.chain.time(head).saturating_sub(adapter.now()),
            _ => 0,
        }
    }

    /// Prepare to add `delta` ticks at frame position `position`.
    ///
    /// Rebases the chain when the sum would reach the threshold and returns
    /// the position in the (possibly new) frame.
    fn reframe(&mut self, position: u32, delta: u32) -> u32 {
        if u64::from(position) + u64::from(delta) >= u64::from(REBASE_THRESHOLD) {
            self.chain.rebase(position);
            0
        } else {
            position
        }
    }

    /// Link a stopped record one period from now
    fn schedule(&mut self, idx: usize, period: u32) {
        let Some(head) = self.chain.head() else {
            self.chain.set_time(idx, period);
            self.chain.push_front(idx);
            self.arm(period);
            return;
        };

        let position = self.reframe(self.position(), period);
        let time = position + period;
        self.chain.set_time(idx, time);

        if time < self.chain.time(head) {
            self.arm(time - position);
            self.chain.push_front(idx);
        } else {
            self.chain.insert_sorted(idx, Some(head));
        }
    }

    /// Unlink a pending record, re-arming the hardware if it was the head
    fn detach(&mut self, idx: usize) {
        if self.chain.head() != Some(idx) {
            self.chain.remove(idx);
            return;
        }

        match self.chain.next_of(idx) {
            Some(next) => {
                let remaining = self.chain.time(next).saturating_sub(self.position());
                self.chain.remove(idx);
                // A successor sharing the head's deadline is already due; the
                // counter still reads 0 and the expiry loop picks it up.
                if remaining != 0 {
                    self.arm(remaining);
                }
            }
            None => {
                self.chain.remove(idx);
                self.arm(0);
            }
        }
    }
}
