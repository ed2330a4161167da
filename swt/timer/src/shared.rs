//! Timer queue shared between thread mode and the timer interrupt

use core::cell::RefCell;
use critical_section::{CriticalSection, Mutex};
use swt_core::TimerResult;

use crate::adapter::PhysicalTimer;
use crate::queue::{QueueConfig, TimerQueue};
use crate::record::TimerHandle;

/// A [`TimerQueue`] that can live in a `static`.
///
/// Every access runs inside `critical_section::with`, which masks the
/// timer interrupt on single-core targets. Callbacks receive the queue
/// directly and must not call back into the shared wrapper.
///
/// ```ignore
/// static TIMERS: SharedTimerQueue<MyCounter, 4> = SharedTimerQueue::new();
///
/// #[interrupt]
/// fn TIM2() {
///     TIMERS.on_interrupt();
/// }
/// ```
pub struct SharedTimerQueue<T, const N: usize> {
    inner: Mutex<RefCell<TimerQueue<T, N>>>,
}

impl<T, const N: usize> SharedTimerQueue<T, N> {
    /// Create an empty shared queue
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(TimerQueue::new())),
        }
    }
}

impl<T, const N: usize> Default for SharedTimerQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PhysicalTimer, const N: usize> SharedTimerQueue<T, N> {
    /// Run `f` with exclusive access to the queue
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut TimerQueue<T, N>, CriticalSection<'_>) -> R,
    {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow_ref_mut(cs);
            f(&mut queue, cs)
        })
    }

    /// Register the physical timer
    pub fn register_adapter(&self, adapter: T) {
        self.with(|queue, _| queue.register_adapter(adapter))
    }

    /// Initialize a timer slot
    pub fn create(&self, slot: usize, config: QueueConfig<T, N>) -> TimerHandle {
        self.with(|queue, cs| queue.create(cs, slot, config))
    }

    pub fn update(&self, handle: TimerHandle, config: QueueConfig<T, N>) -> TimerResult<()> {
        self.with(|queue, cs| queue.update(cs, handle, config))
    }

    pub fn start(&self, handle: TimerHandle) -> TimerResult<()> {
        self.with(|queue, cs| queue.start(cs, handle))
    }

    pub fn stop(&self, handle: TimerHandle) -> TimerResult<()> {
        self.with(|queue, cs| queue.stop(cs, handle))
    }

    /// Entry point for the physical timer's interrupt vector
    pub fn on_interrupt(&self) {
        self.with(|queue, cs| queue.on_interrupt(cs))
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.with(|queue, _| queue.is_pending(handle))
    }
}
