//! Virtual time source driving a timer queue
//!
//! [`SimClock`] owns a [`TimerQueue`] wired to a [`SimTimer`] and moves
//! absolute time forward, raising the expiry interrupt at exactly the tick
//! the simulated counter runs out. Callbacks can read the absolute tick
//! through [`current_tick`] and log themselves with [`record_expiry`].

use std::cell::{Cell, RefCell};

use critical_section::CriticalSection;
use log::debug;
use swt_core::{TickRate, TimerResult};
use swt_timer::{QueueConfig, TimerHandle, TimerQueue};

use crate::timer::SimTimer;

thread_local! {
    static CURRENT_TICK: Cell<u64> = const { Cell::new(0) };
    static EXPIRIES: RefCell<Vec<Expiry>> = const { RefCell::new(Vec::new()) };
}

/// One callback invocation seen by [`record_expiry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Expiry {
    /// Absolute tick of the interrupt
    pub tick: u64,
    /// Callback argument of the timer that fired
    pub arg: usize,
}

/// Absolute tick of the running simulation on this thread
pub fn current_tick() -> u64 {
    CURRENT_TICK.with(Cell::get)
}

/// Expiry callback that appends to this thread's expiry log
pub fn record_expiry<const N: usize>(
    _queue: &mut TimerQueue<SimTimer, N>,
    _cs: CriticalSection<'_>,
    arg: usize,
) {
    let tick = current_tick();
    EXPIRIES.with(|log| log.borrow_mut().push(Expiry { tick, arg }));
}

/// Drain this thread's expiry log
pub fn take_expiries() -> Vec<Expiry> {
    EXPIRIES.with(|log| log.borrow_mut().drain(..).collect())
}

/// Simulated system: a timer queue, its counter and absolute time
pub struct SimClock<const N: usize> {
    queue: TimerQueue<SimTimer, N>,
    timer: SimTimer,
    rate: TickRate,
    now: u64,
    interrupts: u64,
}

impl<const N: usize> SimClock<N> {
    /// Create a clock at tick 0 with the default tick rate.
    ///
    /// Resets this thread's expiry log.
    pub fn new() -> Self {
        Self::with_rate(TickRate::DEFAULT)
    }

    pub fn with_rate(rate: TickRate) -> Self {
        let timer = SimTimer::new();
        take_expiries();
        CURRENT_TICK.with(|tick| tick.set(0));
        Self {
            queue: TimerQueue::with_adapter(timer.clone()),
            timer,
            rate,
            now: 0,
            interrupts: 0,
        }
    }

    /// Absolute ticks since the clock was created
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn rate(&self) -> TickRate {
        self.rate
    }

    /// Number of expiry interrupts raised so far
    pub fn interrupts(&self) -> u64 {
        self.interrupts
    }

    pub fn timer(&self) -> &SimTimer {
        &self.timer
    }

    pub fn queue(&self) -> &TimerQueue<SimTimer, N> {
        &self.queue
    }

    /// Run `f` on the queue inside a critical section
    pub fn with_queue<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut TimerQueue<SimTimer, N>, CriticalSection<'_>) -> R,
    {
        critical_section::with(|cs| f(&mut self.queue, cs))
    }

    pub fn create(&mut self, slot: usize, config: QueueConfig<SimTimer, N>) -> TimerHandle {
        self.with_queue(|queue, cs| queue.create(cs, slot, config))
    }

    pub fn start(&mut self, handle: TimerHandle) -> TimerResult<()> {
        self.with_queue(|queue, cs| queue.start(cs, handle))
    }

    pub fn stop(&mut self, handle: TimerHandle) -> TimerResult<()> {
        self.with_queue(|queue, cs| queue.stop(cs, handle))
    }

    pub fn update(&mut self, handle: TimerHandle, config: QueueConfig<SimTimer, N>) -> TimerResult<()> {
        self.with_queue(|queue, cs| queue.update(cs, handle, config))
    }

    /// Move time forward by `ticks`, servicing every interrupt on the way
    pub fn advance(&mut self, ticks: u64) {
        let target = self.now + ticks;

        loop {
            match self.timer.deadline() {
                Some(remaining) if self.now + u64::from(remaining) <= target => {
                    self.now += u64::from(remaining);
                    self.timer.count_down(remaining);
                    self.interrupt();
                }
                Some(_) => {
                    // The counter outlasts the target, so the gap fits in u32.
                    let gap = (target - self.now) as u32;
                    self.timer.count_down(gap);
                    break;
                }
                None => break,
            }
        }

        self.now = target;
        CURRENT_TICK.with(|tick| tick.set(target));
    }

    /// Convert `millis` at the clock's tick rate and advance
    pub fn advance_millis(&mut self, millis: u32) {
        self.advance(u64::from(self.rate.millis_to_ticks(millis)));
    }

    /// Advance to the next interrupt and return its absolute tick
    pub fn advance_to_next(&mut self) -> Option<u64> {
        let remaining = self.timer.deadline()?;
        self.advance(u64::from(remaining));
        Some(self.now)
    }

    fn interrupt(&mut self) {
        CURRENT_TICK.with(|tick| tick.set(self.now));
        self.interrupts += 1;
        debug!("timer interrupt at tick {}", self.now);
        critical_section::with(|cs| self.queue.on_interrupt(cs));
    }
}

impl<const N: usize> Default for SimClock<N> {
    fn default() -> Self {
        Self::new()
    }
}
