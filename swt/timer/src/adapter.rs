//! Physical timer abstraction

/// The single hardware counter the scheduler multiplexes.
///
/// The scheduler never touches registers itself; a port implements these
/// two operations on top of its down-counting timer peripheral.
pub trait PhysicalTimer {
    /// Program the counter to raise its interrupt after `ticks` ticks.
    ///
    /// `arm(0)` disarms the counter.
    fn arm(&mut self, ticks: u32);

    /// Current counter value: ticks left before the armed interrupt fires.
    ///
    /// Reads `0` once the interrupt has fired or while disarmed, and keeps
    /// reading `0` until the next `arm`. The expiry handler relies on this
    /// to tell which timers are still due.
    fn now(&self) -> u32;
}

impl<T: PhysicalTimer + ?Sized> PhysicalTimer for &mut T {
    fn arm(&mut self, ticks: u32) {
        (**self).arm(ticks);
    }

    fn now(&self) -> u32 {
        (**self).now()
    }
}

/// Adapter built from two plain functions, for ports that expose the
/// counter through free functions.
#[derive(Clone, Copy)]
pub struct FnTimer {
    pub arm: fn(u32),
    pub now: fn() -> u32,
}

impl FnTimer {
    pub const fn new(arm: fn(u32), now: fn() -> u32) -> Self {
        Self { arm, now }
    }
}

impl PhysicalTimer for FnTimer {
    fn arm(&mut self, ticks: u32) {
        (self.arm)(ticks)
    }

    fn now(&self) -> u32 {
        (self.now)()
    }
}
