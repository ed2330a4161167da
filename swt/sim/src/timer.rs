//! Simulated down-counting hardware timer

use std::cell::RefCell;
use std::rc::Rc;

use swt_timer::PhysicalTimer;

#[derive(Debug, Default)]
struct SimState {
    remaining: u32,
    armed: bool,
    arms: Vec<u32>,
}

/// Virtual counter peripheral.
///
/// Clones share the same counter, so a test can keep one handle while the
/// timer queue owns another. Time only moves through [`SimTimer::count_down`].
#[derive(Debug, Clone, Default)]
pub struct SimTimer {
    state: Rc<RefCell<SimState>>,
}

impl SimTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an interrupt is scheduled
    pub fn is_armed(&self) -> bool {
        self.state.borrow().armed
    }

    /// Ticks left before the interrupt, `None` while disarmed
    pub fn deadline(&self) -> Option<u32> {
        let state = self.state.borrow();
        state.armed.then_some(state.remaining)
    }

    /// Every value passed to `arm`, oldest first
    pub fn arms(&self) -> Vec<u32> {
        self.state.borrow().arms.clone()
    }

    pub fn last_arm(&self) -> Option<u32> {
        self.state.borrow().arms.last().copied()
    }

    pub fn clear_history(&self) {
        self.state.borrow_mut().arms.clear();
    }

    /// Let `ticks` pass. Returns `true` if the counter expired, which
    /// leaves it disarmed until the next `arm`.
    pub fn count_down(&self, ticks: u32) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.armed {
            return false;
        }
        if ticks >= state.remaining {
            state.remaining = 0;
            state.armed = false;
            true
        } else {
            state.remaining -= ticks;
            false
        }
    }
}

impl PhysicalTimer for SimTimer {
    fn arm(&mut self, ticks: u32) {
        let mut state = self.state.borrow_mut();
        state.remaining = ticks;
        state.armed = ticks != 0;
        state.arms.push(ticks);
    }

    fn now(&self) -> u32 {
        self.state.borrow().remaining
    }
}
