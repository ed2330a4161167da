use std::cell::RefCell;
use std::rc::Rc;

use crate::adapter::PhysicalTimer;

mod shared;

/// Down counter whose time only moves when a test says so
#[derive(Clone, Default)]
pub(crate) struct FakeTimer(Rc<RefCell<FakeState>>);

#[derive(Default)]
pub(crate) struct FakeState {
    remaining: u32,
    arms: Vec<u32>,
}

impl FakeTimer {
    /// Every value passed to `arm`, oldest first
    pub(crate) fn arms(&self) -> Vec<u32> {
        self.0.borrow().arms.clone()
    }

    pub(crate) fn last_arm(&self) -> Option<u32> {
        self.0.borrow().arms.last().copied()
    }

    /// Let `ticks` pass without reaching zero
    pub(crate) fn elapse(&self, ticks: u32) {
        let mut state = self.0.borrow_mut();
        assert!(ticks < state.remaining, "elapse would expire the counter");
        state.remaining -= ticks;
    }

    /// Run the counter down to zero
    pub(crate) fn expire(&self) {
        self.0.borrow_mut().remaining = 0;
    }
}

impl PhysicalTimer for FakeTimer {
    fn arm(&mut self, ticks: u32) {
        let mut state = self.0.borrow_mut();
        state.remaining = ticks;
        state.arms.push(ticks);
    }

    fn now(&self) -> u32 {
        self.0.borrow().remaining
    }
}
