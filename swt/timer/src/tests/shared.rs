use std::cell::Cell;

use super::FakeTimer;
use crate::adapter::FnTimer;
use crate::shared::SharedTimerQueue;
use swt_core::{TimerConfig, TimerError};

thread_local! {
    static COUNTER: Cell<u32> = const { Cell::new(0) };
    static ARM_CALLS: Cell<usize> = const { Cell::new(0) };
}

fn arm_counter(ticks: u32) {
    COUNTER.with(|counter| counter.set(ticks));
    ARM_CALLS.with(|calls| calls.set(calls.get() + 1));
}

fn read_counter() -> u32 {
    COUNTER.with(Cell::get)
}

#[test]
fn shared_queue_runs_control_operations() {
    let timer = FakeTimer::default();
    let shared = SharedTimerQueue::<FakeTimer, 2>::new();
    let handle = shared.create(0, TimerConfig::single_shot(25));

    assert_eq!(shared.start(handle), Err(TimerError::AdapterNotRegistered));

    shared.register_adapter(timer.clone());
    shared.start(handle).unwrap();
    assert!(shared.is_pending(handle));
    assert_eq!(timer.arms(), vec![25]);

    shared.update(handle, TimerConfig::repeating(30)).unwrap();
    assert_eq!(shared.with(|queue, _| queue.remaining(handle)), Some(30));

    timer.expire();
    shared.on_interrupt();
    assert!(shared.is_pending(handle));
    assert_eq!(timer.last_arm(), Some(30));

    shared.stop(handle).unwrap();
    assert!(!shared.is_pending(handle));
    assert_eq!(timer.last_arm(), Some(0));
}

#[test]
fn function_pointer_adapter_drives_hardware() {
    COUNTER.with(|counter| counter.set(0));
    ARM_CALLS.with(|calls| calls.set(0));

    let shared = SharedTimerQueue::<FnTimer, 2>::new();
    shared.register_adapter(FnTimer::new(arm_counter, read_counter));
    let first = shared.create(0, TimerConfig::single_shot(90));
    let second = shared.create(1, TimerConfig::single_shot(15));

    shared.start(first).unwrap();
    assert_eq!(read_counter(), 90);

    COUNTER.with(|counter| counter.set(60));
    shared.start(second).unwrap();
    assert_eq!(read_counter(), 15);
    assert_eq!(ARM_CALLS.with(Cell::get), 2);

    COUNTER.with(|counter| counter.set(0));
    shared.on_interrupt();
    assert!(!shared.is_pending(second));
    // 30 ticks had elapsed when the second timer started; 45 remain.
    assert_eq!(read_counter(), 45);
}
