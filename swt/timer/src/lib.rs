#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # SWT Timer
//!
//! Software timers multiplexed onto a single hardware timer/counter.
//!
//! Any number of logical timers (bounded by the arena capacity `N`) share
//! one down-counting physical timer. Pending timers are kept in a chain
//! sorted by expiry; the hardware is always armed for the chain's head.
//! When it fires, [`TimerQueue::on_interrupt`] runs every timer due at that
//! tick, reloads repeating ones and re-arms the hardware for the next
//! deadline.
//!
//! - [`adapter`] – the two operations required from the hardware port.
//! - [`record`]  – per-timer state and handles.
//! - [`chain`]   – fixed-capacity arena holding the sorted pending chain.
//! - [`queue`]   – control operations and the expiry handler.
//! - [`shared`]  – `static`-friendly wrapper for interrupt sharing.
//!
//! No allocation is performed; all storage is sized at compile time.

pub mod adapter;
pub mod chain;
pub mod queue;
pub mod record;
pub mod shared;

pub use adapter::{FnTimer, PhysicalTimer};
pub use chain::TimerChain;
pub use queue::{QueueConfig, TimerCallback, TimerQueue};
pub use record::{TimerHandle, TimerRecord};
pub use shared::SharedTimerQueue;
pub use swt_core::*;

#[cfg(test)]
mod tests;
