//! SWT Simulation Port
//!
//! Runs the SWT timer queue on a host with a virtual hardware counter, so
//! schedules can be exercised tick-exactly without a target board.
//!
//! ```
//! use swt_sim::{record_expiry, take_expiries, SimClock};
//! use swt_timer::{TimerCallback, TimerConfig};
//! use swt_sim::SimTimer;
//!
//! let mut clock = SimClock::<4>::new();
//! let blink = clock.create(
//!     0,
//!     TimerConfig::repeating(250).with_callback(record_expiry::<4> as TimerCallback<SimTimer, 4>, 1),
//! );
//! clock.start(blink).unwrap();
//! clock.advance(1_000);
//!
//! let ticks: Vec<u64> = take_expiries().iter().map(|e| e.tick).collect();
//! assert_eq!(ticks, vec![250, 500, 750, 1_000]);
//! ```

pub mod clock;
pub mod timer;

pub use clock::{current_tick, record_expiry, take_expiries, Expiry, SimClock};
pub use timer::SimTimer;
