#![warn(missing_docs)]

//! # Relay Auto-Tuning PI Controller Library
//!
//! This library provides a proportional-integral (PI) controller that discovers its own gains
//! through a relay feedback experiment.
//!
//! While tuning, the controller drives the actuator between `+amplitude` and `-amplitude`
//! depending on the sign of the measurement, times the resulting oscillation and derives the
//! ultimate gain `Ku` and ultimate period `Pu` from it. The Ziegler-Nichols relay rule then turns
//! `Ku` and `Pu` into PI gains.
//!
//! ## Features
//!
//! - A plain PI law with a fixed sampling interval.
//! - A relay oscillator keeping a sliding window of the 10 most recent half-cycle durations.
//! - A fault guard: oversized errors, implausible half-cycles, missing oscillation data and
//!   invalid tuning results all force a safe, zero-output error state that only an explicit
//!   `exit_error_state` call leaves.
//! - Injectable clocks, so relay timing is testable without real delays.
//! - Transitions reported through `log` and to an optional caller-supplied observer.
//! - `no_std` compatible; disable the default `std` feature.
//!
//! ## Usage
//!
//! ### Driving the controller from a control loop
//!
//! ```rust
//! use core::time::Duration;
//!
//! use relay_pi::controller::{AutotuneConfigBuilder, RelayAutotuner};
//! use relay_pi::time::{ManualClock, Millis};
//!
//! let config = AutotuneConfigBuilder::default()
//!     .kp(1.0)
//!     .ki(0.0)
//!     .sample_time(Duration::from_millis(500))
//!     .build()
//!     .expect("Invalid autotune config");
//!
//! let clock = ManualClock::new(Millis(1_000));
//! let mut pi = RelayAutotuner::new(config, &clock, 5.0);
//!
//! // Accumulate some integral first, then let the relay run
//! let _ = pi.update(6.0, 5.0);
//! clock.advance(Duration::from_millis(500));
//! let output = pi.auto_tune(6.0, 5.0);
//!
//! assert!(!pi.in_error_state());
//! assert_eq!(pi.cycle_times().collect::<Vec<_>>(), [500.0]);
//! assert!(output.is_finite());
//! ```
//!
//! ### Recovering from a fault
//!
//! ```rust
//! use relay_pi::controller::{AutotuneConfig, RelayAutotuner};
//! use relay_pi::fault::Fault;
//! use relay_pi::time::SystemClock;
//!
//! let mut pi = RelayAutotuner::new(AutotuneConfig::default(), SystemClock, 0.0);
//!
//! // An error larger than the error limit trips the fault guard
//! assert_eq!(pi.update(500.0, 0.0), 0.0);
//! assert_eq!(pi.last_fault(), Some(Fault::ExcessiveError));
//! assert_eq!(pi.auto_tune(1.0, 0.0), 0.0);
//!
//! // Recovery is explicit
//! pi.exit_error_state();
//! assert!(!pi.in_error_state());
//! ```
//!
//! ### Plugging in your Instant type
//!
//! ``` rust
//! use core::ops::Add;
//! use core::time::Duration;
//! use relay_pi::controller::{AutotuneConfig, RelayAutotuner};
//! use relay_pi::time::{Clock, InstantLike};
//!
//! #[derive(Copy, Clone, Debug, PartialEq)]
//! struct Ticks(u32); // 1 tick = 1ms
//!
//! impl InstantLike for Ticks {
//!     fn duration_since(&self, earlier: Self) -> Duration {
//!         Duration::from_millis(self.0.saturating_sub(earlier.0) as u64)
//!     }
//!
//!     fn since_epoch(&self) -> Duration {
//!         Duration::from_millis(self.0 as u64)
//!     }
//! }
//!
//! impl Add<Duration> for Ticks {
//!     type Output = Self;
//!
//!     fn add(self, rhs: Duration) -> Self {
//!         Ticks(self.0 + rhs.as_millis() as u32)
//!     }
//! }
//!
//! struct TickCounter;
//!
//! impl Clock for TickCounter {
//!     type Instant = Ticks;
//!
//!     fn now(&self) -> Ticks {
//!         Ticks(0)
//!     }
//! }
//!
//! let mut pi = RelayAutotuner::new(AutotuneConfig::default(), TickCounter, 1.0);
//!
//! // Explicit timestamps bypass the clock
//! let output = pi.relay_feedback_test_at(1.0, Ticks(250));
//! assert_eq!(output, 1.0);
//! ```
//!
//! ## License
//!
#![no_std]

#[cfg(feature = "std")]
extern crate std;

/// The relay auto-tuning PI controller and its configuration.
pub mod controller;

/// Fault taxonomy and fault guard notifications.
pub mod fault;

/// The module containing time-related utilities to time relay half-cycles
pub mod time;

#[doc(hidden)]
#[cfg(feature = "simulation")]
pub mod sim;

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
