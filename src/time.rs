// Defines a trait for time-like objects, the clocks that produce them, and several implementations
// Copyright © 2025 Hs293Go
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES
// OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
// DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE
// OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use core::cell::Cell;
use core::ops::Add;
use core::time::Duration;

use core::any::Any;
use core::fmt::Debug;

/// A trait for time-like objects that can be used to measure elapsed time.
///
/// The relay oscillator uses this trait to measure the time between relay switches. The
/// ultimate-gain estimate additionally needs the absolute timestamp of the last switch, which is
/// why instants must also report their offset from their own epoch.
pub trait InstantLike:
    Sized
    + Add<Duration, Output = Self>
    + Clone
    + Copy
    + Debug
    + PartialEq<Self>
    + Send
    + Sync
    + Unpin
    + Any
{
    /// Returns the amount of time elapsed from another instant to this one.
    /// Saturates to zero if `earlier` is actually later than `self`.
    #[must_use]
    fn duration_since(&self, earlier: Self) -> Duration;

    /// Returns the amount of time elapsed since the epoch of this instant type
    #[must_use]
    fn since_epoch(&self) -> Duration;
}

/// A wrapper around an unsigned 64-bit integer representing milliseconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Millis(pub u64);

impl InstantLike for Millis {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    fn since_epoch(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Add<Duration> for Millis {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Millis(self.0 + rhs.as_millis() as u64)
    }
}

/// A wrapper around an unsigned 64-bit integer representing microseconds, e.g. a free-running
/// hardware timer
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Micros(pub u64);

impl InstantLike for Micros {
    fn duration_since(&self, earlier: Self) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }

    fn since_epoch(&self) -> Duration {
        Duration::from_micros(self.0)
    }
}

impl Add<Duration> for Micros {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Micros(self.0 + rhs.as_micros() as u64)
    }
}

/// A source of timestamps.
///
/// The controller holds a clock and reads it once per relay feedback test. Swap in a
/// [`ManualClock`] to make relay timing deterministic.
pub trait Clock {
    /// The instant type produced by this clock
    type Instant: InstantLike;

    /// Returns the current time
    fn now(&self) -> Self::Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    type Instant = C::Instant;

    fn now(&self) -> Self::Instant {
        (**self).now()
    }
}

/// A clock that only moves when told to.
///
/// Time is kept in a `Cell`, so a shared reference handed to the controller can still be advanced
/// by the test or simulation driving it.
#[derive(Debug)]
pub struct ManualClock<I: InstantLike> {
    now: Cell<I>,
}

impl<I: InstantLike> ManualClock<I> {
    /// Creates a clock frozen at `start`
    pub fn new(start: I) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jumps the clock to `instant`, which may be earlier than the current time
    pub fn set(&self, instant: I) {
        self.now.set(instant);
    }

    /// Moves the clock forward by `delta`
    pub fn advance(&self, delta: Duration) {
        self.now.set(self.now.get() + delta);
    }
}

impl<I: InstantLike> Clock for ManualClock<I> {
    type Instant = I;

    fn now(&self) -> I {
        self.now.get()
    }
}

/// A wall clock reporting milliseconds since the Unix epoch.
#[cfg(feature = "std")]
mod system_clock {

    use super::{Clock, Millis};

    /// Reads `SystemTime::now()` on every call
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        type Instant = Millis;

        fn now(&self) -> Millis {
            // A wall clock set before 1970 reads as the epoch itself
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| Millis(elapsed.as_millis() as u64))
                .unwrap_or(Millis(0))
        }
    }

    /// Tests that SystemClock agrees with SystemTime to within the resolution of a test run
    #[cfg(test)]
    #[test]
    fn test_system_clock_tracks_unix_time() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let now = SystemClock.now();
        assert!(now.0 >= before);
        assert!(now.0 - before < 60_000);
    }
}

#[cfg(feature = "std")]
pub use system_clock::SystemClock;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_since_saturates() {
        assert_eq!(
            Millis(1500).duration_since(Millis(1000)),
            Duration::from_millis(500)
        );
        assert_eq!(Millis(1000).duration_since(Millis(1500)), Duration::ZERO);
        assert_eq!(Micros(10).duration_since(Micros(20)), Duration::ZERO);
    }

    #[test]
    fn test_since_epoch() {
        assert_eq!(Millis(42).since_epoch(), Duration::from_millis(42));
        assert_eq!(Micros(42).since_epoch(), Duration::from_micros(42));
    }

    #[test]
    fn test_manual_clock_through_shared_reference() {
        let clock = ManualClock::new(Micros(0));
        let borrowed = &clock;

        clock.advance(Duration::from_millis(3));
        assert_eq!(borrowed.now(), Micros(3000));

        clock.set(Micros(5));
        assert_eq!(borrowed.now(), Micros(5));
    }
}
