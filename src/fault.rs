// Fault taxonomy and state-transition notifications for the relay autotuner
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

/// An abnormal condition that forces the controller into its error state.
///
/// Faults are never returned to the caller. The controller absorbs them, zeroes its output and
/// waits for an explicit call to `exit_error_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum Fault {
    /// The control error exceeded the configured error limit
    #[cfg_attr(feature = "std", error("control error exceeds the error limit"))]
    ExcessiveError,

    /// A relay half-cycle was too short (noise) or too long (the process is not oscillating)
    #[cfg_attr(
        feature = "std",
        error("relay half-cycle duration outside the plausible window")
    )]
    ImplausibleCycle,

    /// Ultimate gain and period were requested before any half-cycle was recorded
    #[cfg_attr(feature = "std", error("no oscillation data recorded"))]
    NoOscillationData,

    /// The estimated ultimate gain or period was non-positive or non-finite
    #[cfg_attr(feature = "std", error("ultimate gain or period is not a positive number"))]
    InvalidTuningResult,

    /// The caller forced the error state through `enter_error_state`
    #[cfg_attr(feature = "std", error("error state requested by the caller"))]
    Requested,
}

/// A transition of the fault guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The controller entered the error state because of the contained fault
    Faulted(Fault),
    /// The controller left the error state
    Recovered,
}

/// Receives fault guard transitions.
///
/// Any `FnMut(Event)` closure is an observer, so callers may forward events to their own telemetry
/// without implementing the trait by hand. Notifications are advisory; the controller behaves the
/// same whether or not anyone listens.
pub trait Observer {
    /// Called once per transition, after the controller state has been updated
    fn notify(&mut self, event: Event);
}

impl<F: FnMut(Event)> Observer for F {
    fn notify(&mut self, event: Event) {
        self(event)
    }
}

/// An observer that discards every event. Transitions are still logged through `log`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn notify(&mut self, _event: Event) {}
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::string::ToString;
    use std::vec::Vec;

    #[test]
    fn test_closure_observer_receives_events() {
        let mut seen = Vec::new();
        {
            let mut observer = |event: Event| seen.push(event);
            observer.notify(Event::Faulted(Fault::ExcessiveError));
            observer.notify(Event::Recovered);
        }
        assert_eq!(
            seen,
            [Event::Faulted(Fault::ExcessiveError), Event::Recovered]
        );
    }

    #[test]
    fn test_fault_messages() {
        assert_eq!(
            Fault::NoOscillationData.to_string(),
            "no oscillation data recorded"
        );
        assert_eq!(
            Fault::ImplausibleCycle.to_string(),
            "relay half-cycle duration outside the plausible window"
        );
    }
}
