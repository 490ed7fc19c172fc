// Relay auto-tuning PI controller
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

use core::f64::consts::PI;
use core::time::Duration;

use heapless::Deque;
use num_traits::float::FloatCore;

use crate::fault::{Event, Fault, NoopObserver, Observer};
use crate::time::{Clock, InstantLike};

/// Number of most recent relay half-cycles kept for estimating the ultimate period
pub const CYCLE_HISTORY_LEN: usize = 10;

// Ziegler-Nichols relay tuning coefficients for a PI controller
const KP_PER_KU: f64 = 0.45;
const KI_PER_KU: f64 = 0.54;

/// Reasons an [`AutotuneConfig`] setter or builder rejects a value
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum ConfigError {
    /// The proportional gain is NaN or infinite
    #[cfg_attr(feature = "std", error("proportional gain must be finite"))]
    InvalidProportionalGain,

    /// The integral gain is NaN or infinite
    #[cfg_attr(feature = "std", error("integral gain must be finite"))]
    InvalidIntegralGain,

    /// The sample time is zero
    #[cfg_attr(feature = "std", error("sample time must be greater than zero"))]
    InvalidSampleTime,

    /// The relay amplitude is non-positive or not finite
    #[cfg_attr(
        feature = "std",
        error("relay amplitude must be finite and greater than zero")
    )]
    InvalidRelayAmplitude,

    /// The error limit is non-positive or NaN
    #[cfg_attr(feature = "std", error("error limit must be greater than zero"))]
    InvalidErrorLimit,

    /// The minimum half-cycle is not shorter than the maximum
    #[cfg_attr(
        feature = "std",
        error("minimum half-cycle must be shorter than the maximum half-cycle")
    )]
    InvalidHalfCycleWindow,
}

/// Initial gains, sampling interval and fault guard thresholds.
///
/// Fields are only reachable through validating setters, so a config in hand is always usable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AutotuneConfig {
    /// Initial proportional gain, overwritten once the relay test yields a tuning.
    /// Defaults to 1.0.
    kp: f64,

    /// Initial integral gain, overwritten once the relay test yields a tuning.
    /// Defaults to 0.0.
    ki: f64,

    /// Fixed interval between calls to `update`. The integrator trusts this value and never
    /// measures the actual interval.
    /// Defaults to 1s.
    sample_time: Duration,

    /// Magnitude of the bang-bang output during the relay test.
    /// Defaults to 1.0.
    relay_amplitude: f64,

    /// Largest control error tolerated before the controller faults.
    /// Defaults to 100.0, in units of the controlled variable.
    error_limit: f64,

    /// Half-cycles this short or shorter are treated as noise.
    /// Defaults to 100ms.
    min_half_cycle: Duration,

    /// Half-cycles this long or longer mean the process is not oscillating.
    /// Defaults to 10s.
    max_half_cycle: Duration,
}

impl Default for AutotuneConfig {
    fn default() -> Self {
        AutotuneConfig {
            kp: 1.0,
            ki: 0.0,
            sample_time: Duration::from_secs(1),
            relay_amplitude: 1.0,
            error_limit: 100.0,
            min_half_cycle: Duration::from_millis(100),
            max_half_cycle: Duration::from_millis(10_000),
        }
    }
}

impl AutotuneConfig {
    /// Returns the initial proportional gain.
    pub fn kp(&self) -> f64 {
        self.kp
    }

    /// Returns the initial integral gain.
    pub fn ki(&self) -> f64 {
        self.ki
    }

    /// Returns the sampling time.
    pub fn sample_time(&self) -> Duration {
        self.sample_time
    }

    /// Returns the sampling time in seconds, the `dt` of the integrator.
    pub fn dt(&self) -> f64 {
        self.sample_time.as_secs_f64()
    }

    /// Returns the relay output magnitude.
    pub fn relay_amplitude(&self) -> f64 {
        self.relay_amplitude
    }

    /// Returns the error limit.
    pub fn error_limit(&self) -> f64 {
        self.error_limit
    }

    /// Returns the exclusive bounds on plausible relay half-cycle durations.
    pub fn half_cycle_window(&self) -> (Duration, Duration) {
        (self.min_half_cycle, self.max_half_cycle)
    }

    /// Sets the initial proportional gain.
    ///
    /// # Errors
    /// - `InvalidProportionalGain` if the gain is not finite.
    pub fn set_kp(&mut self, kp: f64) -> Result<(), ConfigError> {
        if !kp.is_finite() {
            return Err(ConfigError::InvalidProportionalGain);
        }
        self.kp = kp;
        Ok(())
    }

    /// Sets the initial integral gain.
    ///
    /// # Errors
    /// - `InvalidIntegralGain` if the gain is not finite.
    pub fn set_ki(&mut self, ki: f64) -> Result<(), ConfigError> {
        if !ki.is_finite() {
            return Err(ConfigError::InvalidIntegralGain);
        }
        self.ki = ki;
        Ok(())
    }

    /// Sets the sampling time.
    ///
    /// # Errors
    /// - `InvalidSampleTime` if the sample time is zero.
    pub fn set_sample_time(&mut self, sample_time: Duration) -> Result<(), ConfigError> {
        if sample_time.is_zero() {
            return Err(ConfigError::InvalidSampleTime);
        }
        self.sample_time = sample_time;
        Ok(())
    }

    /// Sets the relay output magnitude.
    ///
    /// # Errors
    /// - `InvalidRelayAmplitude` if the amplitude is non-positive or not finite.
    pub fn set_relay_amplitude(&mut self, relay_amplitude: f64) -> Result<(), ConfigError> {
        if relay_amplitude <= 0.0 || !relay_amplitude.is_finite() {
            return Err(ConfigError::InvalidRelayAmplitude);
        }
        self.relay_amplitude = relay_amplitude;
        Ok(())
    }

    /// Sets the error limit. An infinite limit disables the excessive-error guard.
    ///
    /// # Errors
    /// - `InvalidErrorLimit` if the limit is non-positive or NaN.
    pub fn set_error_limit(&mut self, error_limit: f64) -> Result<(), ConfigError> {
        if error_limit.is_nan() || error_limit <= 0.0 {
            return Err(ConfigError::InvalidErrorLimit);
        }
        self.error_limit = error_limit;
        Ok(())
    }

    /// Sets the exclusive bounds on plausible relay half-cycle durations.
    ///
    /// # Errors
    /// - `InvalidHalfCycleWindow` if `min_half_cycle` is not shorter than `max_half_cycle`.
    pub fn set_half_cycle_window(
        &mut self,
        min_half_cycle: Duration,
        max_half_cycle: Duration,
    ) -> Result<(), ConfigError> {
        if min_half_cycle >= max_half_cycle {
            return Err(ConfigError::InvalidHalfCycleWindow);
        }
        self.min_half_cycle = min_half_cycle;
        self.max_half_cycle = max_half_cycle;
        Ok(())
    }
}

/// Builds an [`AutotuneConfig`], validating every field at once in `build`.
#[derive(Clone, Debug, Default)]
pub struct AutotuneConfigBuilder {
    kp: Option<f64>,
    ki: Option<f64>,
    sample_time: Option<Duration>,
    relay_amplitude: Option<f64>,
    error_limit: Option<f64>,
    half_cycle_window: Option<(Duration, Duration)>,
}

impl AutotuneConfigBuilder {
    /// Sets the initial proportional gain.
    pub fn kp(mut self, kp: f64) -> Self {
        self.kp = Some(kp);
        self
    }

    /// Sets the initial integral gain.
    pub fn ki(mut self, ki: f64) -> Self {
        self.ki = Some(ki);
        self
    }

    /// Sets the sampling time.
    pub fn sample_time(mut self, sample_time: Duration) -> Self {
        self.sample_time = Some(sample_time);
        self
    }

    /// Sets the relay output magnitude.
    pub fn relay_amplitude(mut self, relay_amplitude: f64) -> Self {
        self.relay_amplitude = Some(relay_amplitude);
        self
    }

    /// Sets the error limit.
    pub fn error_limit(mut self, error_limit: f64) -> Self {
        self.error_limit = Some(error_limit);
        self
    }

    /// Sets the exclusive bounds on plausible relay half-cycle durations.
    pub fn half_cycle_window(mut self, min_half_cycle: Duration, max_half_cycle: Duration) -> Self {
        self.half_cycle_window = Some((min_half_cycle, max_half_cycle));
        self
    }

    /// Applies every field that was set on top of the default configuration.
    ///
    /// # Errors
    /// The first validation failure, in declaration order of the fields.
    pub fn build(self) -> Result<AutotuneConfig, ConfigError> {
        let mut config = AutotuneConfig::default();
        if let Some(kp) = self.kp {
            config.set_kp(kp)?;
        }
        if let Some(ki) = self.ki {
            config.set_ki(ki)?;
        }
        if let Some(sample_time) = self.sample_time {
            config.set_sample_time(sample_time)?;
        }
        if let Some(relay_amplitude) = self.relay_amplitude {
            config.set_relay_amplitude(relay_amplitude)?;
        }
        if let Some(error_limit) = self.error_limit {
            config.set_error_limit(error_limit)?;
        }
        if let Some((min_half_cycle, max_half_cycle)) = self.half_cycle_window {
            config.set_half_cycle_window(min_half_cycle, max_half_cycle)?;
        }
        Ok(config)
    }
}

/// Polarity of the bang-bang output during the relay test
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelayState {
    /// Output is `+relay_amplitude`
    High,
    /// Output is `-relay_amplitude`
    Low,
}

impl RelayState {
    /// The polarity opposing the sign of `measured_value`; zero counts as positive.
    pub fn opposing(measured_value: f64) -> Self {
        if measured_value >= 0.0 {
            RelayState::Low
        } else {
            RelayState::High
        }
    }

    /// Returns +1.0 or -1.0
    pub fn sign(self) -> f64 {
        match self {
            RelayState::High => 1.0,
            RelayState::Low => -1.0,
        }
    }

    /// Returns the opposite polarity
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            RelayState::High => RelayState::Low,
            RelayState::Low => RelayState::High,
        }
    }
}

/// Ultimate gain and period estimated from a relay test. The period is in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UltimateParameters {
    /// Ultimate gain
    pub ku: f64,
    /// Ultimate period in milliseconds
    pub pu: f64,
}

/// A PI controller that tunes its own gains from a relay feedback experiment.
///
/// The controller owns all of its state and is meant to be driven by exactly one control loop,
/// once per sampling period. Abnormal conditions never surface as errors: the controller enters
/// an error state, outputs zero from `auto_tune`, and stays there until `exit_error_state` is
/// called.
///
/// The clock `C` is read by the relay test to time half-cycles. The observer `O` is told about
/// every fault guard transition.
pub struct RelayAutotuner<C: Clock, O: Observer = NoopObserver> {
    config: AutotuneConfig,
    kp: f64,
    ki: f64,
    integral: f64,
    relay_state: RelayState,
    last_switch_time: C::Instant,
    cycle_times: Deque<f64, CYCLE_HISTORY_LEN>,
    fault: Option<Fault>,
    clock: C,
    observer: O,
}

impl<C: Clock> RelayAutotuner<C> {
    /// Creates a controller that only reports transitions through `log`.
    ///
    /// `initial_measured_value` picks the starting relay polarity: the relay starts opposite to
    /// the sign of the measurement.
    pub fn new(config: AutotuneConfig, clock: C, initial_measured_value: f64) -> Self {
        Self::with_observer(config, clock, NoopObserver, initial_measured_value)
    }
}

impl<C: Clock, O: Observer> RelayAutotuner<C, O> {
    /// Creates a controller that also passes every fault guard transition to `observer`.
    pub fn with_observer(
        config: AutotuneConfig,
        clock: C,
        observer: O,
        initial_measured_value: f64,
    ) -> Self {
        let last_switch_time = clock.now();
        Self {
            kp: config.kp,
            ki: config.ki,
            config,
            integral: 0.0,
            relay_state: RelayState::opposing(initial_measured_value),
            last_switch_time,
            cycle_times: Deque::new(),
            fault: None,
            clock,
            observer,
        }
    }

    /// Returns the configuration the controller was built with.
    pub fn config(&self) -> &AutotuneConfig {
        &self.config
    }

    /// Returns the current proportional gain.
    pub fn kp(&self) -> f64 {
        self.kp
    }

    /// Returns the current integral gain.
    pub fn ki(&self) -> f64 {
        self.ki
    }

    /// Convenience method that returns the current proportional and integral gains together.
    pub fn gains(&self) -> (f64, f64) {
        (self.kp, self.ki)
    }

    /// Returns the accumulated `error * dt`, before scaling by the integral gain.
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Returns the current relay polarity.
    pub fn relay_state(&self) -> RelayState {
        self.relay_state
    }

    /// Returns the instant of the last relay crossing, or of construction if there was none.
    pub fn last_switch_time(&self) -> C::Instant {
        self.last_switch_time
    }

    /// Recorded half-cycle durations in milliseconds, oldest first.
    pub fn cycle_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.cycle_times.iter().copied()
    }

    /// Returns true while a fault holds the controller in the error state.
    pub fn in_error_state(&self) -> bool {
        self.fault.is_some()
    }

    /// The fault that most recently forced the error state, if the controller is in it.
    pub fn last_fault(&self) -> Option<Fault> {
        self.fault
    }

    /// Returns the clock the relay test reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the observer that receives fault guard transitions.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Computes the PI output for one sampling period.
    ///
    /// If the error magnitude exceeds the error limit, the controller faults and returns zero
    /// without touching the integral. This method is not gated by the error state; only
    /// `auto_tune` is.
    pub fn update(&mut self, setpoint: f64, measured_value: f64) -> f64 {
        let error = setpoint - measured_value;

        if FloatCore::abs(error) > self.config.error_limit {
            self.fault(Fault::ExcessiveError);
            return 0.0;
        }

        let proportional = self.kp * error;
        self.integral += error * self.config.dt();

        proportional + self.ki * self.integral
    }

    /// Runs one step of the relay test, timing the half-cycle against the controller's clock.
    pub fn relay_feedback_test(&mut self, measured_value: f64) -> f64 {
        let now = self.clock.now();
        self.relay_feedback_test_at(measured_value, now)
    }

    /// Runs one step of the relay test at an explicit timestamp.
    ///
    /// The relay flips whenever its polarity disagrees with the sign of the measurement. Each
    /// flip records the time since the previous one as a half-cycle. A half-cycle outside the
    /// plausible window faults the controller and returns zero without flipping; the switch time
    /// is still advanced.
    ///
    /// Returns `relay_amplitude` signed by the (possibly new) relay polarity.
    pub fn relay_feedback_test_at(&mut self, measured_value: f64, now: C::Instant) -> f64 {
        if self.relay_state.sign() * measured_value < 0.0 {
            let half_cycle = now.duration_since(self.last_switch_time);
            self.last_switch_time = now;

            if half_cycle <= self.config.min_half_cycle || half_cycle >= self.config.max_half_cycle
            {
                self.fault(Fault::ImplausibleCycle);
                return 0.0;
            }

            if self.cycle_times.is_full() {
                self.cycle_times.pop_front();
            }
            // Cannot fail, the oldest entry was just evicted
            let pushed = self.cycle_times.push_back(as_millis_f64(half_cycle));
            debug_assert!(pushed.is_ok());

            self.relay_state = self.relay_state.flipped();
            log::debug!(
                "relay switched to {:?} after {:?}",
                self.relay_state,
                half_cycle
            );
        }

        self.config.relay_amplitude * self.relay_state.sign()
    }

    /// Estimates the ultimate gain and period from the recorded half-cycles.
    ///
    /// `Pu` is the mean recorded half-cycle in milliseconds. `Ku` follows the relay describing
    /// function `4d / (pi * a)`, where the oscillation amplitude `a` is approximated by the
    /// integral divided by the last switch timestamp in milliseconds since the clock's epoch.
    ///
    /// With no recorded half-cycles the controller faults and both values are zero.
    pub fn calculate_ultimate_gain_and_period(&mut self) -> UltimateParameters {
        if self.cycle_times.is_empty() {
            self.fault(Fault::NoOscillationData);
            return UltimateParameters { ku: 0.0, pu: 0.0 };
        }

        let pu = self.cycle_times.iter().sum::<f64>() / self.cycle_times.len() as f64;

        let last_switch_ms = as_millis_f64(self.last_switch_time.since_epoch());
        let amplitude = FloatCore::abs(self.integral / last_switch_ms);
        let ku = (4.0 * self.config.relay_amplitude) / (PI * amplitude);

        UltimateParameters { ku, pu }
    }

    /// Applies the Ziegler-Nichols PI rule: `kp = 0.45 Ku`, `ki = 0.54 Ku / Pu`.
    ///
    /// Non-positive or non-finite inputs fault the controller and leave the gains untouched.
    pub fn set_tuning_parameters(&mut self, ku: f64, pu: f64) {
        if ku <= 0.0 || pu <= 0.0 || !ku.is_finite() || !pu.is_finite() {
            self.fault(Fault::InvalidTuningResult);
            return;
        }

        self.kp = KP_PER_KU * ku;
        self.ki = (KI_PER_KU * ku) / pu;
        log::debug!("retuned from Ku={ku}, Pu={pu}ms: kp={}, ki={}", self.kp, self.ki);
    }

    /// Runs the relay test, retunes from the current estimate and returns the PI output plus the
    /// relay excitation, all at the controller clock's current time.
    pub fn auto_tune(&mut self, setpoint: f64, measured_value: f64) -> f64 {
        let now = self.clock.now();
        self.auto_tune_at(setpoint, measured_value, now)
    }

    /// Like [`auto_tune`](Self::auto_tune), at an explicit timestamp.
    ///
    /// Returns zero without doing anything if the call starts in the error state. Once past that
    /// check, every stage runs: the relay step, the estimate, the retune when both `Ku` and `Pu`
    /// are positive, and the PI update. A stage that faults contributes its own zero but does not
    /// stop the ones after it, so the PI update still runs and refills the integral.
    pub fn auto_tune_at(&mut self, setpoint: f64, measured_value: f64, now: C::Instant) -> f64 {
        if self.in_error_state() {
            return 0.0;
        }

        let relay_output = self.relay_feedback_test_at(measured_value, now);

        let UltimateParameters { ku, pu } = self.calculate_ultimate_gain_and_period();
        if ku > 0.0 && pu > 0.0 {
            self.set_tuning_parameters(ku, pu);
        }

        self.update(setpoint, measured_value) + relay_output
    }

    /// Forces the error state, e.g. when the host detects a sensor failure.
    pub fn enter_error_state(&mut self) {
        self.fault(Fault::Requested);
    }

    /// Leaves the error state and clears the integral and half-cycle history.
    ///
    /// Recovery is unconditional; nothing checks that the condition behind the fault is gone.
    pub fn exit_error_state(&mut self) {
        self.fault = None;
        self.integral = 0.0;
        self.cycle_times.clear();
        log::info!("controller left the error state");
        self.observer.notify(Event::Recovered);
    }

    fn fault(&mut self, fault: Fault) {
        self.fault = Some(fault);
        self.integral = 0.0;
        self.cycle_times.clear();
        log::error!("controller entered the error state: {:?}", fault);
        self.observer.notify(Event::Faulted(fault));
    }
}

// Exact for whole milliseconds, unlike scaling `as_secs_f64`
fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_nanos() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_GAINS: &[f64; 3] = &[f64::INFINITY, f64::NEG_INFINITY, f64::NAN];

    #[test]
    fn test_default_config() {
        let config = AutotuneConfig::default();
        assert_eq!(config.kp(), 1.0);
        assert_eq!(config.ki(), 0.0);
        assert_eq!(config.dt(), 1.0);
        assert_eq!(config.relay_amplitude(), 1.0);
        assert_eq!(config.error_limit(), 100.0);
        assert_eq!(
            config.half_cycle_window(),
            (Duration::from_millis(100), Duration::from_millis(10_000))
        );
    }

    #[test]
    fn test_get_and_set_gains() {
        let mut config = AutotuneConfig::default();

        // Negative gains are accepted as initial values
        assert!(config.set_kp(-2.0).is_ok());
        assert!(config.set_ki(0.5).is_ok());

        for it in INVALID_GAINS {
            assert_eq!(config.set_kp(*it), Err(ConfigError::InvalidProportionalGain));
            assert_eq!(config.set_ki(*it), Err(ConfigError::InvalidIntegralGain));
        }

        // Failing to set a gain should not change the value
        assert_eq!(config.kp(), -2.0);
        assert_eq!(config.ki(), 0.5);
    }

    #[test]
    fn test_get_and_set_sample_time() {
        let mut config = AutotuneConfig::default();
        assert!(config.set_sample_time(Duration::from_millis(250)).is_ok());
        assert_eq!(config.dt(), 0.25);

        assert_eq!(
            config.set_sample_time(Duration::ZERO),
            Err(ConfigError::InvalidSampleTime)
        );
        assert_eq!(config.sample_time(), Duration::from_millis(250));
    }

    #[test]
    fn test_get_and_set_relay_amplitude() {
        let mut config = AutotuneConfig::default();
        assert!(config.set_relay_amplitude(2.5).is_ok());

        for it in &[0.0, -1.0, f64::INFINITY, f64::NAN] {
            assert_eq!(
                config.set_relay_amplitude(*it),
                Err(ConfigError::InvalidRelayAmplitude)
            );
        }
        assert_eq!(config.relay_amplitude(), 2.5);
    }

    #[test]
    fn test_get_and_set_error_limit() {
        let mut config = AutotuneConfig::default();

        // Infinity disables the guard and is valid
        assert!(config.set_error_limit(f64::INFINITY).is_ok());
        assert!(config.set_error_limit(5.0).is_ok());

        for it in &[0.0, -1.0, f64::NAN] {
            assert_eq!(
                config.set_error_limit(*it),
                Err(ConfigError::InvalidErrorLimit)
            );
        }
        assert_eq!(config.error_limit(), 5.0);
    }

    #[test]
    fn test_get_and_set_half_cycle_window() {
        let mut config = AutotuneConfig::default();
        let min = Duration::from_millis(20);
        let max = Duration::from_millis(400);
        assert!(config.set_half_cycle_window(min, max).is_ok());

        assert_eq!(
            config.set_half_cycle_window(max, min),
            Err(ConfigError::InvalidHalfCycleWindow)
        );
        assert_eq!(
            config.set_half_cycle_window(min, min),
            Err(ConfigError::InvalidHalfCycleWindow)
        );
        assert_eq!(config.half_cycle_window(), (min, max));
    }

    #[test]
    fn test_builder() {
        let built = AutotuneConfigBuilder::default()
            .kp(2.0)
            .ki(0.1)
            .sample_time(Duration::from_millis(10))
            .relay_amplitude(3.0)
            .error_limit(50.0)
            .half_cycle_window(Duration::from_millis(50), Duration::from_secs(5))
            .build();
        assert!(built.is_ok());

        let mut expected = AutotuneConfig::default();
        assert!(expected.set_kp(2.0).is_ok());
        assert!(expected.set_ki(0.1).is_ok());
        assert!(expected.set_sample_time(Duration::from_millis(10)).is_ok());
        assert!(expected.set_relay_amplitude(3.0).is_ok());
        assert!(expected.set_error_limit(50.0).is_ok());
        assert!(expected
            .set_half_cycle_window(Duration::from_millis(50), Duration::from_secs(5))
            .is_ok());
        assert_eq!(built, Ok(expected));

        // An empty builder reproduces the defaults
        assert_eq!(
            AutotuneConfigBuilder::default().build(),
            Ok(AutotuneConfig::default())
        );

        assert_eq!(
            AutotuneConfigBuilder::default()
                .kp(f64::NAN)
                .build()
                .map(|_| ()),
            Err(ConfigError::InvalidProportionalGain)
        );
        assert_eq!(
            AutotuneConfigBuilder::default()
                .relay_amplitude(0.0)
                .build()
                .map(|_| ()),
            Err(ConfigError::InvalidRelayAmplitude)
        );
    }

    #[test]
    fn test_relay_state() {
        assert_eq!(RelayState::opposing(5.0), RelayState::Low);
        assert_eq!(RelayState::opposing(0.0), RelayState::Low);
        assert_eq!(RelayState::opposing(-0.1), RelayState::High);
        assert_eq!(RelayState::High.flipped(), RelayState::Low);
        assert_eq!(RelayState::Low.sign(), -1.0);
    }

    #[test]
    fn test_as_millis_f64() {
        assert_eq!(as_millis_f64(Duration::from_millis(123)), 123.0);
        assert_eq!(as_millis_f64(Duration::from_micros(1500)), 1.5);
    }
}
