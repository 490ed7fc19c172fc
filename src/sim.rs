use crate::time::InstantLike;
use nalgebra as na;

pub enum WaveForm {
    Sine,
    Square,
}

pub struct SignalGenerator<I: InstantLike> {
    fcn: fn(f64) -> f64,
    initial_time: I,
    amplitude: f64,
    offset: f64,
}

impl<I: InstantLike> SignalGenerator<I> {
    pub fn new(waveform: WaveForm, initial_time: I, amplitude: f64, offset: f64) -> Self {
        Self {
            fcn: match waveform {
                WaveForm::Sine => f64::sin,
                WaveForm::Square => |x| x.sin().signum(),
            },
            initial_time,
            amplitude,
            offset,
        }
    }

    pub fn generate(&self, time: I) -> f64 {
        self.amplitude * (self.fcn)(time.duration_since(self.initial_time).as_secs_f64())
            + self.offset
    }
}

/// Three identical first-order lags in series, e.g. a heated plate read through a sluggish
/// sensor. A negative `gain` models a reverse-acting process such as a cooler, which is what the
/// relay oscillator needs to sustain a limit cycle: it switches to the sign of the measurement.
pub struct LagChain {
    pub time_constant: f64,
    pub gain: f64,
}

impl LagChain {
    /// Implements the state-space realization of the lag chain:
    /// ┌     ┐         ┌           ┐┌    ┐         ┌   ┐
    /// │ x₁' │         │ -1  0   0 ││ x₁ │         │ K │
    /// │ x₂' │ = 1/τ · │  1  -1  0 ││ x₂ │ + 1/τ · │ 0 │ u
    /// │ x₃' │         │  0  1  -1 ││ x₃ │         │ 0 │
    /// └     ┘         └           ┘└    ┘         └   ┘
    /// y = x₃
    pub fn f(&self, x: na::Vector3<f64>, u: f64) -> na::Vector3<f64> {
        let inv_tc = 1.0 / self.time_constant;

        let mat_a = na::Matrix3::new(-1.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, -1.0) * inv_tc;
        let mat_b = na::Vector3::new(self.gain * inv_tc, 0.0, 0.0);

        mat_a * x + mat_b * u
    }

    pub fn h(&self, x: na::Vector3<f64>) -> f64 {
        x[2]
    }

    /// The state the chain settles to under a constant input
    pub fn steady_state(&self, u: f64) -> na::Vector3<f64> {
        na::Vector3::repeat(self.gain * u)
    }
}

/// One classical Runge-Kutta step of `x' = f(x)`
pub fn rk4_step<F>(f: F, x: na::Vector3<f64>, step: f64) -> na::Vector3<f64>
where
    F: Fn(na::Vector3<f64>) -> na::Vector3<f64>,
{
    let k1 = f(x);
    let k2 = f(x + k1 * (0.5 * step));
    let k3 = f(x + k2 * (0.5 * step));
    let k4 = f(x + k3 * step);
    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (step / 6.0)
}
