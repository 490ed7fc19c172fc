//! Relay experiment on a reverse-acting lag chain, followed by the resulting gains
//! This example requires the `--features simulation` flag to be enabled.
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

use std::time::Duration;

use relay_pi::controller::{AutotuneConfigBuilder, RelayAutotuner};
use relay_pi::fault::Event;
use relay_pi::sim;
use relay_pi::time::{Clock, ManualClock, Millis};

const FIXED_STEP_SIZE_MS: u64 = 10;

pub fn main() {
    let cfg = AutotuneConfigBuilder::default()
        .kp(1.0)
        .ki(0.0)
        .sample_time(Duration::from_millis(FIXED_STEP_SIZE_MS))
        .relay_amplitude(1.0)
        .build()
        .unwrap();

    let mdl = sim::LagChain {
        time_constant: 0.2,
        gain: -1.0,
    };
    let mut state = mdl.steady_state(-0.5);
    let mut output = mdl.h(state);

    let clock = ManualClock::new(Millis(0));
    let mut pi = RelayAutotuner::with_observer(
        cfg,
        &clock,
        |event: Event| println!("fault guard: {event:?}"),
        output,
    );

    const FIXED_STEP_SIZE_S: f64 = FIXED_STEP_SIZE_MS as f64 * 0.001;
    let setpoint = 0.0;

    clock.advance(Duration::from_millis(200));
    for i in 0..2000usize {
        let control = pi.relay_feedback_test(output);
        // Only for the integral the gain estimate reads
        let _ = pi.update(setpoint, output);

        state = sim::rk4_step(|x| mdl.f(x, control), state, FIXED_STEP_SIZE_S);
        output = mdl.h(state);
        clock.advance(Duration::from_millis(FIXED_STEP_SIZE_MS));

        if i % 100 == 0 {
            println!("t={:>6}ms  relay={:+.1}  y={:+.4}", clock.now().0, control, output);
        }
    }

    let half_cycles: Vec<f64> = pi.cycle_times().collect();
    println!("recorded half-cycles (ms): {half_cycles:?}");

    let ultimate = pi.calculate_ultimate_gain_and_period();
    println!("Ku = {:.4}, Pu = {:.1}ms", ultimate.ku, ultimate.pu);

    pi.set_tuning_parameters(ultimate.ku, ultimate.pu);
    if pi.in_error_state() {
        println!("tuning rejected: {:?}", pi.last_fault());
    } else {
        let (kp, ki) = pi.gains();
        println!("kp = {kp:.4}, ki = {ki:.6}");
    }
}

