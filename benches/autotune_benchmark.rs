//! Benchmark for the relay autotuner
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

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use relay_pi::{controller, time};

fn make_config() -> controller::AutotuneConfig {
    controller::AutotuneConfigBuilder::default()
        .kp(1.0)
        .ki(0.5)
        // Errors drift during the benchmark; keep the guard out of the way
        .error_limit(f64::INFINITY)
        .build()
        .unwrap()
}

/// The bare PI law: one multiply-add for the integral, two for the output.
fn bench_update(c: &mut Criterion) {
    let clock = time::ManualClock::new(time::Millis(0));
    let mut pi = controller::RelayAutotuner::new(make_config(), &clock, 0.0);
    let setpoint = 1.0;
    let mut measurement = 0.9;

    c.bench_function("PI update", |b| {
        b.iter(|| {
            let output = pi.update(black_box(setpoint), black_box(measurement));
            measurement += 0.0001; // prevent constant inputs
            black_box(output);
        });
    });
}

/// A relay that switches every 20 samples, so most iterations only compare signs and the rest
/// push into the half-cycle ring buffer.
fn bench_relay(c: &mut Criterion) {
    let clock = time::ManualClock::new(time::Millis(0));
    // Starts high, so the first switch comes after a full 20 samples
    let mut pi = controller::RelayAutotuner::new(make_config(), clock, -1.0);
    let dt = 10;
    let mut now = time::Millis(0);
    let mut tick = 0u64;

    c.bench_function("relay feedback test", |b| {
        b.iter(|| {
            now.0 += dt;
            tick += 1;
            let measurement = if (tick / 20) % 2 == 0 { 1.0 } else { -1.0 };
            let output = pi.relay_feedback_test_at(black_box(measurement), now);
            black_box(output);
        });
    });
}

/// The full tick: relay step, ultimate gain and period estimate, retune and PI update. Averaging
/// the half-cycle history dominates.
fn bench_auto_tune(c: &mut Criterion) {
    let clock = time::ManualClock::new(time::Millis(0));
    // Starts high, so the first switch comes after a full 20 samples
    let mut pi = controller::RelayAutotuner::new(make_config(), clock, -1.0);
    let dt = 10;

    // Seed the integral and one 200ms half-cycle, so every tick has history to estimate from
    let _ = pi.update(1.0, 0.0);
    let mut now = time::Millis(200);
    let mut tick = 20u64;
    let _ = pi.relay_feedback_test_at(-1.0, now);
    assert_eq!(pi.cycle_times().count(), 1);

    // Errors of +1.5 and -0.5 keep the integral growing, so the estimate never hits a zero
    // integral and the controller stays out of the error state
    let setpoint = 0.5;

    c.bench_function("auto tune", |b| {
        b.iter(|| {
            now.0 += dt;
            tick += 1;
            let measurement = if (tick / 20) % 2 == 0 { 1.0 } else { -1.0 };
            let output = pi.auto_tune_at(black_box(setpoint), black_box(measurement), now);
            black_box(output);
        });
    });

    assert!(!pi.in_error_state());
}

criterion_group!(benches, bench_update, bench_relay, bench_auto_tune);
criterion_main!(benches);
