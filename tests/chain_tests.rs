//! Integration tests for the column chain.
//!
//! These drive the public API the way the runners do: build a chain, set a
//! starting state, tick it, and inspect the result.

use ripples::prelude::*;
use ripples::{Neighbor, Scheduler};

fn chain_from(heights: &[f64], coefficients: Coefficients) -> ColumnChain {
    let mut chain = ColumnChain::build(heights.len(), coefficients, InitialCondition::Rest, None);
    for (column, &h) in chain.columns_mut().iter_mut().zip(heights) {
        column.height = h;
    }
    chain
}

fn velocities(chain: &ColumnChain) -> Vec<f64> {
    chain.columns().iter().map(|c| c.velocity).collect()
}

// ============================================================================
// Force model
// ============================================================================

#[test]
fn test_zero_coefficients_coast() {
    let mut chain = chain_from(&[10.0, -4.0], Coefficients::ZERO);
    chain.columns_mut()[0].velocity = 2.5;
    chain.columns_mut()[1].velocity = -1.0;

    for _ in 0..4 {
        chain.tick();
    }

    let heights: Vec<f64> = chain.heights().collect();
    assert_eq!(heights, vec![20.0, -8.0]);
    assert_eq!(velocities(&chain), vec![2.5, -1.0]);
}

#[test]
fn test_rest_is_equilibrium() {
    let coefficients = Coefficients::new(0.0, 0.0, 0.1);
    for order in [UpdateOrder::Simultaneous, UpdateOrder::Sequential] {
        let mut chain = ColumnChain::build(4, coefficients, InitialCondition::Rest, None)
            .with_update_order(order);
        chain.tick();

        assert_eq!(chain.ticks(), 1);
        assert!(chain.heights().all(|h| h == 0.0));
        assert!(velocities(&chain).iter().all(|&v| v == 0.0));
    }
}

#[test]
fn test_equal_pair_stays_equal() {
    let mut chain = chain_from(&[7.0, 7.0], Coefficients::new(0.01, 0.02, 0.3));
    for _ in 0..500 {
        chain.tick();
        let cols = chain.columns();
        assert_eq!(cols[0].height, cols[1].height);
        assert_eq!(cols[0].velocity, cols[1].velocity);
    }
}

#[test]
fn test_boundary_columns_have_one_open_side() {
    let chain = ColumnChain::build(4, Coefficients::ZERO, InitialCondition::Rest, None);
    assert_eq!(chain.columns()[0].left(), None);
    assert_eq!(chain.columns()[0].right(), Some(Neighbor::Column(1)));
    assert_eq!(chain.columns()[3].left(), Some(Neighbor::Column(2)));
    assert_eq!(chain.columns()[3].right(), None);

    // A lone displaced end column only feels its one neighbor
    let c = Coefficients::new(0.0, 0.0, 0.5);
    let mut chain = chain_from(&[2.0, 0.0, 0.0], c).with_integrator(Integrator::Explicit);
    chain.tick();
    assert_eq!(velocities(&chain), vec![-1.0, 1.0, 0.0]);
}

// ============================================================================
// Update order
// ============================================================================

#[test]
fn test_simultaneous_preserves_mirror_symmetry() {
    let c = Coefficients::new(0.001, 0.0005, 0.1);
    let mut chain = chain_from(&[1.0, 0.0, 1.0], c);

    for _ in 0..1000 {
        chain.tick();
        let cols = chain.columns();
        assert_eq!(cols[0].height, cols[2].height);
        assert_eq!(cols[0].velocity, cols[2].velocity);
    }
}

#[test]
fn test_sequential_breaks_mirror_symmetry() {
    let c = Coefficients::new(0.0, 0.0, 0.1);
    let mut chain = chain_from(&[1.0, 0.0, 1.0], c).with_update_order(UpdateOrder::Sequential);

    chain.tick();
    chain.tick();

    let cols = chain.columns();
    assert_eq!(cols[0].height, cols[2].height);
    // Column 2 already sees column 1's drifted height; column 0 did not
    assert!((cols[0].velocity - -0.19).abs() < 1e-12);
    assert!((cols[2].velocity - -0.17).abs() < 1e-12);
}

/// Plain in-place loop: each column moves, reads its neighbors as they are
/// right now, and the driver steps after every column.
struct InPlaceLoop {
    heights: Vec<f64>,
    velocities: Vec<f64>,
    coefficients: Coefficients,
    amplitude: f64,
    omega: f64,
    driver_height: f64,
    driver_counter: u64,
}

impl InPlaceLoop {
    fn new(n: usize, coefficients: Coefficients, amplitude: f64, omega: f64) -> Self {
        Self {
            heights: vec![0.0; n],
            velocities: vec![0.0; n],
            coefficients,
            amplitude,
            omega,
            driver_height: 0.0,
            driver_counter: 0,
        }
    }

    fn tick(&mut self) {
        let n = self.heights.len();
        let c = self.coefficients;
        for i in 0..n {
            self.heights[i] += self.velocities[i];
            let h = self.heights[i];
            let own = h * c.k + self.velocities[i] * c.dashpot;
            let right = if i + 1 < n {
                c.neighbor_k * (h - self.heights[i + 1])
            } else {
                c.neighbor_k * (h - self.driver_height)
            };
            let left = if i > 0 {
                c.neighbor_k * (h - self.heights[i - 1])
            } else {
                0.0
            };
            self.velocities[i] += -(own + right + left);

            if self.driver_counter < (4.0 * std::f64::consts::PI / self.omega) as u64 {
                self.driver_height =
                    self.amplitude * (self.omega * self.driver_counter as f64).sin();
                self.driver_counter += 1;
            }
        }
    }
}

#[test]
fn test_sequential_matches_in_place_loop() {
    let coefficients = Coefficients::new(0.0, 0.0, 0.002);
    let mut reference = InPlaceLoop::new(4, coefficients, 400.0, 0.1);
    let mut chain = ColumnChain::build(
        4,
        coefficients,
        InitialCondition::Rest,
        Some(DriverConfig::new(400.0, 0.1)),
    )
    .with_update_order(UpdateOrder::Sequential);

    for _ in 0..20 {
        reference.tick();
        chain.tick();
        let heights: Vec<f64> = chain.heights().collect();
        assert_eq!(heights, reference.heights);
        assert_eq!(velocities(&chain), reference.velocities);
    }

    let driver = chain.driver().expect("driver attached");
    assert_eq!(driver.counter(), 80);
    assert_eq!(driver.counter(), reference.driver_counter);
    assert_eq!(driver.height(), reference.driver_height);
}

#[test]
fn test_sequential_matches_in_place_loop_past_driver_bound() {
    // Damped, and long enough for the driver to go inert mid-tick
    let coefficients = Coefficients::new(0.001, 0.002, 0.01);
    let mut reference = InPlaceLoop::new(5, coefficients, 50.0, 0.5);
    let mut chain = ColumnChain::build(
        5,
        coefficients,
        InitialCondition::Rest,
        Some(DriverConfig::new(50.0, 0.5)),
    )
    .with_update_order(UpdateOrder::Sequential);

    for _ in 0..12 {
        reference.tick();
        chain.tick();
    }

    let heights: Vec<f64> = chain.heights().collect();
    assert_eq!(heights, reference.heights);
    assert_eq!(reference.driver_counter, 25);
    assert_eq!(chain.driver().map(Driver::counter), Some(25));
}

#[test]
fn test_simultaneous_is_order_independent() {
    // Reversing the chain must mirror the evolution
    let c = Coefficients::new(0.002, 0.001, 0.05);
    let heights = [3.0, -1.0, 4.0, -1.5, 5.0];
    let reversed: Vec<f64> = heights.iter().rev().copied().collect();

    let mut forward = chain_from(&heights, c);
    let mut backward = chain_from(&reversed, c);
    for _ in 0..200 {
        forward.tick();
        backward.tick();
    }

    let f: Vec<f64> = forward.heights().collect();
    let mut b: Vec<f64> = backward.heights().collect();
    b.reverse();
    for (x, y) in f.iter().zip(&b) {
        assert!((x - y).abs() < 1e-9, "{} vs {}", x, y);
    }
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn test_damped_energy_does_not_grow() {
    let c = Coefficients::new(0.01, 0.02, 0.0001);
    let initial = InitialCondition::Scattered {
        min: -200,
        max: 200,
        seed: Some(42),
    };
    let mut chain = ColumnChain::build(32, c, initial, None);
    let start = chain.energy();
    assert!(start > 0.0);

    let mut peak = start;
    for _ in 0..2000 {
        chain.tick();
        let e = chain.energy();
        assert!(e.is_finite());
        peak = peak.max(e);
    }

    assert!(peak <= start * 1.25, "peak {} vs start {}", peak, start);
    assert!(chain.energy() < start * 0.01);
}

#[test]
fn test_pulse_preset_stays_bounded() {
    let mut chain = Ripples::preset(Preset::Pulse)
        .build_chain()
        .expect("valid preset");
    let bound = chain.driver().map(Driver::bound).unwrap_or_default();
    assert_eq!(bound, 25132);

    let mut peak: f64 = 0.0;
    for _ in 0..bound + 2000 {
        chain.tick();
        peak = chain.heights().fold(peak, |m, h| m.max(h.abs()));
    }

    assert!(peak.is_finite());
    assert!(peak > 1.0, "driver should move the chain");
    assert!(peak < 2000.0, "peak height {}", peak);
    assert!(!chain.driver().map(Driver::is_active).unwrap_or(true));
}

#[test]
fn test_explicit_integrator_diverges_without_damping() {
    let mut chain = Ripples::preset(Preset::Pulse)
        .with_integrator(Integrator::Explicit)
        .build_chain()
        .expect("valid preset");

    let mut diverged = false;
    for _ in 0..25_000 {
        chain.tick();
        if chain.heights().any(|h| !h.is_finite() || h.abs() > 1e6) {
            diverged = true;
            break;
        }
    }
    assert!(diverged);
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn test_driver_goes_inert_after_two_periods() {
    let mut driver = Driver::new(DriverConfig::new(400.0, 0.0005));
    assert_eq!(driver.counter(), 0);
    let bound = driver.bound();
    assert_eq!(bound, (4.0 * std::f64::consts::PI / 0.0005).floor() as u64);

    for _ in 0..bound {
        driver.step();
    }
    let held = driver.height();
    assert!(held.abs() < 1.0, "ends near zero at a full period, got {}", held);

    driver.step();
    driver.step();
    assert_eq!(driver.counter(), bound);
    assert_eq!(driver.height(), held);
}

#[test]
fn test_driver_forces_only_last_column() {
    let mut chain = ColumnChain::build(
        5,
        Coefficients::new(0.0, 0.0, 0.01),
        InitialCondition::Rest,
        Some(DriverConfig::new(100.0, 0.1)),
    );
    assert_eq!(chain.columns()[4].right(), Some(Neighbor::Driver));

    // Tick 2 is the first to read a non-zero driver height
    for _ in 0..2 {
        chain.tick();
    }
    let v = velocities(&chain);
    assert!(v[4] > 0.0);
    assert!(v[..4].iter().all(|&x| x == 0.0));
}

// ============================================================================
// Rendering path
// ============================================================================

#[test]
fn test_headless_plane_run_draws_every_tick() {
    let ripples = Ripples::preset(Preset::Plane)
        .with_window_size(240, 120)
        .with_initial(InitialCondition::Scattered {
            min: -40,
            max: 40,
            seed: Some(3),
        });
    let mut canvas = Canvas::new(*ripples.layout(), *ripples.colors());
    let mut pacer = SteppedPacer::new();

    let ticks = ripples
        .run_headless(&mut canvas, &mut pacer, Some(100))
        .expect("valid settings");

    assert_eq!(ticks, 100);
    assert_eq!(canvas.frames(), 100);
    // 100 ticks at 100/s: first immediate, 99 waits of 10ms
    assert_eq!(pacer.elapsed(), std::time::Duration::from_millis(990));
    let lit = canvas.pixels().iter().filter(|&&p| p != 0).count();
    assert!(lit > 0);
    assert!(canvas.pixels().iter().all(|&p| p == 0 || p == 0x009B_00FF));
}

#[test]
fn test_scheduler_feeds_frames_in_order() {
    let mut chain = ColumnChain::build(
        3,
        Coefficients::default(),
        InitialCondition::Rest,
        Some(DriverConfig::new(10.0, 0.5)),
    );
    let mut seen = Vec::new();
    let mut renderer = |frame: &Frame<'_>| {
        let pairs: Vec<usize> = frame.heights().map(|(i, _)| i).collect();
        seen.push((frame.tick, pairs));
    };

    Scheduler::new(50)
        .with_limit(3)
        .run(&mut chain, &mut renderer, &mut SteppedPacer::new());

    assert_eq!(
        seen,
        vec![(1, vec![0, 1, 2]), (2, vec![0, 1, 2]), (3, vec![0, 1, 2])]
    );
}
