//! The row of coupled columns and its per-tick update.
//!
//! Columns live in one contiguous `Vec`, and neighbors refer to each other by
//! index. A tick advances every column exactly once. The optional driver
//! steps once before the columns, or after each column in
//! [`Sequential`](UpdateOrder::Sequential) order.
//!
//! Two independent knobs control how a tick reads state:
//!
//! - [`UpdateOrder`] decides whether every column sees the same snapshot
//!   ([`Simultaneous`](UpdateOrder::Simultaneous)) or columns are updated
//!   one after another in place ([`Sequential`](UpdateOrder::Sequential)).
//! - [`Integrator`] decides whether the acceleration is taken after the
//!   height moved ([`SemiImplicit`](Integrator::SemiImplicit)) or before
//!   ([`Explicit`](Integrator::Explicit)).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::driver::{Driver, DriverConfig};
use crate::oscillator::{Neighbor, Oscillator};
use crate::params::Coefficients;

/// Starting state of every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialCondition {
    /// Height and velocity zero everywhere.
    #[default]
    Rest,
    /// Integer heights drawn uniformly from `min..=max`, velocity zero.
    Scattered {
        min: i32,
        max: i32,
        /// Fixed seed for a reproducible layout. `None` draws from entropy.
        seed: Option<u64>,
    },
}

/// How neighbor state is read during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOrder {
    /// Every acceleration comes from one shared snapshot, then all updates
    /// are applied. The driver steps once, before the snapshot. Evolution
    /// does not depend on iteration order.
    #[default]
    Simultaneous,
    /// Columns are updated left to right in place, so each column sees its
    /// already-updated left neighbor and its stale right neighbor. The
    /// driver steps after every column, so a driven chain of `n` columns
    /// runs its pulse `n` times faster.
    Sequential,
}

/// Which heights the acceleration is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Drift the height with the old velocity, then compute the acceleration
    /// from the drifted heights. Symplectic Euler.
    #[default]
    SemiImplicit,
    /// Compute the acceleration from the pre-update heights, then step.
    /// Forward Euler: grows without bound unless damping exceeds the
    /// effective stiffness.
    Explicit,
}

/// Read-only view of the chain after a tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Ticks completed so far.
    pub tick: u64,
    /// Columns in index order.
    pub columns: &'a [Oscillator],
}

impl<'a> Frame<'a> {
    /// `(index, height)` for every column, in order.
    pub fn heights(&self) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.columns.iter().map(|c| (c.index(), c.height))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A fixed row of coupled oscillators plus an optional driver.
#[derive(Debug, Clone)]
pub struct ColumnChain {
    columns: Vec<Oscillator>,
    driver: Option<Driver>,
    coefficients: Coefficients,
    update_order: UpdateOrder,
    integrator: Integrator,
    /// Per-tick acceleration buffer, reused across ticks.
    scratch: Vec<f64>,
    ticks: u64,
}

impl ColumnChain {
    /// Allocate `n` columns, wire consecutive pairs both ways, and attach the
    /// driver (if any) as the right neighbor of the last column.
    pub fn build(
        n: usize,
        coefficients: Coefficients,
        initial: InitialCondition,
        driver: Option<DriverConfig>,
    ) -> Self {
        let heights = initial_heights(n, initial);
        let mut columns: Vec<Oscillator> = heights
            .into_iter()
            .enumerate()
            .map(|(i, h)| Oscillator::new(i, h, 0.0))
            .collect();

        for i in 1..n {
            columns[i].left = Some(Neighbor::Column(i - 1));
            columns[i - 1].right = Some(Neighbor::Column(i));
        }

        let driver = driver.map(Driver::new);
        if driver.is_some() {
            if let Some(last) = columns.last_mut() {
                last.right = Some(Neighbor::Driver);
            }
        }

        Self {
            columns,
            driver,
            coefficients,
            update_order: UpdateOrder::default(),
            integrator: Integrator::default(),
            scratch: vec![0.0; n],
            ticks: 0,
        }
    }

    pub fn with_update_order(mut self, order: UpdateOrder) -> Self {
        self.update_order = order;
        self
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    /// Advance every column by one step.
    ///
    /// In [`Simultaneous`](UpdateOrder::Simultaneous) order the driver steps
    /// first, so the last column reads `A·sin(ω·(t-1))` on tick `t`. In
    /// [`Sequential`](UpdateOrder::Sequential) order it steps after each
    /// column.
    pub fn tick(&mut self) {
        match self.update_order {
            UpdateOrder::Simultaneous => {
                self.step_driver();
                self.tick_simultaneous();
            }
            UpdateOrder::Sequential => self.tick_sequential(),
        }

        self.ticks += 1;
    }

    fn step_driver(&mut self) {
        if let Some(driver) = &mut self.driver {
            let was_active = driver.is_active();
            driver.step();
            if was_active && !driver.is_active() {
                log::debug!(
                    "driver inert after {} steps, holding height {:.3}",
                    driver.counter(),
                    driver.height()
                );
            }
        }
    }

    fn tick_simultaneous(&mut self) {
        let Self {
            columns,
            driver,
            coefficients,
            integrator,
            scratch,
            ..
        } = self;

        if *integrator == Integrator::SemiImplicit {
            for column in columns.iter_mut() {
                column.drift();
            }
        }

        for (i, a) in scratch.iter_mut().enumerate() {
            *a = acceleration_at(columns, driver.as_ref(), coefficients, i);
        }

        for (column, &a) in columns.iter_mut().zip(scratch.iter()) {
            match integrator {
                Integrator::SemiImplicit => column.kick(a),
                Integrator::Explicit => column.step(a),
            }
        }
    }

    fn tick_sequential(&mut self) {
        for i in 0..self.columns.len() {
            let driver = self.driver.as_ref();
            match self.integrator {
                Integrator::SemiImplicit => {
                    self.columns[i].drift();
                    let a = acceleration_at(&self.columns, driver, &self.coefficients, i);
                    self.columns[i].kick(a);
                }
                Integrator::Explicit => {
                    let a = acceleration_at(&self.columns, driver, &self.coefficients, i);
                    self.columns[i].step(a);
                }
            }
            self.step_driver();
        }
    }

    /// View of the current state for rendering.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            tick: self.ticks,
            columns: &self.columns,
        }
    }

    /// `Σ(height² · K/2 + velocity²/2)` over all columns.
    pub fn energy(&self) -> f64 {
        let k = self.coefficients.k;
        self.columns
            .iter()
            .map(|c| c.height * c.height * k / 2.0 + c.velocity * c.velocity / 2.0)
            .sum()
    }

    pub fn heights(&self) -> impl Iterator<Item = f64> + '_ {
        self.columns.iter().map(|c| c.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Oscillator] {
        &self.columns
    }

    /// Mutable access to column heights and velocities. Wiring stays fixed.
    pub fn columns_mut(&mut self) -> &mut [Oscillator] {
        &mut self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Oscillator> {
        self.columns.get(index)
    }

    pub fn driver(&self) -> Option<&Driver> {
        self.driver.as_ref()
    }

    /// Ticks completed since construction.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn update_order(&self) -> UpdateOrder {
        self.update_order
    }

    pub fn integrator(&self) -> Integrator {
        self.integrator
    }
}

fn neighbor_height(
    columns: &[Oscillator],
    driver: Option<&Driver>,
    neighbor: Option<Neighbor>,
) -> Option<f64> {
    match neighbor? {
        Neighbor::Column(j) => columns.get(j).map(|c| c.height),
        Neighbor::Driver => driver.map(Driver::height),
    }
}

fn acceleration_at(
    columns: &[Oscillator],
    driver: Option<&Driver>,
    coefficients: &Coefficients,
    i: usize,
) -> f64 {
    let column = &columns[i];
    let left = neighbor_height(columns, driver, column.left);
    let right = neighbor_height(columns, driver, column.right);
    column.acceleration(coefficients, left, right)
}

fn initial_heights(n: usize, initial: InitialCondition) -> Vec<f64> {
    match initial {
        InitialCondition::Rest => vec![0.0; n],
        InitialCondition::Scattered { min, max, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            // Reversed ranges are rejected by the builder; normalized here so
            // construction stays total.
            let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
            (0..n).map(|_| rng.gen_range(lo..=hi) as f64).collect()
        }
    }
}
