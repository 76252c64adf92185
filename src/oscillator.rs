//! A single column modeled as a damped spring-mass oscillator.

use crate::params::Coefficients;

/// What sits next to a column.
///
/// Neighbors are relations, not ownership: a [`Column`](Neighbor::Column)
/// is an index into the owning [`ColumnChain`](crate::ColumnChain), and
/// [`Driver`](Neighbor::Driver) refers to the chain's forcing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbor {
    /// Another column, by index.
    Column(usize),
    /// The chain's driver, read like a column but never written back.
    Driver,
}

/// Height and velocity state for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Oscillator {
    index: usize,
    /// Signed displacement from rest.
    pub height: f64,
    /// Signed rate of change of `height`, per tick.
    pub velocity: f64,
    pub(crate) left: Option<Neighbor>,
    pub(crate) right: Option<Neighbor>,
}

impl Oscillator {
    /// Create an unwired oscillator.
    pub fn new(index: usize, height: f64, velocity: f64) -> Self {
        Self {
            index,
            height,
            velocity,
            left: None,
            right: None,
        }
    }

    /// Position in the chain. Only used for layout.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn left(&self) -> Option<Neighbor> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<Neighbor> {
        self.right
    }

    /// Acceleration from the column's own state and its neighbors' heights.
    ///
    /// `left_height` and `right_height` are `None` for an open side, which
    /// then contributes no coupling force.
    pub fn acceleration(
        &self,
        coefficients: &Coefficients,
        left_height: Option<f64>,
        right_height: Option<f64>,
    ) -> f64 {
        let own = self.height * coefficients.k + self.velocity * coefficients.dashpot;
        let right = right_height.map_or(0.0, |h| coefficients.neighbor_k * (self.height - h));
        let left = left_height.map_or(0.0, |h| coefficients.neighbor_k * (self.height - h));
        -(own + right + left)
    }

    /// Move the height by the current velocity.
    #[inline]
    pub fn drift(&mut self) {
        self.height += self.velocity;
    }

    /// Apply an acceleration to the velocity.
    #[inline]
    pub fn kick(&mut self, acceleration: f64) {
        self.velocity += acceleration;
    }

    /// Advance one tick: the height moves by the old velocity, then the
    /// velocity takes the given acceleration.
    pub fn step(&mut self, acceleration: f64) {
        self.drift();
        self.kick(acceleration);
    }
}
