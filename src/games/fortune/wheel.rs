//! The prize wheel.

use super::rng::GameRng;
use derive_more::{Display, Error};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Default wheel denominations, in dollars.
pub const DEFAULT_DENOMINATIONS: [u64; 7] = [50, 100, 150, 200, 250, 500, 1000];

/// Error building a wheel with no denominations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Prize wheel needs at least one denomination")]
pub struct EmptyWheel;

/// Stateless prize generator over a fixed, ordered set of denominations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeWheel {
    denominations: Arc<[u64]>,
}

impl PrizeWheel {
    /// Creates a wheel from the given denominations.
    pub fn new(denominations: impl Into<Vec<u64>>) -> Result<Self, EmptyWheel> {
        let denominations = denominations.into();
        if denominations.is_empty() {
            return Err(EmptyWheel);
        }
        Ok(Self {
            denominations: denominations.into(),
        })
    }

    /// Returns the configured denominations.
    pub fn denominations(&self) -> &[u64] {
        &self.denominations
    }

    /// Draws one denomination with uniform probability.
    #[instrument(skip_all)]
    pub fn spin(&self, rng: &mut GameRng) -> u64 {
        let amount = self.denominations[rng.index(self.denominations.len())];
        debug!(amount, "Wheel spun");
        amount
    }
}

impl Default for PrizeWheel {
    fn default() -> Self {
        Self {
            denominations: DEFAULT_DENOMINATIONS.to_vec().into(),
        }
    }
}
