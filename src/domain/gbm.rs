//! Geometric Brownian motion log-return statistics and price paths.

use rand::Rng;
use rand_distr::StandardNormal;

use super::error::SimtraderError;

/// Drift and volatility of a GBM process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GbmParameters {
    mu: f64,
    sigma: f64,
}

impl GbmParameters {
    pub fn new(mu: f64, sigma: f64) -> Result<Self, SimtraderError> {
        if !mu.is_finite() {
            return Err(SimtraderError::InvalidParameter {
                name: "mu".to_string(),
                reason: "must be finite".to_string(),
            });
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(SimtraderError::InvalidParameter {
                name: "sigma".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(GbmParameters { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Mean of the log return over one step of size `dt`, including the
    /// drift correction term: `(mu - sigma²/2)·dt`.
    pub fn log_return_mean(&self, dt: f64) -> f64 {
        (self.mu - self.sigma * self.sigma / 2.0) * dt
    }

    /// Standard deviation of the log return over one step: `sigma·√dt`.
    pub fn log_return_std(&self, dt: f64) -> f64 {
        self.sigma * dt.sqrt()
    }

    /// Draws one log return `ln(P_1/P_0) = mean + std·ε` with ε ~ N(0, 1).
    pub fn sample_log_return<R: Rng + ?Sized>(&self, dt: f64, rng: &mut R) -> f64 {
        let epsilon: f64 = rng.sample(StandardNormal);
        self.log_return_mean(dt) + self.log_return_std(dt) * epsilon
    }
}

/// Builds the price path `S_k = S_0 · exp(r_1 + … + r_k)`. The first
/// element is the initial price itself.
pub fn simulate_prices(initial_price: f64, log_returns: &[f64]) -> Vec<f64> {
    let mut prices = Vec::with_capacity(log_returns.len() + 1);
    prices.push(initial_price);
    let mut cumulative = 0.0;
    for r in log_returns {
        cumulative += r;
        prices.push(initial_price * cumulative.exp());
    }
    prices
}
