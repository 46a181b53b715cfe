use rand::Rng;

use orbis_types::{EstimatorConfig, GdpFormula};

/// Derives an approximate GDP from population and exchange rate.
///
/// The multiplier is drawn from the configured uniform range using the
/// caller's generator, so a seeded generator gives reproducible output.
/// The estimator never fails: whenever a value cannot be computed it returns
/// the configured sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GdpEstimator {
    cfg: EstimatorConfig,
}

impl GdpEstimator {
    /// Create an estimator with the given configuration.
    #[must_use]
    pub const fn new(cfg: EstimatorConfig) -> Self {
        Self { cfg }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EstimatorConfig {
        &self.cfg
    }

    /// Rate usable in the formula, or `None` when the sentinel applies.
    ///
    /// A missing currency code always forces the sentinel, even when a rate is
    /// supplied.
    #[must_use]
    pub fn usable_rate(currency_code: Option<&str>, rate: Option<f64>) -> Option<f64> {
        currency_code.filter(|c| !c.trim().is_empty())?;
        rate.filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Draw one multiplier from the configured range.
    pub fn draw_multiplier<R: Rng>(&self, rng: &mut R) -> f64 {
        let range = self.cfg.multiplier;
        if range.min >= range.max {
            range.min
        } else {
            rng.random_range(range.min..=range.max)
        }
    }

    /// Estimate GDP, drawing the multiplier from `rng` only when a value is computed.
    pub fn estimate<R: Rng>(
        &self,
        population: u64,
        currency_code: Option<&str>,
        rate: Option<f64>,
        rng: &mut R,
    ) -> Option<f64> {
        match Self::usable_rate(currency_code, rate) {
            Some(rate) => {
                let multiplier = self.draw_multiplier(rng);
                self.compute(population, rate, multiplier)
            }
            None => self.cfg.sentinel.value(),
        }
    }

    /// Estimate GDP with an explicit multiplier.
    #[must_use]
    pub fn estimate_with_multiplier(
        &self,
        population: u64,
        currency_code: Option<&str>,
        rate: Option<f64>,
        multiplier: f64,
    ) -> Option<f64> {
        match Self::usable_rate(currency_code, rate) {
            Some(rate) => self.compute(population, rate, multiplier),
            None => self.cfg.sentinel.value(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute(&self, population: u64, rate: f64, multiplier: f64) -> Option<f64> {
        let base = population as f64 * multiplier;
        let value = match self.cfg.formula {
            GdpFormula::DivideByRate => base / rate,
            GdpFormula::MultiplyByRate => base * rate,
        };
        if value.is_finite() {
            Some(value)
        } else {
            self.cfg.sentinel.value()
        }
    }
}
