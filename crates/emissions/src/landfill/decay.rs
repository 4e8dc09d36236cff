use vermi_core::constraint::{Constrained, StrictlyPositive};

use crate::constants::DAYS_PER_YEAR;

/// Daily first-order decay weights over a finite horizon.
///
/// Weight `t` (for `t = 1..=N`, `N = years × 365`) is the share of the
/// ultimate CH₄ yield generated on day `t`:
///
/// ```text
/// w[t] = exp(−k/365 · (t − 1)) − exp(−k/365 · t)
/// ```
///
/// The weights are not renormalized. Their sum is the share of the
/// ultimate yield released within the horizon, `1 − exp(−k·years)`, which
/// is strictly below one; the remainder is emitted after the crediting
/// period ends.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayKernel {
    weights: Vec<f64>,
}

impl DecayKernel {
    /// Builds the kernel for an annual decay rate `k` over `years`.
    #[must_use]
    pub fn new(decay_rate: Constrained<f64, StrictlyPositive>, years: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let daily_rate = decay_rate.into_inner() / DAYS_PER_YEAR as f64;
        let days = years as usize * DAYS_PER_YEAR;

        let weights = (1..=days)
            .map(|t| {
                #[allow(clippy::cast_precision_loss)]
                let t = t as f64;
                let w = (-daily_rate * (t - 1.0)).exp() - (-daily_rate * t).exp();
                w.max(0.0)
            })
            .collect();

        Self { weights }
    }

    /// Daily weights, day 1 first.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of days covered.
    #[must_use]
    pub fn days(&self) -> usize {
        self.weights.len()
    }

    /// Share of the ultimate yield released within the horizon, in `[0, 1]`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.iter().sum::<f64>().min(1.0)
    }

    /// Weights summed per 365-day year, year 1 first.
    #[must_use]
    pub fn yearly(&self) -> Vec<f64> {
        self.weights
            .chunks(DAYS_PER_YEAR)
            .map(|year| year.iter().sum())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use vermi_core::constraint::StrictlyPositive;

    fn kernel(k: f64, years: u32) -> DecayKernel {
        DecayKernel::new(StrictlyPositive::new(k).unwrap(), years)
    }

    #[test]
    fn sum_telescopes_to_closed_form() {
        let k = kernel(0.06, 20);
        assert_eq!(k.days(), 20 * 365);
        assert_relative_eq!(k.total(), 1.0 - (-0.06_f64 * 20.0).exp(), epsilon = 1e-9);
    }

    #[test]
    fn sum_is_bounded_and_grows_with_horizon() {
        let mut previous = 0.0;
        for years in [1, 5, 10, 20, 30, 50, 100] {
            let total = kernel(0.06, years).total();
            assert!(total > previous, "total must grow with the horizon");
            assert!(total < 1.0, "a finite horizon never releases the full yield");
            previous = total;
        }
    }

    #[test]
    fn zero_years_is_empty() {
        let k = kernel(0.06, 0);
        assert_eq!(k.days(), 0);
        assert_eq!(k.total(), 0.0);
        assert!(k.yearly().is_empty());
    }

    #[test]
    fn weights_are_non_negative_and_decreasing() {
        let k = kernel(0.17, 3);
        let w = k.weights();
        assert!(w.iter().all(|&x| x >= 0.0));
        assert!(w.windows(2).all(|pair| pair[1] < pair[0]));
    }

    #[test]
    fn yearly_sums_match_total() {
        let k = kernel(0.06, 10);
        let yearly = k.yearly();
        assert_eq!(yearly.len(), 10);
        assert_relative_eq!(yearly.iter().sum::<f64>(), k.total(), epsilon = 1e-12);
        assert_relative_eq!(yearly[0], 1.0 - (-0.06_f64).exp(), epsilon = 1e-9);
    }
}
