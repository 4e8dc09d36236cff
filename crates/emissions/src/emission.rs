use std::ops::Add;

use serde::Serialize;
use uom::{ConstZero, si::f64::Mass};

use crate::GwpTable;

/// Gas masses produced by one model evaluation.
///
/// A plain value: `co2eq` is the GWP-weighted sum of `ch4` and `n2o` under
/// the table the result was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionResult {
    pub ch4: Mass,
    pub n2o: Mass,
    pub co2eq: Mass,
}

impl EmissionResult {
    /// The result for an empty container.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            ch4: Mass::ZERO,
            n2o: Mass::ZERO,
            co2eq: Mass::ZERO,
        }
    }

    /// Builds a result from gas masses, weighting them with `gwp`.
    #[must_use]
    pub fn from_gases(ch4: Mass, n2o: Mass, gwp: &GwpTable) -> Self {
        Self {
            ch4,
            n2o,
            co2eq: gwp.co2eq(ch4, n2o),
        }
    }
}

impl Default for EmissionResult {
    fn default() -> Self {
        Self::zero()
    }
}

/// Adds results computed with the same GWP table.
impl Add for EmissionResult {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ch4: self.ch4 + rhs.ch4,
            n2o: self.n2o + rhs.n2o,
            co2eq: self.co2eq + rhs.co2eq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::mass::kilogram;

    #[test]
    fn sum_keeps_co2eq_consistent() {
        let gwp = GwpTable::AR6_GWP100;
        let a = EmissionResult::from_gases(Mass::new::<kilogram>(1.0), Mass::new::<kilogram>(0.1), &gwp);
        let b = EmissionResult::from_gases(Mass::new::<kilogram>(0.5), Mass::ZERO, &gwp);

        let total = a + b + EmissionResult::zero();
        let expected = gwp.co2eq(total.ch4, total.n2o);

        assert_relative_eq!(total.co2eq.get::<kilogram>(), expected.get::<kilogram>(), epsilon = 1e-12);
    }
}
