//! Totals over many batches.
//!
//! Only batches that reached their full state count. Each batch is evaluated
//! independently, so totals do not depend on input order beyond
//! floating-point rounding.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use uom::{ConstZero, si::f64::Mass, si::mass::kilogram};

use crate::{BatchEvaluation, Scenario, WasteBatch};

/// Summed mass and avoided emissions of a set of batches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateTotals {
    pub total_mass: Mass,
    pub total_avoided_tco2eq: f64,
    pub batch_count: usize,
}

impl AggregateTotals {
    #[must_use]
    pub fn zero() -> Self {
        Self {
            total_mass: Mass::ZERO,
            total_avoided_tco2eq: 0.0,
            batch_count: 0,
        }
    }

    pub(crate) fn include(&mut self, evaluation: &BatchEvaluation) {
        self.total_mass += evaluation.mass;
        self.total_avoided_tco2eq += evaluation.avoided_tco2eq;
        self.batch_count += 1;
    }
}

impl Default for AggregateTotals {
    fn default() -> Self {
        Self::zero()
    }
}

/// Evaluates every full batch, in input order.
pub fn evaluate_full<'a>(
    batches: &'a [WasteBatch],
    scenario: &'a Scenario,
) -> impl Iterator<Item = (&'a WasteBatch, BatchEvaluation)> + 'a {
    batches
        .iter()
        .filter(|batch| batch.is_full())
        .map(move |batch| (batch, scenario.evaluate(batch.mass())))
}

/// Sums mass and avoided emissions over the full batches.
#[must_use]
pub fn aggregate(batches: &[WasteBatch], scenario: &Scenario) -> AggregateTotals {
    let mut totals = AggregateTotals::zero();
    for (_, evaluation) in evaluate_full(batches, scenario) {
        totals.include(&evaluation);
    }

    debug!(
        batches = batches.len(),
        full = totals.batch_count,
        mass_kg = totals.total_mass.get::<kilogram>(),
        avoided_tco2eq = totals.total_avoided_tco2eq,
        "aggregated batches"
    );

    totals
}

/// Sums full batches per school.
///
/// Batches without a school are grouped under `None`.
#[must_use]
pub fn aggregate_by_school(
    batches: &[WasteBatch],
    scenario: &Scenario,
) -> BTreeMap<Option<String>, AggregateTotals> {
    let mut by_school: BTreeMap<Option<String>, AggregateTotals> = BTreeMap::new();
    for (batch, evaluation) in evaluate_full(batches, scenario) {
        by_school
            .entry(batch.school_id().map(str::to_owned))
            .or_default()
            .include(&evaluation);
    }
    by_school
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use jiff::civil::date;
    use uom::si::{
        f64::{MassDensity, Volume},
        mass_density::gram_per_cubic_centimeter,
        volume::liter,
    };

    use crate::mass::Capacity;

    fn batch(liters: f64, school: &str, filled: bool) -> WasteBatch {
        let batch = WasteBatch::new(
            Capacity::Volume(Volume::new::<liter>(liters)),
            MassDensity::new::<gram_per_cubic_centimeter>(0.5),
        )
        .unwrap()
        .at_school(school);

        if filled {
            batch.filled_on(date(2024, 5, 10))
        } else {
            batch
        }
    }

    fn batches() -> Vec<WasteBatch> {
        vec![
            batch(100.0, "E01", true),
            batch(60.0, "E02", true),
            batch(100.0, "E01", false),
            batch(250.0, "E03", true),
            batch(0.0, "E02", true),
            batch(37.5, "E01", true),
        ]
    }

    #[test]
    fn unfilled_batches_are_excluded() {
        let totals = aggregate(&batches(), &Scenario::default());
        assert_eq!(totals.batch_count, 5);
        assert_relative_eq!(totals.total_mass.get::<kilogram>(), 223.75, epsilon = 1e-9);
    }

    #[test]
    fn totals_do_not_depend_on_order() {
        let scenario = Scenario::default();
        let forward = aggregate(&batches(), &scenario);

        let mut reversed = batches();
        reversed.reverse();
        let backward = aggregate(&reversed, &scenario);

        let mut rotated = batches();
        rotated.rotate_left(2);
        let shifted = aggregate(&rotated, &scenario);

        for other in [backward, shifted] {
            assert_eq!(other.batch_count, forward.batch_count);
            assert_relative_eq!(
                other.total_avoided_tco2eq,
                forward.total_avoided_tco2eq,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn totals_are_the_sum_of_evaluations() {
        let scenario = Scenario::default();
        let expected: f64 = batches()
            .iter()
            .filter(|b| b.is_full())
            .map(|b| scenario.evaluate(b.mass()).avoided_tco2eq)
            .sum();
        let totals = aggregate(&batches(), &scenario);
        assert_relative_eq!(totals.total_avoided_tco2eq, expected, max_relative = 1e-12);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(aggregate(&[], &Scenario::default()), AggregateTotals::zero());
    }

    #[test]
    fn schools_partition_the_total() {
        let scenario = Scenario::default();
        let by_school = aggregate_by_school(&batches(), &scenario);

        assert_eq!(by_school.len(), 3);
        assert_eq!(by_school[&Some("E01".to_string())].batch_count, 2);
        assert_eq!(by_school[&Some("E02".to_string())].batch_count, 2);

        let summed: f64 = by_school.values().map(|t| t.total_avoided_tco2eq).sum();
        let total = aggregate(&batches(), &scenario).total_avoided_tco2eq;
        assert_relative_eq!(summed, total, max_relative = 1e-12);
    }
}
