//! The single synchronous entry point: batches in, credits out.

use std::convert::Infallible;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uom::si::{
    f64::{Length, MassDensity, Volume},
    length::centimeter,
    mass_density::gram_per_cubic_centimeter,
    volume::liter,
};
use vermi_core::Model;

use crate::{
    BatchEvaluation, DimensionError, ParameterError, Scenario, ScenarioConfig, WasteBatch,
    aggregate::{AggregateTotals, aggregate, evaluate_full},
    constants::DEFAULT_DENSITY_KG_PER_L,
    credit::{CarbonPrice, CreditOutcome},
    mass::Capacity,
};

/// Avoided emissions of the full batches, valued at `price`.
#[must_use]
pub fn compute_credits(batches: &[WasteBatch], scenario: &Scenario, price: &CarbonPrice) -> CreditOutcome {
    let totals = aggregate(batches, scenario);
    CreditOutcome::new(totals.total_avoided_tco2eq, price)
}

/// Per-batch evaluations alongside the totals and their value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditReport {
    pub evaluations: Vec<BatchEvaluation>,
    pub totals: AggregateTotals,
    pub outcome: CreditOutcome,
}

/// A [`Scenario`] priced at a fixed [`CarbonPrice`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreditModel {
    scenario: Scenario,
    price: CarbonPrice,
}

impl CreditModel {
    #[must_use]
    pub fn new(scenario: Scenario, price: CarbonPrice) -> Self {
        Self { scenario, price }
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[must_use]
    pub fn price(&self) -> &CarbonPrice {
        &self.price
    }

    #[must_use]
    pub fn report(&self, batches: &[WasteBatch]) -> CreditReport {
        let evaluations: Vec<_> = evaluate_full(batches, &self.scenario)
            .map(|(_, evaluation)| evaluation)
            .collect();
        let totals = evaluations.iter().fold(AggregateTotals::zero(), |mut totals, evaluation| {
            totals.include(evaluation);
            totals
        });
        let outcome = CreditOutcome::new(totals.total_avoided_tco2eq, &self.price);

        debug!(
            avoided_tco2eq = outcome.avoided_tco2eq,
            value = outcome.monetary_value,
            "computed credits"
        );

        CreditReport {
            evaluations,
            totals,
            outcome,
        }
    }
}

impl Model for CreditModel {
    type Input = Vec<WasteBatch>;
    type Output = CreditReport;
    type Error = Infallible;

    fn call(&self, input: &Vec<WasteBatch>) -> Result<CreditReport, Infallible> {
        Ok(self.report(input))
    }
}

/// Errors from a [`CreditRequest`] with raw, unvalidated inputs.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CreditError {
    #[error(transparent)]
    Dimension(#[from] DimensionError),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// A batch states neither a volume nor dimensions.
    #[error("batch {index} has no capacity")]
    MissingCapacity { index: usize },
}

/// One batch as received from an outer boundary, in plain units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchInput {
    #[serde(default)]
    pub volume_liters: Option<f64>,
    /// Height, width, and length in centimeters.
    #[serde(default)]
    pub dimensions_cm: Option<[f64; 3]>,
    #[serde(default = "default_density")]
    pub density_kg_per_l: f64,
    #[serde(default)]
    pub filled_on: Option<Date>,
    #[serde(default)]
    pub school_id: Option<String>,
}

fn default_density() -> f64 {
    DEFAULT_DENSITY_KG_PER_L
}

impl BatchInput {
    /// Validates the input into a [`WasteBatch`].
    ///
    /// A stated volume takes precedence over dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError::MissingCapacity`] if neither is given, or
    /// [`CreditError::Dimension`] if a value is invalid.
    pub fn to_batch(&self, index: usize) -> Result<WasteBatch, CreditError> {
        let capacity = match (self.volume_liters, self.dimensions_cm) {
            (Some(liters), _) => Capacity::Volume(Volume::new::<liter>(liters)),
            (None, Some([height, width, length])) => Capacity::Dimensions {
                height: Length::new::<centimeter>(height),
                width: Length::new::<centimeter>(width),
                length: Length::new::<centimeter>(length),
            },
            (None, None) => return Err(CreditError::MissingCapacity { index }),
        };

        let mut batch = WasteBatch::new(
            capacity,
            MassDensity::new::<gram_per_cubic_centimeter>(self.density_kg_per_l),
        )?;
        if let Some(date) = self.filled_on {
            batch = batch.filled_on(date);
        }
        if let Some(school_id) = &self.school_id {
            batch = batch.at_school(school_id.clone());
        }
        Ok(batch)
    }
}

/// Everything needed for one credit calculation, in plain numbers.
///
/// This is the shape a service boundary would accept: validation happens
/// here, once, before any calculation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditRequest {
    pub batches: Vec<BatchInput>,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    pub price: CarbonPrice,
}

impl CreditRequest {
    /// Validates the request and computes the credit report.
    ///
    /// # Errors
    ///
    /// Returns [`CreditError`] if any batch or scenario parameter is invalid.
    pub fn run(&self) -> Result<CreditReport, CreditError> {
        let scenario = Scenario::try_from(self.scenario)?;
        let batches = self
            .batches
            .iter()
            .enumerate()
            .map(|(index, input)| input.to_batch(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CreditModel::new(scenario, self.price).report(&batches))
    }
}
