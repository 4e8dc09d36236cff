//! Carbon-credit valuation.
//!
//! Values are never rounded here; formatting belongs to presentation.

use serde::{Deserialize, Serialize};
use uom::si::mass::ton;

use crate::EmissionResult;

/// Avoided emissions in tonnes of CO₂eq: `(landfill − composting) / 1000`.
///
/// The result is negative when composting emits more than the landfill
/// baseline. It is a modeling output and is never clamped.
#[must_use]
pub fn avoided_emissions(landfill: &EmissionResult, composting: &EmissionResult) -> f64 {
    (landfill.co2eq - composting.co2eq).get::<ton>()
}

/// Monetary value of `tco2eq` credits: `tco2eq × price × exchange_rate`.
#[must_use]
pub fn monetize_credits(tco2eq: f64, price_per_tonne: f64, exchange_rate: f64) -> f64 {
    tco2eq * price_per_tonne * exchange_rate
}

/// Price of one tonne of CO₂eq, and the rate converting its currency into
/// the reporting currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonPrice {
    pub per_tonne: f64,
    #[serde(default = "unit_rate")]
    pub exchange_rate: f64,
}

fn unit_rate() -> f64 {
    1.0
}

impl CarbonPrice {
    /// A price already in the reporting currency.
    #[must_use]
    pub fn new(per_tonne: f64) -> Self {
        Self {
            per_tonne,
            exchange_rate: 1.0,
        }
    }

    #[must_use]
    pub fn with_exchange_rate(self, exchange_rate: f64) -> Self {
        Self {
            exchange_rate,
            ..self
        }
    }

    /// Value of `tco2eq` credits in the reporting currency.
    #[must_use]
    pub fn value_of(&self, tco2eq: f64) -> f64 {
        monetize_credits(tco2eq, self.per_tonne, self.exchange_rate)
    }
}

/// Avoided emissions and their value for one calculation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditOutcome {
    pub avoided_tco2eq: f64,
    pub monetary_value: f64,
}

impl CreditOutcome {
    #[must_use]
    pub fn new(avoided_tco2eq: f64, price: &CarbonPrice) -> Self {
        Self {
            avoided_tco2eq,
            monetary_value: price.value_of(avoided_tco2eq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Mass, mass::kilogram};

    use crate::GwpTable;

    #[test]
    fn worked_example_in_reais() {
        // 0.2 t × 85.50 €/t × 5.50 R$/€
        assert_relative_eq!(monetize_credits(0.200, 85.50, 5.50), 94.05, epsilon = 1e-9);

        let price = CarbonPrice::new(85.50).with_exchange_rate(5.50);
        let outcome = CreditOutcome::new(0.200, &price);
        assert_relative_eq!(outcome.monetary_value, 94.05, epsilon = 1e-9);
    }

    #[test]
    fn avoided_emissions_are_in_tonnes() {
        let gwp = GwpTable::AR6_GWP20;
        let landfill = EmissionResult::from_gases(Mass::new::<kilogram>(10.0), Mass::new::<kilogram>(0.0), &gwp);
        let composting = EmissionResult::zero();

        assert_relative_eq!(avoided_emissions(&landfill, &composting), 0.797, epsilon = 1e-12);
    }

    #[test]
    fn negative_delta_is_kept() {
        let gwp = GwpTable::AR6_GWP20;
        let landfill = EmissionResult::from_gases(Mass::new::<kilogram>(0.1), Mass::new::<kilogram>(0.0), &gwp);
        let composting = EmissionResult::from_gases(Mass::new::<kilogram>(1.0), Mass::new::<kilogram>(0.0), &gwp);

        let avoided = avoided_emissions(&landfill, &composting);
        assert!(avoided < 0.0);

        let value = CarbonPrice::new(85.50).value_of(avoided);
        assert!(value < 0.0);
    }
}
