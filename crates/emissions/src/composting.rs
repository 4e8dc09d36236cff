//! Vermicomposting project model.
//!
//! All emissions happen within a single composting cycle (about 50 days),
//! which is short next to landfill decay, so nothing is spread over the
//! crediting horizon.

use std::convert::Infallible;

use uom::{
    ConstZero,
    si::{f64::Mass, mass::kilogram},
};
use vermi_core::Model;

use crate::{
    CompostingParams, EmissionResult, GwpTable,
    constants::{CH4_PER_CARBON, N2O_PER_NITROGEN},
};

/// CH₄ and N₂O released while vermicomposting `mass` of fresh waste.
///
/// ```text
/// CH₄ = m · TOC · CH₄-C fraction · 16/12 · (1 − moisture)
/// N₂O = m · TN · N₂O-N fraction · 44/28 · (1 − moisture)
/// ```
///
/// Non-positive masses yield a zero result.
#[must_use]
pub fn composting_emissions(mass: Mass, params: &CompostingParams, gwp: &GwpTable) -> EmissionResult {
    if mass.get::<kilogram>().is_nan() || mass <= Mass::ZERO {
        return EmissionResult::zero();
    }

    let dry_solids = params.moisture().complement().get();
    let ch4 = mass * (params.toc().get() * params.ch4_carbon().get() * CH4_PER_CARBON * dry_solids);
    let n2o = mass * (params.tn().get() * params.n2o_nitrogen().get() * N2O_PER_NITROGEN * dry_solids);

    EmissionResult::from_gases(ch4, n2o, gwp)
}

/// [`composting_emissions`] bound to a parameter set and GWP table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompostingModel {
    params: CompostingParams,
    gwp: GwpTable,
}

impl CompostingModel {
    #[must_use]
    pub fn new(params: CompostingParams, gwp: GwpTable) -> Self {
        Self { params, gwp }
    }

    #[must_use]
    pub fn params(&self) -> &CompostingParams {
        &self.params
    }

    #[must_use]
    pub fn emissions(&self, mass: Mass) -> EmissionResult {
        composting_emissions(mass, &self.params, &self.gwp)
    }
}

impl Model for CompostingModel {
    type Input = Mass;
    type Output = EmissionResult;
    type Error = Infallible;

    fn call(&self, input: &Mass) -> Result<EmissionResult, Infallible> {
        Ok(self.emissions(*input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::params::CompostingConfig;

    fn kg(value: f64) -> Mass {
        Mass::new::<kilogram>(value)
    }

    #[test]
    fn default_parameters_match_hand_calculation() {
        let result = composting_emissions(kg(50.0), &CompostingParams::default(), &GwpTable::AR6_GWP20);

        let dry = 1.0 - 0.85;
        let ch4 = 50.0 * 0.436 * 0.0013 * (16.0 / 12.0) * dry;
        let n2o = 50.0 * 0.0142 * 0.0092 * (44.0 / 28.0) * dry;

        assert_relative_eq!(result.ch4.get::<kilogram>(), ch4, epsilon = 1e-12);
        assert_relative_eq!(result.n2o.get::<kilogram>(), n2o, epsilon = 1e-12);
        assert_relative_eq!(
            result.co2eq.get::<kilogram>(),
            ch4 * 79.7 + n2o * 273.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn zero_mass_yields_zero() {
        let model = CompostingModel::new(CompostingParams::default(), GwpTable::default());
        assert_eq!(model.call(&kg(0.0)).unwrap(), EmissionResult::zero());
    }

    #[test]
    fn saturated_waste_emits_nothing() {
        let params = CompostingParams::try_from(CompostingConfig {
            moisture: 1.0,
            ..CompostingConfig::default()
        })
        .unwrap();
        let result = composting_emissions(kg(50.0), &params, &GwpTable::default());
        assert_eq!(result.co2eq.get::<kilogram>(), 0.0);
    }

    #[test]
    fn co2eq_increases_with_mass() {
        let model = CompostingModel::new(CompostingParams::default(), GwpTable::default());
        let masses = [0.0, 0.5, 5.0, 50.0, 500.0];
        let results: Vec<_> = masses.iter().map(|&m| model.emissions(kg(m)).co2eq).collect();
        assert!(results.windows(2).all(|pair| pair[1] > pair[0]));
    }
}
