use serde::{Deserialize, Serialize};
use uom::si::f64::Mass;

use crate::{
    CompostingParams, CreditingHorizon, EmissionResult, GwpTable, LandfillParams, ParameterError,
    composting::CompostingModel,
    credit::avoided_emissions,
    gwp::GwpConfig,
    landfill::{HorizonConfig, LandfillModel},
    params::{CompostingConfig, LandfillConfig},
};

/// Validated parameters for both models, with the GWP table and horizon they
/// share.
///
/// A scenario is an immutable value passed explicitly into every calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    landfill: LandfillModel,
    composting: CompostingModel,
    horizon: CreditingHorizon,
}

impl Scenario {
    #[must_use]
    pub fn new(
        landfill: LandfillParams,
        composting: CompostingParams,
        gwp: GwpTable,
        horizon: CreditingHorizon,
    ) -> Self {
        Self {
            landfill: LandfillModel::new(landfill, &horizon, gwp),
            composting: CompostingModel::new(composting, gwp),
            horizon,
        }
    }

    #[must_use]
    pub fn landfill_model(&self) -> &LandfillModel {
        &self.landfill
    }

    #[must_use]
    pub fn composting_model(&self) -> &CompostingModel {
        &self.composting
    }

    #[must_use]
    pub fn gwp(&self) -> &GwpTable {
        self.landfill.gwp()
    }

    #[must_use]
    pub fn horizon(&self) -> &CreditingHorizon {
        &self.horizon
    }

    /// Evaluates both models for `mass` and the avoided emissions between them.
    #[must_use]
    pub fn evaluate(&self, mass: Mass) -> BatchEvaluation {
        let landfill = self.landfill.emissions(mass);
        let composting = self.composting.emissions(mass);
        BatchEvaluation {
            mass,
            landfill,
            composting,
            avoided_tco2eq: avoided_emissions(&landfill, &composting),
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new(
            LandfillParams::default(),
            CompostingParams::default(),
            GwpTable::default(),
            CreditingHorizon::default(),
        )
    }
}

/// Both model outputs for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchEvaluation {
    pub mass: Mass,
    pub landfill: EmissionResult,
    pub composting: EmissionResult,
    pub avoided_tco2eq: f64,
}

/// Unvalidated scenario, as read from configuration.
///
/// Every section is optional and falls back to the reference defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub landfill: LandfillConfig,
    pub composting: CompostingConfig,
    pub gwp: GwpConfig,
    pub horizon: HorizonConfig,
}

impl TryFrom<ScenarioConfig> for Scenario {
    type Error = ParameterError;

    fn try_from(config: ScenarioConfig) -> Result<Self, Self::Error> {
        Ok(Scenario::new(
            config.landfill.try_into()?,
            config.composting.try_into()?,
            config.gwp.into(),
            config.horizon.try_into()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::mass::{kilogram, ton};

    #[test]
    fn default_config_builds_default_scenario() {
        let from_config = Scenario::try_from(ScenarioConfig::default()).unwrap();
        let reference = Scenario::default();
        assert_eq!(from_config.horizon(), reference.horizon());
        assert_eq!(from_config.gwp(), reference.gwp());

        let mass = Mass::new::<kilogram>(50.0);
        assert_relative_eq!(
            from_config.evaluate(mass).avoided_tco2eq,
            reference.evaluate(mass).avoided_tco2eq,
            epsilon = 1e-12
        );
    }

    #[test]
    fn evaluation_is_the_difference_of_both_models() {
        let scenario = Scenario::default();
        let eval = scenario.evaluate(Mass::new::<kilogram>(50.0));

        let expected = (eval.landfill.co2eq - eval.composting.co2eq).get::<ton>();
        assert_relative_eq!(eval.avoided_tco2eq, expected, epsilon = 1e-15);
        assert!(eval.avoided_tco2eq > 0.0);
    }

    #[test]
    fn zero_mass_avoids_nothing() {
        let eval = Scenario::default().evaluate(Mass::new::<kilogram>(0.0));
        assert_eq!(eval.landfill, EmissionResult::zero());
        assert_eq!(eval.composting, EmissionResult::zero());
        assert_eq!(eval.avoided_tco2eq, 0.0);
    }

    #[test]
    fn invalid_section_is_reported() {
        let mut config = ScenarioConfig::default();
        config.composting.toc = 2.0;
        assert!(matches!(
            Scenario::try_from(config),
            Err(ParameterError::InvalidParameter { name: "toc", .. })
        ));
    }
}
