//! Landfill baseline model.
//!
//! Estimates what the waste would emit if it were sent to a landfill instead
//! of a worm bin:
//!
//! - CH₄ from anaerobic decay of degradable organic carbon (IPCC Tier 1),
//!   optionally spread over a crediting horizon with a [`DecayKernel`].
//! - N₂O from the waste's exposure to air before it is covered. This release
//!   is front-loaded and is never decayed over the horizon.

mod decay;

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use uom::{
    ConstZero,
    si::{f64::Mass, mass::kilogram, thermodynamic_temperature::degree_celsius},
};
use vermi_core::{
    Model,
    constraint::{Constrained, ConstraintError, StrictlyPositive},
};

pub use decay::DecayKernel;

use crate::{
    EmissionResult, GwpTable, LandfillParams, ParameterError,
    constants::{
        CH4_PER_CARBON, DEFAULT_HORIZON_YEARS, DOCF_INTERCEPT, DOCF_SLOPE, FOOD_WASTE_DECAY_RATE,
        MAX_HORIZON_YEARS, MG_PER_KG, N2O_PER_NITROGEN, REFERENCE_MOISTURE,
    },
};

/// Period over which landfill CH₄ is credited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CreditingHorizon {
    /// Credit the full ultimate CH₄ yield.
    Undistributed,
    /// Credit only what a first-order decay releases within `years`.
    Distributed {
        years: u32,
        decay_rate: Constrained<f64, StrictlyPositive>,
    },
}

impl CreditingHorizon {
    /// Creates a distributed horizon with an annual decay rate `k`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidParameter`] if `years` exceeds
    /// [`MAX_HORIZON_YEARS`] or `decay_rate` is not strictly positive.
    pub fn distributed(years: u32, decay_rate: f64) -> Result<Self, ParameterError> {
        if years > MAX_HORIZON_YEARS {
            return Err(ParameterError::InvalidParameter {
                name: "years",
                source: ConstraintError::AboveMaximum,
            });
        }
        let decay_rate = StrictlyPositive::new(decay_rate).map_err(|source| {
            ParameterError::InvalidParameter {
                name: "decay_rate",
                source,
            }
        })?;
        Ok(Self::Distributed { years, decay_rate })
    }

    /// Builds the daily decay kernel, if the horizon is distributed.
    #[must_use]
    pub fn kernel(&self) -> Option<DecayKernel> {
        match *self {
            CreditingHorizon::Undistributed => None,
            CreditingHorizon::Distributed { years, decay_rate } => {
                Some(DecayKernel::new(decay_rate, years))
            }
        }
    }
}

/// Twenty years at the food-waste decay rate.
impl Default for CreditingHorizon {
    fn default() -> Self {
        Self::Distributed {
            years: DEFAULT_HORIZON_YEARS,
            decay_rate: Constrained::<f64, StrictlyPositive>::from_const(FOOD_WASTE_DECAY_RATE),
        }
    }
}

/// Unvalidated crediting horizon, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonConfig {
    pub distributed: bool,
    pub years: u32,
    pub decay_rate: f64,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            distributed: true,
            years: DEFAULT_HORIZON_YEARS,
            decay_rate: FOOD_WASTE_DECAY_RATE,
        }
    }
}

impl TryFrom<HorizonConfig> for CreditingHorizon {
    type Error = ParameterError;

    fn try_from(config: HorizonConfig) -> Result<Self, Self::Error> {
        if config.distributed {
            CreditingHorizon::distributed(config.years, config.decay_rate)
        } else {
            Ok(CreditingHorizon::Undistributed)
        }
    }
}

/// Fraction of degradable organic carbon that decomposes (DOCf).
///
/// `DOCf = 0.0147·T + 0.28`, with `T` in °C, kept within `[0, 1]`.
#[must_use]
pub fn decomposable_fraction(params: &LandfillParams) -> f64 {
    let t = params.temperature().get::<degree_celsius>();
    // Departs from the bare linear fit, which passes 1 near 49 °C.
    (DOCF_SLOPE * t + DOCF_INTERCEPT).clamp(0.0, 1.0)
}

/// Ultimate CH₄ yield per kilogram of landfilled waste [kg/kg].
///
/// `DOC · DOCf · MCF · F · 16/12 · (1 − Ri) · (1 − OX)`
#[must_use]
pub fn methane_potential(params: &LandfillParams) -> f64 {
    params.doc().get()
        * decomposable_fraction(params)
        * params.mcf().get()
        * params.methane_fraction().get()
        * CH4_PER_CARBON
        * params.recovered().complement().get()
        * params.oxidation().complement().get()
}

/// N₂O released by `mass` of waste before it is covered.
///
/// The exposed share of the waste is capped by the exposed-mass limit and
/// scaled by the daily exposure, then used to blend the open and covered
/// factors. Non-positive masses yield zero.
#[must_use]
pub fn nitrous_oxide(mass: Mass, params: &LandfillParams) -> Mass {
    let kg = mass.get::<kilogram>();
    if kg.is_nan() || kg <= 0.0 {
        return Mass::ZERO;
    }

    let limit = params.exposed_mass_limit().get::<kilogram>();
    let exposed = (kg.min(limit) / kg * params.daily_exposure().get()).clamp(0.0, 1.0);
    let mean_factor = exposed * params.open_factor() + (1.0 - exposed) * params.covered_factor();
    let moisture_adjust = params.moisture().complement().get() / (1.0 - REFERENCE_MOISTURE);

    Mass::new::<kilogram>(mean_factor * moisture_adjust * N2O_PER_NITROGEN / MG_PER_KG * kg)
}

/// Landfill emissions under a fixed parameter set, horizon, and GWP table.
///
/// The decay kernel is built once, so evaluating many batches against the
/// same model does not rebuild it.
#[derive(Debug, Clone, PartialEq)]
pub struct LandfillModel {
    params: LandfillParams,
    gwp: GwpTable,
    kernel: Option<DecayKernel>,
    released: f64,
}

impl LandfillModel {
    #[must_use]
    pub fn new(params: LandfillParams, horizon: &CreditingHorizon, gwp: GwpTable) -> Self {
        let kernel = horizon.kernel();
        let released = kernel.as_ref().map_or(1.0, DecayKernel::total);
        Self {
            params,
            gwp,
            kernel,
            released,
        }
    }

    #[must_use]
    pub fn params(&self) -> &LandfillParams {
        &self.params
    }

    #[must_use]
    pub fn gwp(&self) -> &GwpTable {
        &self.gwp
    }

    /// The daily decay kernel, for distributed horizons.
    #[must_use]
    pub fn kernel(&self) -> Option<&DecayKernel> {
        self.kernel.as_ref()
    }

    /// Share of the ultimate CH₄ yield credited (1 when undistributed).
    #[must_use]
    pub fn released_fraction(&self) -> f64 {
        self.released
    }

    /// Ultimate CH₄ yield of `mass`, before any horizon is applied.
    #[must_use]
    pub fn total_methane(&self, mass: Mass) -> Mass {
        if mass.get::<kilogram>().is_nan() || mass <= Mass::ZERO {
            return Mass::ZERO;
        }
        mass * methane_potential(&self.params)
    }

    /// CH₄ and N₂O credited for `mass`, weighted to CO₂eq.
    #[must_use]
    pub fn emissions(&self, mass: Mass) -> EmissionResult {
        if mass.get::<kilogram>().is_nan() || mass <= Mass::ZERO {
            return EmissionResult::zero();
        }
        let ch4 = self.total_methane(mass) * self.released;
        let n2o = nitrous_oxide(mass, &self.params);
        EmissionResult::from_gases(ch4, n2o, &self.gwp)
    }
}

impl Model for LandfillModel {
    type Input = Mass;
    type Output = EmissionResult;
    type Error = Infallible;

    fn call(&self, input: &Mass) -> Result<EmissionResult, Infallible> {
        Ok(self.emissions(*input))
    }
}

/// Landfill emissions of `mass` over `horizon`.
///
/// Prefer [`LandfillModel`] when evaluating several masses under the same
/// parameters.
#[must_use]
pub fn landfill_emissions(
    mass: Mass,
    params: &LandfillParams,
    horizon: &CreditingHorizon,
    gwp: &GwpTable,
) -> EmissionResult {
    LandfillModel::new(*params, horizon, *gwp).emissions(mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::params::LandfillConfig;

    fn kg(value: f64) -> Mass {
        Mass::new::<kilogram>(value)
    }

    #[test]
    fn reference_scenario_methane() {
        // T=25 °C, DOC=0.15, MCF=1, F=0.5, OX=0.1, Ri=0:
        // DOCf = 0.6475, potential = 0.15 × 0.6475 × 0.5 × 16/12 × 0.9 = 0.058275 kg/kg.
        let params = LandfillParams::default();
        assert_relative_eq!(decomposable_fraction(&params), 0.6475, epsilon = 1e-12);
        assert_relative_eq!(methane_potential(&params), 0.058_275, epsilon = 1e-12);

        let model = LandfillModel::new(params, &CreditingHorizon::Undistributed, GwpTable::default());
        let ch4 = model.total_methane(kg(50.0)).get::<kilogram>();
        assert_relative_eq!(ch4, 2.913_75, epsilon = 1e-9);
        assert!((ch4 - 2.915).abs() < 0.002);

        let result = model.emissions(kg(50.0));
        assert_relative_eq!(result.ch4.get::<kilogram>(), 2.913_75, epsilon = 1e-9);
    }

    #[test]
    fn hot_landfill_decomposes_at_most_all_carbon() {
        let hot = LandfillParams::try_from(LandfillConfig {
            temperature_c: 60.0,
            ..LandfillConfig::default()
        })
        .unwrap();
        assert!(DOCF_SLOPE * 60.0 + DOCF_INTERCEPT > 1.0);
        assert_eq!(decomposable_fraction(&hot), 1.0);
    }

    #[test]
    fn distributed_horizon_credits_less_than_the_ultimate_yield() {
        let params = LandfillParams::default();
        let horizon = CreditingHorizon::distributed(20, 0.06).unwrap();
        let model = LandfillModel::new(params, &horizon, GwpTable::default());

        let released = 1.0 - (-1.2_f64).exp();
        assert_relative_eq!(model.released_fraction(), released, epsilon = 1e-9);

        let result = model.emissions(kg(50.0));
        assert_relative_eq!(result.ch4.get::<kilogram>(), 2.913_75 * released, epsilon = 1e-8);
        assert!(result.ch4 < model.total_methane(kg(50.0)));
    }

    #[test]
    fn nitrous_oxide_is_not_decayed() {
        let params = LandfillParams::default();
        let short = landfill_emissions(
            kg(80.0),
            &params,
            &CreditingHorizon::distributed(1, 0.06).unwrap(),
            &GwpTable::default(),
        );
        let full = landfill_emissions(
            kg(80.0),
            &params,
            &CreditingHorizon::Undistributed,
            &GwpTable::default(),
        );
        assert_eq!(short.n2o, full.n2o);
    }

    #[test]
    fn nitrous_oxide_matches_hand_calculation() {
        // 50 kg, 8 h exposure: exposed = 1/3, mean = 1.91/3 + 2.15·2/3,
        // moisture adjust = 0.15 / 0.45.
        let params = LandfillParams::default();
        let mean = 1.91 / 3.0 + 2.15 * 2.0 / 3.0;
        let expected = mean * (0.15 / 0.45) * (44.0 / 28.0) / 1.0e6 * 50.0;
        assert_relative_eq!(
            nitrous_oxide(kg(50.0), &params).get::<kilogram>(),
            expected,
            epsilon = 1e-15
        );
    }

    #[test]
    fn exposure_share_shrinks_above_the_mass_limit() {
        let params = LandfillParams::try_from(LandfillConfig {
            exposed_hours: 24.0,
            ..LandfillConfig::default()
        })
        .unwrap();

        // Fully exposed up to the limit, so the per-kilogram factor is the open one.
        let per_kg_small = nitrous_oxide(kg(25.0), &params).get::<kilogram>() / 25.0;
        let per_kg_large = nitrous_oxide(kg(500.0), &params).get::<kilogram>() / 500.0;
        assert!(per_kg_large > per_kg_small);
    }

    #[test]
    fn zero_or_negative_mass_yields_zero() {
        let model = LandfillModel::new(
            LandfillParams::default(),
            &CreditingHorizon::default(),
            GwpTable::default(),
        );
        assert_eq!(model.emissions(kg(0.0)), EmissionResult::zero());
        assert_eq!(model.emissions(kg(-3.0)), EmissionResult::zero());
        assert_eq!(model.emissions(kg(f64::NAN)), EmissionResult::zero());
    }

    #[test]
    fn co2eq_increases_with_mass() {
        let model = LandfillModel::new(
            LandfillParams::default(),
            &CreditingHorizon::default(),
            GwpTable::default(),
        );
        let mut previous = model.call(&kg(0.0)).unwrap().co2eq;
        for m in [1.0, 10.0, 49.0, 50.0, 51.0, 200.0, 5_000.0] {
            let current = model.call(&kg(m)).unwrap().co2eq;
            assert!(current > previous, "co2eq must increase at {m} kg");
            previous = current;
        }
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let model = LandfillModel::new(
            LandfillParams::default(),
            &CreditingHorizon::default(),
            GwpTable::AR6_GWP100,
        );
        let first = model.emissions(kg(73.5));
        for _ in 0..10 {
            assert_eq!(model.emissions(kg(73.5)), first);
        }
    }

    #[test]
    fn horizon_config_selects_variant() {
        let undistributed = HorizonConfig {
            distributed: false,
            ..HorizonConfig::default()
        };
        assert_eq!(
            CreditingHorizon::try_from(undistributed),
            Ok(CreditingHorizon::Undistributed)
        );
        assert_eq!(
            CreditingHorizon::try_from(HorizonConfig::default()),
            Ok(CreditingHorizon::default())
        );

        let invalid = HorizonConfig {
            decay_rate: 0.0,
            ..HorizonConfig::default()
        };
        assert!(CreditingHorizon::try_from(invalid).is_err());

        let too_long = HorizonConfig {
            years: 2_000_000_000,
            ..HorizonConfig::default()
        };
        assert_eq!(
            CreditingHorizon::try_from(too_long),
            Err(ParameterError::InvalidParameter {
                name: "years",
                source: ConstraintError::AboveMaximum,
            })
        );
        assert!(CreditingHorizon::distributed(MAX_HORIZON_YEARS, 0.06).is_ok());
    }
}
