//! Validated parameter sets for the landfill and composting models.
//!
//! Each parameter set has a matching `*Config` type holding plain numbers
//! with the reference defaults. Configs deserialize from any `serde` format
//! and are checked once, when converted with `TryFrom`; the resulting
//! parameter sets are immutable.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Mass, ThermodynamicTemperature},
    mass::kilogram,
    thermodynamic_temperature::degree_celsius,
};
use vermi_core::{
    Fraction,
    constraint::{ConstraintError, NonNegative, UnitInterval},
};

use crate::constants::{
    COVERED_N2O_FACTOR, EXPOSED_HOURS, EXPOSED_MASS_LIMIT_KG, HOURS_PER_DAY, OPEN_N2O_FACTOR,
};

/// A configured value violates its constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParameterError {
    #[error("invalid parameter `{name}`: {source}")]
    InvalidParameter {
        name: &'static str,
        source: ConstraintError,
    },
}

pub(crate) fn fraction(name: &'static str, value: f64) -> Result<Fraction, ParameterError> {
    UnitInterval::new(value).map_err(|source| ParameterError::InvalidParameter { name, source })
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, ParameterError> {
    finite(name, value)?;
    NonNegative::new(value)
        .map(|v| v.into_inner())
        .map_err(|source| ParameterError::InvalidParameter { name, source })
}

fn finite(name: &'static str, value: f64) -> Result<f64, ParameterError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParameterError::InvalidParameter {
            name,
            source: ConstraintError::NotANumber,
        })
    }
}

/// Landfill-side constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandfillParams {
    temperature: ThermodynamicTemperature,
    doc: Fraction,
    mcf: Fraction,
    methane_fraction: Fraction,
    oxidation: Fraction,
    recovered: Fraction,
    moisture: Fraction,
    daily_exposure: Fraction,
    exposed_mass_limit: Mass,
    open_factor: f64,
    covered_factor: f64,
}

impl LandfillParams {
    /// Mean landfill temperature.
    #[must_use]
    pub fn temperature(&self) -> ThermodynamicTemperature {
        self.temperature
    }

    /// Degradable organic carbon fraction of the waste (DOC).
    #[must_use]
    pub fn doc(&self) -> Fraction {
        self.doc
    }

    /// Methane correction factor (MCF).
    #[must_use]
    pub fn mcf(&self) -> Fraction {
        self.mcf
    }

    /// Fraction of CH₄ in landfill gas (F).
    #[must_use]
    pub fn methane_fraction(&self) -> Fraction {
        self.methane_fraction
    }

    /// Fraction of CH₄ oxidized in the cover layer (OX).
    #[must_use]
    pub fn oxidation(&self) -> Fraction {
        self.oxidation
    }

    /// Fraction of CH₄ recovered by gas capture (Ri).
    #[must_use]
    pub fn recovered(&self) -> Fraction {
        self.recovered
    }

    #[must_use]
    pub fn moisture(&self) -> Fraction {
        self.moisture
    }

    /// Share of each day the fresh waste stays uncovered.
    #[must_use]
    pub fn daily_exposure(&self) -> Fraction {
        self.daily_exposure
    }

    /// Mass beyond which added waste no longer counts as exposed.
    #[must_use]
    pub fn exposed_mass_limit(&self) -> Mass {
        self.exposed_mass_limit
    }

    /// N₂O-N factor for exposed waste [g/t].
    #[must_use]
    pub fn open_factor(&self) -> f64 {
        self.open_factor
    }

    /// N₂O-N factor for covered waste [g/t].
    #[must_use]
    pub fn covered_factor(&self) -> f64 {
        self.covered_factor
    }
}

impl Default for LandfillParams {
    fn default() -> Self {
        Self {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(25.0),
            doc: Fraction::from_const(0.15),
            mcf: Fraction::from_const(1.0),
            methane_fraction: Fraction::from_const(0.5),
            oxidation: Fraction::from_const(0.1),
            recovered: Fraction::from_const(0.0),
            moisture: Fraction::from_const(0.85),
            daily_exposure: Fraction::from_const(EXPOSED_HOURS / HOURS_PER_DAY),
            exposed_mass_limit: Mass::new::<kilogram>(EXPOSED_MASS_LIMIT_KG),
            open_factor: OPEN_N2O_FACTOR,
            covered_factor: COVERED_N2O_FACTOR,
        }
    }
}

/// Unvalidated landfill constants, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LandfillConfig {
    pub temperature_c: f64,
    pub doc: f64,
    pub mcf: f64,
    pub methane_fraction: f64,
    pub oxidation: f64,
    pub recovered: f64,
    pub moisture: f64,
    pub exposed_hours: f64,
    pub exposed_mass_limit_kg: f64,
    pub open_factor: f64,
    pub covered_factor: f64,
}

impl Default for LandfillConfig {
    fn default() -> Self {
        Self::from(&LandfillParams::default())
    }
}

impl From<&LandfillParams> for LandfillConfig {
    fn from(params: &LandfillParams) -> Self {
        Self {
            temperature_c: params.temperature.get::<degree_celsius>(),
            doc: params.doc.get(),
            mcf: params.mcf.get(),
            methane_fraction: params.methane_fraction.get(),
            oxidation: params.oxidation.get(),
            recovered: params.recovered.get(),
            moisture: params.moisture.get(),
            exposed_hours: params.daily_exposure.get() * HOURS_PER_DAY,
            exposed_mass_limit_kg: params.exposed_mass_limit.get::<kilogram>(),
            open_factor: params.open_factor,
            covered_factor: params.covered_factor,
        }
    }
}

impl TryFrom<LandfillConfig> for LandfillParams {
    type Error = ParameterError;

    fn try_from(config: LandfillConfig) -> Result<Self, Self::Error> {
        let temperature_c = finite("temperature_c", config.temperature_c)?;
        Ok(Self {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(temperature_c),
            doc: fraction("doc", config.doc)?,
            mcf: fraction("mcf", config.mcf)?,
            methane_fraction: fraction("methane_fraction", config.methane_fraction)?,
            oxidation: fraction("oxidation", config.oxidation)?,
            recovered: fraction("recovered", config.recovered)?,
            moisture: fraction("moisture", config.moisture)?,
            daily_exposure: fraction("exposed_hours", config.exposed_hours / HOURS_PER_DAY)?,
            exposed_mass_limit: Mass::new::<kilogram>(non_negative(
                "exposed_mass_limit_kg",
                config.exposed_mass_limit_kg,
            )?),
            open_factor: non_negative("open_factor", config.open_factor)?,
            covered_factor: non_negative("covered_factor", config.covered_factor)?,
        })
    }
}

/// Vermicomposting-side constants.
///
/// Defaults are the measured values for school-scale vermicomposting of
/// kitchen scraps (Yang et al., 2017).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompostingParams {
    toc: Fraction,
    tn: Fraction,
    ch4_carbon: Fraction,
    n2o_nitrogen: Fraction,
    moisture: Fraction,
}

impl CompostingParams {
    /// Total organic carbon fraction of dry solids (TOC).
    #[must_use]
    pub fn toc(&self) -> Fraction {
        self.toc
    }

    /// Total nitrogen fraction of dry solids (TN).
    #[must_use]
    pub fn tn(&self) -> Fraction {
        self.tn
    }

    /// Fraction of the organic carbon emitted as CH₄-C.
    #[must_use]
    pub fn ch4_carbon(&self) -> Fraction {
        self.ch4_carbon
    }

    /// Fraction of the nitrogen emitted as N₂O-N.
    #[must_use]
    pub fn n2o_nitrogen(&self) -> Fraction {
        self.n2o_nitrogen
    }

    #[must_use]
    pub fn moisture(&self) -> Fraction {
        self.moisture
    }
}

impl Default for CompostingParams {
    fn default() -> Self {
        Self {
            toc: Fraction::from_const(0.436),
            tn: Fraction::from_const(0.0142),
            ch4_carbon: Fraction::from_const(0.0013),
            n2o_nitrogen: Fraction::from_const(0.0092),
            moisture: Fraction::from_const(0.85),
        }
    }
}

/// Unvalidated composting constants, as read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompostingConfig {
    pub toc: f64,
    pub tn: f64,
    pub ch4_carbon: f64,
    pub n2o_nitrogen: f64,
    pub moisture: f64,
}

impl Default for CompostingConfig {
    fn default() -> Self {
        Self::from(&CompostingParams::default())
    }
}

impl From<&CompostingParams> for CompostingConfig {
    fn from(params: &CompostingParams) -> Self {
        Self {
            toc: params.toc.get(),
            tn: params.tn.get(),
            ch4_carbon: params.ch4_carbon.get(),
            n2o_nitrogen: params.n2o_nitrogen.get(),
            moisture: params.moisture.get(),
        }
    }
}

impl TryFrom<CompostingConfig> for CompostingParams {
    type Error = ParameterError;

    fn try_from(config: CompostingConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            toc: fraction("toc", config.toc)?,
            tn: fraction("tn", config.tn)?,
            ch4_carbon: fraction("ch4_carbon", config.ch4_carbon)?,
            n2o_nitrogen: fraction("n2o_nitrogen", config.n2o_nitrogen)?,
            moisture: fraction("moisture", config.moisture)?,
        })
    }
}
