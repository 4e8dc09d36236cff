//! Global warming potential tables.

use serde::{Deserialize, Serialize};
use uom::si::f64::Mass;

/// IPCC assessment report a set of GWP values is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentReport {
    Ar5,
    Ar6,
}

/// Integration horizon of a GWP value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GwpHorizon {
    #[serde(rename = "20")]
    Years20,
    #[serde(rename = "100")]
    Years100,
}

/// CO₂-equivalence multipliers for CH₄ and N₂O.
///
/// Tables are immutable and identified by the report and horizon they come
/// from. Use [`GwpTable::lookup`] or one of the associated constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GwpTable {
    report: AssessmentReport,
    horizon: GwpHorizon,
    ch4: f64,
    n2o: f64,
}

impl GwpTable {
    pub const AR6_GWP20: Self = Self::define(AssessmentReport::Ar6, GwpHorizon::Years20, 79.7, 273.0);
    pub const AR6_GWP100: Self = Self::define(AssessmentReport::Ar6, GwpHorizon::Years100, 27.9, 273.0);
    pub const AR5_GWP20: Self = Self::define(AssessmentReport::Ar5, GwpHorizon::Years20, 84.0, 264.0);
    pub const AR5_GWP100: Self = Self::define(AssessmentReport::Ar5, GwpHorizon::Years100, 28.0, 265.0);

    const fn define(report: AssessmentReport, horizon: GwpHorizon, ch4: f64, n2o: f64) -> Self {
        Self {
            report,
            horizon,
            ch4,
            n2o,
        }
    }

    /// Returns the published table for a report and horizon.
    #[must_use]
    pub fn lookup(report: AssessmentReport, horizon: GwpHorizon) -> Self {
        match (report, horizon) {
            (AssessmentReport::Ar6, GwpHorizon::Years20) => Self::AR6_GWP20,
            (AssessmentReport::Ar6, GwpHorizon::Years100) => Self::AR6_GWP100,
            (AssessmentReport::Ar5, GwpHorizon::Years20) => Self::AR5_GWP20,
            (AssessmentReport::Ar5, GwpHorizon::Years100) => Self::AR5_GWP100,
        }
    }

    #[must_use]
    pub fn report(&self) -> AssessmentReport {
        self.report
    }

    #[must_use]
    pub fn horizon(&self) -> GwpHorizon {
        self.horizon
    }

    /// CH₄ multiplier [kg CO₂eq / kg CH₄].
    #[must_use]
    pub fn ch4(&self) -> f64 {
        self.ch4
    }

    /// N₂O multiplier [kg CO₂eq / kg N₂O].
    #[must_use]
    pub fn n2o(&self) -> f64 {
        self.n2o
    }

    /// Weights gas masses into a single CO₂-equivalent mass.
    #[must_use]
    pub fn co2eq(&self, ch4: Mass, n2o: Mass) -> Mass {
        ch4 * self.ch4 + n2o * self.n2o
    }
}

/// The 20-year AR6 table, matching the short crediting horizons of school programs.
impl Default for GwpTable {
    fn default() -> Self {
        Self::AR6_GWP20
    }
}

/// Selects a published table in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GwpConfig {
    pub report: AssessmentReport,
    pub horizon: GwpHorizon,
}

impl Default for GwpConfig {
    fn default() -> Self {
        Self {
            report: AssessmentReport::Ar6,
            horizon: GwpHorizon::Years20,
        }
    }
}

impl From<GwpConfig> for GwpTable {
    fn from(config: GwpConfig) -> Self {
        GwpTable::lookup(config.report, config.horizon)
    }
}

impl From<&GwpTable> for GwpConfig {
    fn from(table: &GwpTable) -> Self {
        Self {
            report: table.report,
            horizon: table.horizon,
        }
    }
}
