//! Seeded Monte Carlo spread of avoided emissions.
//!
//! Each draw perturbs the scenario's parameters uniformly within relative
//! bounds, rebuilds the scenario, and evaluates a single mass. Results are
//! reproducible for a given seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uom::si::f64::Mass;
use vermi_core::Snapshot;

use crate::{
    CompostingParams, LandfillParams, ParameterError, Scenario,
    params::{CompostingConfig, LandfillConfig, fraction, non_negative},
};

/// Relative half-widths of the uniform perturbation applied to each
/// parameter, as fractions of its configured value.
///
/// Temperature is perturbed by an absolute amount in °C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UncertaintyRanges {
    pub doc: f64,
    pub methane_fraction: f64,
    pub oxidation: f64,
    pub temperature_c: f64,
    /// Applied to the moisture content on both sides.
    pub moisture: f64,
    pub toc: f64,
    pub tn: f64,
    pub ch4_carbon: f64,
    pub n2o_nitrogen: f64,
}

impl Default for UncertaintyRanges {
    fn default() -> Self {
        Self {
            doc: 0.2,
            methane_fraction: 0.1,
            oxidation: 0.5,
            temperature_c: 5.0,
            moisture: 0.05,
            toc: 0.1,
            tn: 0.1,
            ch4_carbon: 0.5,
            n2o_nitrogen: 0.5,
        }
    }
}

impl UncertaintyRanges {
    fn validate(&self) -> Result<(), ParameterError> {
        for (name, value) in [
            ("doc", self.doc),
            ("methane_fraction", self.methane_fraction),
            ("oxidation", self.oxidation),
            ("moisture", self.moisture),
            ("toc", self.toc),
            ("tn", self.tn),
            ("ch4_carbon", self.ch4_carbon),
            ("n2o_nitrogen", self.n2o_nitrogen),
        ] {
            fraction(name, value)?;
        }
        non_negative("temperature_c", self.temperature_c)?;
        Ok(())
    }
}

/// The perturbed parameters of one draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Draw {
    pub landfill: LandfillConfig,
    pub composting: CompostingConfig,
}

/// Summary statistics of avoided emissions over all draws [tCO₂eq].
#[derive(Debug, Clone, PartialEq)]
pub struct UncertaintyReport {
    pub mean: f64,
    pub std_dev: f64,
    pub p5: f64,
    pub p50: f64,
    pub p95: f64,
    /// Every draw with its avoided emissions, in draw order.
    pub samples: Vec<Snapshot<Draw, f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UncertaintyError {
    #[error("at least one iteration is required")]
    NoIterations,

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

/// Runs `iterations` seeded draws around `scenario` for one batch mass.
///
/// # Errors
///
/// Returns [`UncertaintyError::NoIterations`] if `iterations` is zero, or
/// [`UncertaintyError::Parameter`] if a range is not a valid fraction.
pub fn monte_carlo(
    mass: Mass,
    scenario: &Scenario,
    ranges: &UncertaintyRanges,
    iterations: usize,
    seed: u64,
) -> Result<UncertaintyReport, UncertaintyError> {
    if iterations == 0 {
        return Err(UncertaintyError::NoIterations);
    }
    ranges.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base_landfill = LandfillConfig::from(scenario.landfill_model().params());
    let base_composting = CompostingConfig::from(scenario.composting_model().params());

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let draw = Draw {
            landfill: perturb_landfill(&mut rng, base_landfill, ranges),
            composting: perturb_composting(&mut rng, base_composting, ranges),
        };
        let drawn = Scenario::new(
            LandfillParams::try_from(draw.landfill)?,
            CompostingParams::try_from(draw.composting)?,
            *scenario.gwp(),
            *scenario.horizon(),
        );
        samples.push(Snapshot::new(draw, drawn.evaluate(mass).avoided_tco2eq));
    }

    let mut sorted: Vec<f64> = samples.iter().map(|s| s.output).collect();
    sorted.sort_by(f64::total_cmp);

    #[allow(clippy::cast_precision_loss)]
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std_dev = if sorted.len() > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    let report = UncertaintyReport {
        mean,
        std_dev,
        p5: percentile(&sorted, 0.05),
        p50: percentile(&sorted, 0.50),
        p95: percentile(&sorted, 0.95),
        samples,
    };
    debug!(
        iterations,
        seed,
        mean = report.mean,
        std_dev = report.std_dev,
        "monte carlo complete"
    );
    Ok(report)
}

fn perturb_landfill(rng: &mut ChaCha8Rng, base: LandfillConfig, ranges: &UncertaintyRanges) -> LandfillConfig {
    LandfillConfig {
        doc: scale_fraction(rng, base.doc, ranges.doc),
        methane_fraction: scale_fraction(rng, base.methane_fraction, ranges.methane_fraction),
        oxidation: scale_fraction(rng, base.oxidation, ranges.oxidation),
        moisture: scale_fraction(rng, base.moisture, ranges.moisture),
        temperature_c: base.temperature_c + rng.gen_range(-ranges.temperature_c..=ranges.temperature_c),
        ..base
    }
}

fn perturb_composting(
    rng: &mut ChaCha8Rng,
    base: CompostingConfig,
    ranges: &UncertaintyRanges,
) -> CompostingConfig {
    CompostingConfig {
        toc: scale_fraction(rng, base.toc, ranges.toc),
        tn: scale_fraction(rng, base.tn, ranges.tn),
        ch4_carbon: scale_fraction(rng, base.ch4_carbon, ranges.ch4_carbon),
        n2o_nitrogen: scale_fraction(rng, base.n2o_nitrogen, ranges.n2o_nitrogen),
        moisture: scale_fraction(rng, base.moisture, ranges.moisture),
        ..base
    }
}

/// Draws uniformly in `value × [1 − spread, 1 + spread]`, kept within [0, 1].
fn scale_fraction(rng: &mut ChaCha8Rng, value: f64, spread: f64) -> f64 {
    let factor = rng.gen_range((1.0 - spread)..=(1.0 + spread));
    (value * factor).clamp(0.0, 1.0)
}

/// Linearly interpolated percentile of already sorted, non-empty values.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let rank = p * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = rank - rank.floor();
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
