//! Year-by-year breakdown of avoided emissions.
//!
//! Landfill CH₄ follows the yearly sums of the decay kernel. Landfill N₂O and
//! all composting emissions fall in the first year. Summed over the horizon,
//! the yearly values equal [`Scenario::evaluate`].

use std::collections::BTreeMap;

use jiff::ToSpan;
use serde::Serialize;
use uom::{
    ConstZero,
    si::{f64::Mass, mass::ton},
};

use crate::{
    EmissionResult, Scenario, WasteBatch, constants::COMPOSTING_CYCLE_DAYS,
    credit::avoided_emissions, landfill::nitrous_oxide,
};

/// Emissions credited in one year of the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyAvoided {
    /// One-based year within the horizon.
    pub year: u32,
    pub landfill: EmissionResult,
    pub composting: EmissionResult,
    pub avoided_tco2eq: f64,
}

/// Splits the evaluation of `mass` over the years of the scenario's horizon.
///
/// Undistributed horizons, and horizons of zero years, produce a single year.
#[must_use]
pub fn project_yearly(mass: Mass, scenario: &Scenario) -> Vec<YearlyAvoided> {
    let landfill = scenario.landfill_model();
    let gwp = scenario.gwp();

    let mut shares = landfill
        .kernel()
        .map_or_else(|| vec![1.0], |kernel| kernel.yearly());
    if shares.is_empty() {
        shares.push(0.0);
    }

    let total_ch4 = landfill.total_methane(mass);
    let first_year_n2o = nitrous_oxide(mass, landfill.params());
    let first_year_composting = scenario.composting_model().emissions(mass);

    shares
        .into_iter()
        .zip(1u32..)
        .map(|(share, year)| {
            let (landfill, composting) = if year == 1 {
                (
                    EmissionResult::from_gases(total_ch4 * share, first_year_n2o, gwp),
                    first_year_composting,
                )
            } else {
                (
                    EmissionResult::from_gases(total_ch4 * share, Mass::ZERO, gwp),
                    EmissionResult::zero(),
                )
            };
            YearlyAvoided {
                year,
                landfill,
                composting,
                avoided_tco2eq: avoided_emissions(&landfill, &composting),
            }
        })
        .collect()
}

/// Maps the projections of all full batches onto calendar years [tCO₂eq].
///
/// A batch's landfill baseline starts in the year it was filled. Its
/// composting emissions are dated to the end of the composting cycle, which
/// may fall in the following year.
#[must_use]
pub fn project_calendar(batches: &[WasteBatch], scenario: &Scenario) -> BTreeMap<i16, f64> {
    let mut by_year = BTreeMap::new();

    for batch in batches {
        let Some(filled) = batch.fill_date() else {
            continue;
        };
        let composted = filled.saturating_add(i64::from(COMPOSTING_CYCLE_DAYS).days());

        for entry in project_yearly(batch.mass(), scenario) {
            let offset = i16::try_from(entry.year - 1).unwrap_or(i16::MAX);
            let year = filled.year().saturating_add(offset);
            *by_year.entry(year).or_insert(0.0) += entry.landfill.co2eq.get::<ton>();

            if entry.year == 1 {
                *by_year.entry(composted.year()).or_insert(0.0) -= entry.composting.co2eq.get::<ton>();
            }
        }
    }

    by_year
}
