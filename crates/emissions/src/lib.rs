//! Avoided-emission models for school vermicomposting programs.
//!
//! The calculation is a pipeline of pure functions:
//!
//! 1. [`mass`] turns a container's capacity or geometry into a waste mass.
//! 2. [`landfill`] estimates the CH₄ and N₂O the same waste would release if
//!    landfilled, optionally spread over a crediting horizon with a
//!    first-order decay kernel.
//! 3. [`composting`] estimates the CH₄ and N₂O released by vermicomposting it.
//! 4. [`credit`] converts the CO₂-equivalent difference into tonnes and money.
//!
//! [`Scenario`] bundles validated parameters for both models with a
//! [`GwpTable`] and a [`CreditingHorizon`], and [`aggregate`] sums the results
//! over many batches. [`pipeline::compute_credits`] runs the whole chain for a
//! list of batches. [`projection`] spreads a result over calendar years.

pub mod aggregate;
pub mod composting;
pub mod constants;
pub mod credit;
pub mod gwp;
pub mod landfill;
pub mod mass;
pub mod params;
pub mod pipeline;
pub mod projection;
mod emission;
mod scenario;

#[cfg(feature = "uncertainty")]
pub mod uncertainty;

pub use emission::EmissionResult;
pub use gwp::GwpTable;
pub use landfill::CreditingHorizon;
pub use mass::{DimensionError, WasteBatch};
pub use params::{CompostingParams, LandfillParams, ParameterError};
pub use scenario::{BatchEvaluation, Scenario, ScenarioConfig};
