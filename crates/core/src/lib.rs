//! Core traits and types shared by the vermicomposting credit crates.
//!
//! - [`constraint`]: numeric invariants checked once at construction
//! - [`Model`]: a deterministic callable from a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call

pub mod constraint;
mod model;

pub use model::{Model, Snapshot};

/// A dimensionless fraction constrained to the closed unit interval `[0, 1]`.
pub type Fraction = constraint::Constrained<f64, constraint::UnitInterval>;
