//! Physical constants and reference defaults.

/// Mass of CH₄ per unit mass of carbon (16/12).
pub const CH4_PER_CARBON: f64 = 16.0 / 12.0;

/// Mass of N₂O per unit mass of nitrogen (44/28).
pub const N2O_PER_NITROGEN: f64 = 44.0 / 28.0;

/// Slope of the temperature dependence of the decomposable DOC fraction [1/°C].
pub const DOCF_SLOPE: f64 = 0.0147;

/// Intercept of the decomposable DOC fraction.
pub const DOCF_INTERCEPT: f64 = 0.28;

/// Moisture content at which the landfill N₂O factors were measured.
pub const REFERENCE_MOISTURE: f64 = 0.55;

/// N₂O-N factor for waste exposed to air [g per tonne of waste].
pub const OPEN_N2O_FACTOR: f64 = 1.91;

/// N₂O-N factor for covered waste [g per tonne of waste].
pub const COVERED_N2O_FACTOR: f64 = 2.15;

/// Converts g/t (equivalently mg/kg) to kg/kg.
pub const MG_PER_KG: f64 = 1.0e6;

/// Mass above which additional waste is no longer exposed to air [kg].
pub const EXPOSED_MASS_LIMIT_KG: f64 = 50.0;

/// Daily hours the fresh waste stays exposed before covering.
pub const EXPOSED_HOURS: f64 = 8.0;

pub const HOURS_PER_DAY: f64 = 24.0;

pub const DAYS_PER_YEAR: usize = 365;

/// IPCC first-order decay rate for food waste [1/yr].
pub const FOOD_WASTE_DECAY_RATE: f64 = 0.06;

pub const DEFAULT_HORIZON_YEARS: u32 = 20;

/// Longest crediting horizon accepted [years].
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Bulk density of pre-prep kitchen scraps [kg/L].
pub const DEFAULT_DENSITY_KG_PER_L: f64 = 0.5;

/// Capacity assumed for a reactor with no recorded size [L].
pub const DEFAULT_CAPACITY_L: f64 = 100.0;

/// Duration of one vermicomposting cycle [days].
pub const COMPOSTING_CYCLE_DAYS: u32 = 50;
