//! Waste mass estimation.
//!
//! A reactor's waste mass is its capacity times the bulk density of the
//! material it holds. Capacity is either stated directly or derived from the
//! container's inner dimensions.

use jiff::civil::Date;
use thiserror::Error;
use uom::si::{
    f64::{Length, Mass, MassDensity, Volume},
    length::centimeter,
    mass_density::gram_per_cubic_centimeter,
    volume::liter,
};
use vermi_core::constraint::{NonNegative, StrictlyPositive};

/// Errors raised at the mass-estimation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum DimensionError {
    /// A geometry, volume, or density input is negative, non-finite, or (for
    /// container edges) zero.
    #[error("invalid dimension `{name}`: {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

/// How a container's capacity is recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capacity {
    /// Stated capacity.
    Volume(Volume),
    /// Inner height, width, and length of a box-shaped container.
    Dimensions {
        height: Length,
        width: Length,
        length: Length,
    },
}

impl Capacity {
    /// Resolves the capacity to a volume.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError::InvalidDimension`] if a stated volume is
    /// negative or non-finite, or if any edge is not strictly positive.
    pub fn volume(&self) -> Result<Volume, DimensionError> {
        match *self {
            Capacity::Volume(volume) => check_volume(volume),
            Capacity::Dimensions {
                height,
                width,
                length,
            } => volume_from_dimensions(height, width, length),
        }
    }
}

/// Computes `height × width × length`.
///
/// With edges in centimeters this is the familiar `h·w·l / 1000` liters.
///
/// # Errors
///
/// Returns [`DimensionError::InvalidDimension`] if any edge is zero,
/// negative, or non-finite.
pub fn volume_from_dimensions(
    height: Length,
    width: Length,
    length: Length,
) -> Result<Volume, DimensionError> {
    for (name, edge) in [("height", height), ("width", width), ("length", length)] {
        let cm = edge.get::<centimeter>();
        if !cm.is_finite() || StrictlyPositive::new(cm).is_err() {
            return Err(DimensionError::InvalidDimension { name, value: cm });
        }
    }
    Ok(height * width * length)
}

/// Computes the waste mass held by `volume` at `density`.
///
/// A zero volume is an empty container and yields zero mass.
///
/// # Errors
///
/// Returns [`DimensionError::InvalidDimension`] if either input is negative
/// or non-finite.
pub fn estimate_mass(volume: Volume, density: MassDensity) -> Result<Mass, DimensionError> {
    let volume = check_volume(volume)?;
    let density = check_density(density)?;
    Ok(volume * density)
}

fn check_volume(volume: Volume) -> Result<Volume, DimensionError> {
    let liters = volume.get::<liter>();
    if !liters.is_finite() || NonNegative::new(liters).is_err() {
        return Err(DimensionError::InvalidDimension {
            name: "volume",
            value: liters,
        });
    }
    Ok(volume)
}

fn check_density(density: MassDensity) -> Result<MassDensity, DimensionError> {
    // 1 g/cm³ is 1 kg/L.
    let kg_per_l = density.get::<gram_per_cubic_centimeter>();
    if !kg_per_l.is_finite() || NonNegative::new(kg_per_l).is_err() {
        return Err(DimensionError::InvalidDimension {
            name: "density",
            value: kg_per_l,
        });
    }
    Ok(density)
}

/// One container of organic waste.
///
/// Created fresh for each calculation and never mutated afterward.
/// A batch only counts toward credits once it has a fill date.
#[derive(Debug, Clone, PartialEq)]
pub struct WasteBatch {
    volume: Volume,
    density: MassDensity,
    filled_on: Option<Date>,
    school_id: Option<String>,
}

impl WasteBatch {
    /// Creates an unfilled batch from a validated capacity and density.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the capacity or density is invalid.
    pub fn new(capacity: Capacity, density: MassDensity) -> Result<Self, DimensionError> {
        let volume = capacity.volume()?;
        let density = check_density(density)?;
        Ok(Self {
            volume,
            density,
            filled_on: None,
            school_id: None,
        })
    }

    /// Records the date the container became full.
    #[must_use]
    pub fn filled_on(mut self, date: Date) -> Self {
        self.filled_on = Some(date);
        self
    }

    /// Associates the batch with a school.
    #[must_use]
    pub fn at_school(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }

    #[must_use]
    pub fn volume(&self) -> Volume {
        self.volume
    }

    #[must_use]
    pub fn density(&self) -> MassDensity {
        self.density
    }

    /// Waste mass, `volume × density`.
    #[must_use]
    pub fn mass(&self) -> Mass {
        self.volume * self.density
    }

    #[must_use]
    pub fn fill_date(&self) -> Option<Date> {
        self.filled_on
    }

    #[must_use]
    pub fn school_id(&self) -> Option<&str> {
        self.school_id.as_deref()
    }

    /// Whether the container reached its full state.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled_on.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use jiff::civil::date;
    use uom::si::mass::kilogram;

    fn cm(value: f64) -> Length {
        Length::new::<centimeter>(value)
    }

    fn kg_per_l(value: f64) -> MassDensity {
        MassDensity::new::<gram_per_cubic_centimeter>(value)
    }

    #[test]
    fn hundred_liters_at_half_density_is_fifty_kilograms() {
        let mass = estimate_mass(Volume::new::<liter>(100.0), kg_per_l(0.5)).unwrap();
        assert_relative_eq!(mass.get::<kilogram>(), 50.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_volume_is_zero_mass() {
        let mass = estimate_mass(Volume::new::<liter>(0.0), kg_per_l(0.5)).unwrap();
        assert_eq!(mass.get::<kilogram>(), 0.0);
    }

    #[test]
    fn dimensions_in_centimeters_give_liters() {
        let volume = volume_from_dimensions(cm(40.0), cm(50.0), cm(60.0)).unwrap();
        assert_relative_eq!(volume.get::<liter>(), 120.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_inputs_are_rejected() {
        assert_eq!(
            estimate_mass(Volume::new::<liter>(-1.0), kg_per_l(0.5)),
            Err(DimensionError::InvalidDimension {
                name: "volume",
                value: -1.0
            })
        );
        assert!(matches!(
            estimate_mass(Volume::new::<liter>(10.0), kg_per_l(-0.5)),
            Err(DimensionError::InvalidDimension { name: "density", .. })
        ));
        assert!(matches!(
            volume_from_dimensions(cm(40.0), cm(-50.0), cm(60.0)),
            Err(DimensionError::InvalidDimension { name: "width", .. })
        ));
    }

    #[test]
    fn zero_or_non_finite_edges_are_rejected() {
        assert!(volume_from_dimensions(cm(0.0), cm(50.0), cm(60.0)).is_err());
        assert!(volume_from_dimensions(cm(40.0), cm(50.0), cm(f64::INFINITY)).is_err());
        assert!(estimate_mass(Volume::new::<liter>(f64::NAN), kg_per_l(0.5)).is_err());
    }

    #[test]
    fn batch_tracks_fill_state() {
        let capacity = Capacity::Dimensions {
            height: cm(50.0),
            width: cm(40.0),
            length: cm(50.0),
        };
        let batch = WasteBatch::new(capacity, kg_per_l(0.6)).unwrap();
        assert!(!batch.is_full());
        assert_relative_eq!(batch.mass().get::<kilogram>(), 60.0, epsilon = 1e-9);

        let batch = batch.filled_on(date(2024, 3, 15)).at_school("E01");
        assert!(batch.is_full());
        assert_eq!(batch.fill_date(), Some(date(2024, 3, 15)));
        assert_eq!(batch.school_id(), Some("E01"));
    }
}
