//! Typed school and reactor records.
//!
//! Records arrive from a [`DataSource`](crate::DataSource) and are validated
//! into [`WasteBatch`] values before any calculation sees them.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uom::si::{
    f64::{Length, MassDensity, Volume},
    length::centimeter,
    mass_density::gram_per_cubic_centimeter,
    volume::liter,
};
use vermi_emissions::{DimensionError, WasteBatch, mass::Capacity};

use crate::DataConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub established_on: Option<Date>,
}

/// Where a reactor is in its fill and harvest cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactorStatus {
    #[default]
    Active,
    Full,
    Harvested,
}

/// One vermicomposting container.
///
/// Capacity is either stated in liters or measured as inner dimensions in
/// centimeters. A stated capacity takes precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactorRecord {
    pub id: String,
    pub school_id: String,
    #[serde(default)]
    pub capacity_liters: Option<f64>,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub width_cm: Option<f64>,
    #[serde(default)]
    pub length_cm: Option<f64>,
    #[serde(default)]
    pub fill_date: Option<Date>,
    #[serde(default)]
    pub harvest_date: Option<Date>,
    #[serde(default)]
    pub status: ReactorStatus,
}

impl ReactorRecord {
    /// Returns true once the reactor has a fill date, whatever its status.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.fill_date.is_some()
    }

    /// The recorded capacity, or `fallback` when neither a capacity nor all
    /// three dimensions are present.
    #[must_use]
    pub fn capacity(&self, fallback: Volume) -> Capacity {
        match (self.capacity_liters, self.height_cm, self.width_cm, self.length_cm) {
            (Some(liters), ..) => Capacity::Volume(Volume::new::<liter>(liters)),
            (None, Some(height), Some(width), Some(length)) => Capacity::Dimensions {
                height: Length::new::<centimeter>(height),
                width: Length::new::<centimeter>(width),
                length: Length::new::<centimeter>(length),
            },
            _ => {
                warn!(
                    reactor = %self.id,
                    fallback_liters = fallback.get::<liter>(),
                    "reactor has no capacity or dimensions, using fallback"
                );
                Capacity::Volume(fallback)
            }
        }
    }

    /// Resolves the capacity to a strictly positive volume.
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError::InvalidDimension`] if the resolved volume is
    /// zero, negative, or non-finite.
    pub fn capacity_liters(&self, fallback: Volume) -> Result<Volume, DimensionError> {
        let volume = self.capacity(fallback).volume()?;
        let liters = volume.get::<liter>();
        if liters > 0.0 {
            Ok(volume)
        } else {
            Err(DimensionError::InvalidDimension {
                name: "capacity",
                value: liters,
            })
        }
    }

    /// Validates the record into a [`WasteBatch`].
    ///
    /// # Errors
    ///
    /// Returns [`DimensionError`] if the capacity or configured density is
    /// invalid.
    pub fn to_batch(&self, data: &DataConfig) -> Result<WasteBatch, DimensionError> {
        let fallback = Volume::new::<liter>(data.fallback_capacity_liters);
        let volume = self.capacity_liters(fallback)?;
        let density = MassDensity::new::<gram_per_cubic_centimeter>(data.density_kg_per_l);

        let batch = WasteBatch::new(Capacity::Volume(volume), density)?.at_school(self.school_id.clone());
        Ok(match self.fill_date {
            Some(date) => batch.filled_on(date),
            None => batch,
        })
    }
}
