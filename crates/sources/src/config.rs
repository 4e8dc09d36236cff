//! Application configuration read from TOML.
//!
//! Every section and key is optional:
//!
//! ```toml
//! [scenario.landfill]
//! temperature_c = 27.0
//!
//! [scenario.horizon]
//! years = 10
//!
//! [price]
//! fallback_price_per_tonne = 85.50
//! max_age = "PT1H"
//!
//! [data]
//! path = "records.json"
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::SignedDuration;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vermi_emissions::{
    ParameterError, Scenario, ScenarioConfig,
    constants::{DEFAULT_CAPACITY_L, DEFAULT_DENSITY_KG_PER_L},
};

use crate::{
    DataSource, ExampleSource, JsonFileSource,
    price::{Currency, FALLBACK_EXCHANGE_RATE, FALLBACK_PRICE_PER_TONNE, PriceFallback},
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("invalid price setting `{name}`: {value}")]
    InvalidPrice { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub scenario: ScenarioConfig,
    pub price: PriceConfig,
    pub data: DataConfig,
}

impl AppConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed or has
    /// unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is malformed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validates the scenario section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parameter`] if any value violates its
    /// constraint.
    pub fn scenario(&self) -> Result<Scenario, ConfigError> {
        Ok(Scenario::try_from(self.scenario)?)
    }

    /// The configured record file, or the bundled example data.
    #[must_use]
    pub fn data_source(&self) -> Box<dyn DataSource> {
        match &self.data.path {
            Some(path) => Box::new(JsonFileSource::new(path)),
            None => Box::new(ExampleSource),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    pub fallback_price_per_tonne: f64,
    pub currency: Currency,
    pub fallback_exchange_rate: f64,
    pub reporting_currency: Currency,
    /// How long a fetched price stays fresh.
    pub max_age: SignedDuration,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            fallback_price_per_tonne: FALLBACK_PRICE_PER_TONNE,
            currency: Currency::Eur,
            fallback_exchange_rate: FALLBACK_EXCHANGE_RATE,
            reporting_currency: Currency::Brl,
            max_age: SignedDuration::from_hours(1),
        }
    }
}

impl PriceConfig {
    /// Validates the fallback price and rate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPrice`] if either value is non-finite
    /// or not strictly positive.
    pub fn fallback(&self) -> Result<PriceFallback, ConfigError> {
        let positive = |name, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(ConfigError::InvalidPrice { name, value })
            }
        };

        Ok(PriceFallback {
            price_per_tonne: positive("fallback_price_per_tonne", self.fallback_price_per_tonne)?,
            currency: self.currency,
            exchange_rate: positive("fallback_exchange_rate", self.fallback_exchange_rate)?,
            reporting_currency: self.reporting_currency,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// JSON record file. The bundled example data is used when unset.
    pub path: Option<PathBuf>,
    pub density_kg_per_l: f64,
    /// Capacity assumed for reactors with neither a capacity nor dimensions.
    pub fallback_capacity_liters: f64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            density_kg_per_l: DEFAULT_DENSITY_KG_PER_L,
            fallback_capacity_liters: DEFAULT_CAPACITY_L,
        }
    }
}
