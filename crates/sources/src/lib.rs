//! The collaborators around the emission models.
//!
//! - [`source`] supplies school and reactor records, falling back to a
//!   bundled reference data set.
//! - [`price`] supplies the carbon price and exchange rate, with explicit
//!   fetch results and fallback constants.
//! - [`config`] reads the application configuration from TOML.
//!
//! Records are validated here and handed to `vermi_emissions` as typed
//! [`vermi_emissions::WasteBatch`] values.

pub mod config;
pub mod price;
pub mod records;
pub mod source;

pub use config::{AppConfig, ConfigError, DataConfig, PriceConfig};
pub use price::{
    CachedPriceFeed, Currency, FixedPriceFeed, PriceFallback, PriceFeed, PriceFetchResult,
    PriceQuote, RateFetchResult, ResolvedPrice, UnavailableFeed, resolve_price,
};
pub use records::{ReactorRecord, ReactorStatus, SchoolRecord};
pub use source::{
    DataSource, ExampleSource, InMemorySource, JsonFileSource, LoadedData, Provenance,
    SourceError, load_or_example,
};
