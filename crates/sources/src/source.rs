//! Where school and reactor records come from.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jiff::civil::date;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use vermi_emissions::{DimensionError, WasteBatch};

use crate::{DataConfig, ReactorRecord, ReactorStatus, SchoolRecord};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("reactor `{id}`: {source}")]
    InvalidReactor { id: String, source: DimensionError },
}

/// A supplier of school and reactor records.
pub trait DataSource {
    /// Returns every known school.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the records cannot be read.
    fn list_schools(&self) -> Result<Vec<SchoolRecord>, SourceError>;

    /// Returns every known reactor, filled or not.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the records cannot be read.
    fn list_reactors(&self) -> Result<Vec<ReactorRecord>, SourceError>;

    /// Returns schools and reactors read together.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if either list cannot be read.
    fn load(&self) -> Result<(Vec<SchoolRecord>, Vec<ReactorRecord>), SourceError> {
        Ok((self.list_schools()?, self.list_reactors()?))
    }

    /// Whether this source serves real records or reference data.
    fn provenance(&self) -> Provenance {
        Provenance::Source
    }
}

/// Records held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemorySource {
    pub schools: Vec<SchoolRecord>,
    pub reactors: Vec<ReactorRecord>,
}

impl InMemorySource {
    #[must_use]
    pub fn new(schools: Vec<SchoolRecord>, reactors: Vec<ReactorRecord>) -> Self {
        Self { schools, reactors }
    }
}

impl DataSource for InMemorySource {
    fn list_schools(&self) -> Result<Vec<SchoolRecord>, SourceError> {
        Ok(self.schools.clone())
    }

    fn list_reactors(&self) -> Result<Vec<ReactorRecord>, SourceError> {
        Ok(self.reactors.clone())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    schools: Vec<SchoolRecord>,
    #[serde(default)]
    reactors: Vec<ReactorRecord>,
}

/// A JSON document with `schools` and `reactors` arrays.
///
/// The file is read on every call. [`DataSource::load`] reads it once for
/// both lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Document, SourceError> {
        let text = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SourceError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl DataSource for JsonFileSource {
    fn list_schools(&self) -> Result<Vec<SchoolRecord>, SourceError> {
        Ok(self.read()?.schools)
    }

    fn list_reactors(&self) -> Result<Vec<ReactorRecord>, SourceError> {
        Ok(self.read()?.reactors)
    }

    fn load(&self) -> Result<(Vec<SchoolRecord>, Vec<ReactorRecord>), SourceError> {
        let Document { schools, reactors } = self.read()?;
        Ok((schools, reactors))
    }
}

/// A small bundled reference data set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExampleSource;

impl DataSource for ExampleSource {
    fn list_schools(&self) -> Result<Vec<SchoolRecord>, SourceError> {
        Ok([
            ("E01", "Escola Municipal Ipê Amarelo", date(2023, 3, 6)),
            ("E02", "Escola Estadual Rio Claro", date(2023, 8, 14)),
            ("E03", "Colégio Jardim das Flores", date(2024, 2, 19)),
        ]
        .into_iter()
        .map(|(id, name, established)| SchoolRecord {
            id: id.into(),
            name: name.into(),
            established_on: Some(established),
        })
        .collect())
    }

    fn list_reactors(&self) -> Result<Vec<ReactorRecord>, SourceError> {
        let reactor = |id: &str, school_id: &str, capacity_liters: Option<f64>| ReactorRecord {
            id: id.into(),
            school_id: school_id.into(),
            capacity_liters,
            height_cm: None,
            width_cm: None,
            length_cm: None,
            fill_date: None,
            harvest_date: None,
            status: ReactorStatus::Active,
        };

        Ok(vec![
            ReactorRecord {
                fill_date: Some(date(2023, 5, 22)),
                harvest_date: Some(date(2023, 7, 11)),
                status: ReactorStatus::Harvested,
                ..reactor("R001", "E01", Some(100.0))
            },
            ReactorRecord {
                fill_date: Some(date(2024, 4, 8)),
                status: ReactorStatus::Full,
                ..reactor("R002", "E01", Some(100.0))
            },
            ReactorRecord {
                height_cm: Some(40.0),
                width_cm: Some(30.0),
                length_cm: Some(50.0),
                fill_date: Some(date(2024, 3, 18)),
                status: ReactorStatus::Full,
                ..reactor("R003", "E02", None)
            },
            reactor("R004", "E02", Some(80.0)),
            ReactorRecord {
                fill_date: Some(date(2024, 10, 1)),
                status: ReactorStatus::Full,
                ..reactor("R005", "E03", None)
            },
        ])
    }

    fn provenance(&self) -> Provenance {
        Provenance::Example
    }
}

/// Whether loaded records came from the configured source or the bundled
/// example data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Source,
    Example,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedData {
    pub schools: Vec<SchoolRecord>,
    pub reactors: Vec<ReactorRecord>,
    pub provenance: Provenance,
}

impl LoadedData {
    #[must_use]
    pub fn is_example(&self) -> bool {
        self.provenance == Provenance::Example
    }

    /// Validates every filled reactor into a [`WasteBatch`], in record order.
    ///
    /// Unfilled reactors carry no waste and are skipped unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidReactor`] for the first filled reactor
    /// whose capacity or density is invalid.
    pub fn batches(&self, data: &DataConfig) -> Result<Vec<WasteBatch>, SourceError> {
        self.reactors
            .iter()
            .filter(|reactor| reactor.is_filled())
            .map(|reactor| {
                reactor.to_batch(data).map_err(|source| SourceError::InvalidReactor {
                    id: reactor.id.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Loads records from `source`, substituting [`ExampleSource`] if it fails
/// or has no reactors.
///
/// The result keeps the provenance the source reports, so data served by
/// [`ExampleSource`] directly is labeled as example data too.
#[must_use]
pub fn load_or_example(source: &dyn DataSource) -> LoadedData {
    match source.load() {
        Ok((schools, reactors)) if !reactors.is_empty() => {
            let provenance = source.provenance();
            debug!(
                schools = schools.len(),
                reactors = reactors.len(),
                ?provenance,
                "loaded records"
            );
            LoadedData {
                schools,
                reactors,
                provenance,
            }
        }
        Ok(_) => {
            warn!("data source has no reactors, using example data");
            example_data()
        }
        Err(error) => {
            warn!(%error, "data source failed, using example data");
            example_data()
        }
    }
}

fn example_data() -> LoadedData {
    let example = ExampleSource;
    LoadedData {
        schools: example.list_schools().unwrap_or_default(),
        reactors: example.list_reactors().unwrap_or_default(),
        provenance: Provenance::Example,
    }
}
