//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the school
//! settings and tariff schedule from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Tariff;
use crate::validation::validate_tariff;

use super::types::{SchoolCalendar, SchoolConfig, UploadLimits};

/// Loads and provides access to school configuration.
///
/// # Directory Structure
///
/// ```text
/// config/school/
/// ├── school.yaml      # Name, admin account, calendar, upload limits
/// └── tariffs/
///     └── 2026.yaml    # Monthly rates for one school year
/// ```
///
/// # Example
///
/// ```no_run
/// use tuition_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/school")?;
/// let tariff = loader.tariff_for(2026)?;
/// println!("Primary: {}", tariff.primary);
/// # Ok::<(), tuition_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    school: SchoolConfig,
    tariffs: Vec<Tariff>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Fails with `ConfigNotFound` when `school.yaml` or the `tariffs`
    /// directory is missing, and with `ConfigParseError` when a file is not
    /// valid YAML or the tariffs are inconsistent.
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let school = Self::load_yaml::<SchoolConfig>(&path.join("school.yaml"))?;
        let tariffs = Self::load_tariffs(&path.join("tariffs"))?;

        Self::new(school, tariffs)
    }

    /// Builds a loader from already-parsed parts, applying the same checks
    /// as [`ConfigLoader::load`].
    pub fn new(school: SchoolConfig, mut tariffs: Vec<Tariff>) -> LedgerResult<Self> {
        school.calendar.validate()?;

        let mut active_years: BTreeMap<i32, usize> = BTreeMap::new();
        for tariff in &tariffs {
            validate_tariff(tariff).map_err(|e| LedgerError::ConfigParseError {
                path: format!("tariffs/{}", tariff.year),
                message: e.to_string(),
            })?;
            if tariff.active {
                *active_years.entry(tariff.year).or_default() += 1;
            }
        }
        if let Some((year, _)) = active_years.iter().find(|(_, count)| **count > 1) {
            return Err(LedgerError::ConfigParseError {
                path: format!("tariffs/{}", year),
                message: "more than one active tariff for the same year".to_string(),
            });
        }

        tariffs.sort_by_key(|t| t.year);
        Ok(Self { school, tariffs })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every `.yaml` file in the tariffs directory.
    fn load_tariffs(tariffs_dir: &Path) -> LedgerResult<Vec<Tariff>> {
        let dir_str = tariffs_dir.display().to_string();

        let entries = fs::read_dir(tariffs_dir).map_err(|_| LedgerError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut tariffs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| LedgerError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tariffs.push(Self::load_yaml::<Tariff>(&path)?);
            }
        }

        if tariffs.is_empty() {
            return Err(LedgerError::ConfigNotFound {
                path: format!("{} (no tariff files found)", dir_str),
            });
        }

        Ok(tariffs)
    }

    /// Returns the school settings.
    pub fn school(&self) -> &SchoolConfig {
        &self.school
    }

    /// Returns the school-year calendar.
    pub fn calendar(&self) -> &SchoolCalendar {
        &self.school.calendar
    }

    /// Returns the proof upload limits.
    pub fn uploads(&self) -> &UploadLimits {
        &self.school.uploads
    }

    /// Every configured tariff, oldest year first.
    pub fn tariffs(&self) -> &[Tariff] {
        &self.tariffs
    }

    /// The active tariff for a school year.
    pub fn tariff_for(&self, year: i32) -> LedgerResult<&Tariff> {
        self.tariffs
            .iter()
            .find(|t| t.active && t.year == year)
            .ok_or(LedgerError::TariffNotFound { year })
    }

    /// The active tariff with the most recent year, if any.
    pub fn latest_tariff(&self) -> Option<&Tariff> {
        self.tariffs.iter().rev().find(|t| t.active)
    }
}
