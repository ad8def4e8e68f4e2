//! Pump settings file adapter.
//!
//! Implements [`SettingsPort`] over the plain-text `ItC` / `Basal` /
//! `Correction` format handled by [`crate::pump::settings`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::{SettingsError, SettingsPort};
use crate::pump::PolicyTable;

pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsPort for SettingsFile {
    fn load_settings(&self) -> Result<PolicyTable, SettingsError> {
        let text = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SettingsError::NotFound,
            _ => SettingsError::IoError,
        })?;
        let table = PolicyTable::load(&text)?;
        info!(
            "pump settings loaded from {} ({} ItC, {} basal, {} correction segments)",
            self.path.display(),
            table.insulin_to_carb_schedule().len(),
            table.basal_schedule().len(),
            table.correction_schedule().len(),
        );
        Ok(table)
    }

    fn save_settings(&self, table: &PolicyTable) -> Result<(), SettingsError> {
        fs::write(&self.path, table.render()).map_err(|_| SettingsError::IoError)
    }
}
