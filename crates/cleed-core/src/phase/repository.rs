use super::model::PhaseShiftRecord;
use super::parser::parse_phase_source;
use crate::common::config::{PHASE_DIR_ENV, PhaseConfig};
use crate::common::constants::PHASE_FILE_EXTENSION;
use crate::domain::{Displacement, PhaseError, PhaseResult};
use std::fs::File;
use std::io::BufReader;
use std::path::MAIN_SEPARATOR;
use tracing::{debug, warn};

/// Append-only store of loaded phase-shift tables.
///
/// Indices handed out by [`PhaseShiftRepository::resolve_or_load`] stay valid
/// for the lifetime of the repository: records are never removed or
/// modified once stored.
#[derive(Debug, Clone, Default)]
pub struct PhaseShiftRepository {
    config: PhaseConfig,
    records: Vec<PhaseShiftRecord>,
}

impl PhaseShiftRepository {
    pub fn new(config: PhaseConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(PhaseConfig::from_env())
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&PhaseShiftRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[PhaseShiftRecord] {
        &self.records
    }

    /// Returns the index of the table for `name` at `displacement`, reading
    /// the file only when no stored record has the same resolved path and a
    /// displacement within `GEO_TOLERANCE`.
    pub fn resolve_or_load(
        &mut self,
        name: &str,
        displacement: &Displacement,
    ) -> PhaseResult<usize> {
        let source_path = resolve_phase_path(name, &self.config)?;

        if let Some(index) = self.find(&source_path, displacement) {
            debug!(file = %source_path, index, "phase shifts already loaded");
            return Ok(index);
        }

        let index = self.records.len();
        debug!(file = %source_path, index, "reading phase shift file");
        let record = load_record(source_path, *displacement)?;
        self.records.push(record);
        Ok(index)
    }

    /// First stored record matching the identity, in insertion order.
    pub fn find(&self, source_path: &str, displacement: &Displacement) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.matches(source_path, displacement))
    }
}

/// Absolute names are used verbatim; anything else becomes
/// `<phase_dir>/<name>.phs`.
pub fn resolve_phase_path(name: &str, config: &PhaseConfig) -> PhaseResult<String> {
    if name.starts_with(MAIN_SEPARATOR) {
        return Ok(name.to_string());
    }

    let phase_dir = config.phase_dir().ok_or_else(|| {
        PhaseError::configuration(
            "CONFIG.PHASE_PATH",
            format!(
                "environment variable {} not defined; cannot resolve phase shift '{}'",
                PHASE_DIR_ENV, name
            ),
        )
    })?;

    Ok(format!(
        "{}{}{}.{}",
        phase_dir.display(),
        MAIN_SEPARATOR,
        name,
        PHASE_FILE_EXTENSION
    ))
}

fn load_record(
    source_path: String,
    displacement: Displacement,
) -> PhaseResult<PhaseShiftRecord> {
    let file = File::open(&source_path).map_err(|source| {
        PhaseError::io_system(
            "IO.PHASE_OPEN",
            format!("could not open file '{}': {}", source_path, source),
        )
    })?;
    let table = parse_phase_source(&source_path, BufReader::new(file))?;

    let record = PhaseShiftRecord::new(source_path, displacement, table);
    debug!(
        energies = record.energy_count(),
        l_max = record.l_max(),
        "phase shift table:\n{}",
        record.render_table()
    );

    if record.is_truncated() {
        warn!(
            expected = record.declared_energy_count(),
            found = record.energy_count(),
            file = record.source_path(),
            "EOF found before reading all phase shifts"
        );
    }

    Ok(record)
}
