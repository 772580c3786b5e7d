use super::model::{EnergyUnit, PhaseShiftTable};
use super::tokenizer::{ScanCursor, read_packed_reals};
use crate::common::constants::MAX_L_MAX;
use crate::domain::{PhaseError, PhaseResult};
use std::io::{BufRead, Lines};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct PhaseHeader {
    pub(super) energy_count: usize,
    pub(super) l_max: usize,
    pub(super) energy_unit: EnergyUnit,
}

struct LineReader<'a, R> {
    lines: Lines<R>,
    line_number: usize,
    source_label: &'a str,
}

impl<'a, R: BufRead> LineReader<'a, R> {
    fn new(reader: R, source_label: &'a str) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            source_label,
        }
    }

    fn next_line(&mut self) -> PhaseResult<Option<String>> {
        let Some(line) = self.lines.next() else {
            return Ok(None);
        };
        self.line_number += 1;
        let line = line.map_err(|source| {
            PhaseError::io_system(
                "IO.PHASE_READ",
                format!(
                    "failed to read line {} of '{}': {}",
                    self.line_number, self.source_label, source
                ),
            )
        })?;

        Ok(Some(line.trim_end_matches('\r').to_string()))
    }
}

/// Parses a phase-shift file body.
///
/// A missing phase-shift row ends the read early; the table then holds only
/// the complete (energy, row) pairs and the caller decides how to report it.
pub(super) fn parse_phase_source<R: BufRead>(
    source_label: &str,
    reader: R,
) -> PhaseResult<PhaseShiftTable> {
    let mut lines = LineReader::new(reader, source_label);

    let header_line = loop {
        match lines.next_line()? {
            Some(line) if line.starts_with('#') => continue,
            Some(line) => break line,
            None => {
                return Err(PhaseError::format(
                    "INPUT.PHASE_EOF",
                    format!("unexpected EOF found while reading file '{}'", source_label),
                ));
            }
        }
    };
    let header = parse_header(source_label, &header_line)?;
    debug!(
        file = source_label,
        unit = header.energy_unit.description(),
        "energy input unit"
    );

    let channel_count = header.l_max + 1;
    let scale = header.energy_unit.scale();
    // Grown per completed row: the declared count is not trusted for sizing.
    let mut energies = Vec::new();
    let mut phase_shifts = Vec::new();
    let mut energy_min = 0.0_f64;
    let mut energy_max: Option<f64> = None;

    while energies.len() < header.energy_count {
        let Some(energy_line) = lines.next_line()? else {
            break;
        };
        let energy = ScanCursor::new(&energy_line).scan_real().ok_or_else(|| {
            PhaseError::format(
                "INPUT.PHASE_ENERGY",
                format!(
                    "no energy value on line {} of '{}': {}",
                    lines.line_number, source_label, energy_line
                ),
            )
        })? * scale;

        if energies.is_empty() {
            energy_min = energy;
        } else {
            energy_max = Some(energy);
        }

        let Some(shift_line) = lines.next_line()? else {
            energy_max = energies.last().copied();
            break;
        };
        phase_shifts.extend(read_packed_reals(&shift_line, channel_count));
        energies.push(energy);
    }

    let (energy_min, energy_max) = if energies.is_empty() {
        (0.0, 0.0)
    } else {
        (energy_min, energy_max.unwrap_or(energy_min))
    };

    Ok(PhaseShiftTable {
        l_max: header.l_max,
        declared_energy_count: header.energy_count,
        energy_unit: header.energy_unit,
        energies,
        phase_shifts,
        energy_min,
        energy_max,
    })
}

pub(super) fn parse_header(source_label: &str, line: &str) -> PhaseResult<PhaseHeader> {
    let improper = || {
        PhaseError::format(
            "INPUT.PHASE_HEADER",
            format!("improper input line in file '{}': {}", source_label, line),
        )
    };

    let mut cursor = ScanCursor::new(line);
    let energy_count = cursor.scan_int().ok_or_else(improper)?;
    let l_max = cursor.scan_int().ok_or_else(improper)?;
    let energy_unit = EnergyUnit::from_token(cursor.scan_word());

    let energy_count = usize::try_from(energy_count).map_err(|_| improper())?;
    let l_max = usize::try_from(l_max).map_err(|_| improper())?;
    if l_max > MAX_L_MAX {
        return Err(PhaseError::format(
            "INPUT.PHASE_HEADER",
            format!(
                "lmax {} exceeds {} in file '{}': {}",
                l_max, MAX_L_MAX, source_label, line
            ),
        ));
    }

    Ok(PhaseHeader {
        energy_count,
        l_max,
        energy_unit,
    })
}
