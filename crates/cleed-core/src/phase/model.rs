use crate::common::constants::{GEO_TOLERANCE, HART, RYD};
use crate::domain::{Displacement, displacements_match};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum EnergyUnit {
    #[default]
    Hartree,
    ElectronVolt,
    Rydberg,
}

impl EnergyUnit {
    /// Only the first two characters of the header token are significant.
    pub fn from_token(token: Option<&str>) -> Self {
        let Some(prefix) = token.and_then(|token| token.get(..2)) else {
            return Self::Hartree;
        };

        if prefix.eq_ignore_ascii_case("ev") {
            Self::ElectronVolt
        } else if prefix.eq_ignore_ascii_case("ry") {
            Self::Rydberg
        } else {
            Self::Hartree
        }
    }

    /// Multiplier taking a file energy to Hartree.
    pub fn scale(self) -> f64 {
        match self {
            Self::Hartree => 1.0,
            Self::ElectronVolt => 1.0 / HART,
            Self::Rydberg => 1.0 / RYD,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Hartree => "Hartree (27.18 eV)",
            Self::ElectronVolt => "eV",
            Self::Rydberg => "Rydberg (13.59 eV)",
        }
    }
}

/// One loaded phase-shift table together with its identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseShiftRecord {
    source_path: String,
    displacement: Displacement,
    l_max: usize,
    declared_energy_count: usize,
    energy_unit: EnergyUnit,
    energies: Vec<f64>,
    phase_shifts: Vec<f64>,
    energy_min: f64,
    energy_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseShiftTable {
    pub l_max: usize,
    pub declared_energy_count: usize,
    pub energy_unit: EnergyUnit,
    pub energies: Vec<f64>,
    pub phase_shifts: Vec<f64>,
    pub energy_min: f64,
    pub energy_max: f64,
}

impl PhaseShiftRecord {
    pub fn new(source_path: String, displacement: Displacement, table: PhaseShiftTable) -> Self {
        debug_assert_eq!(
            table.phase_shifts.len(),
            table.energies.len() * (table.l_max + 1)
        );
        Self {
            source_path,
            displacement,
            l_max: table.l_max,
            declared_energy_count: table.declared_energy_count,
            energy_unit: table.energy_unit,
            energies: table.energies,
            phase_shifts: table.phase_shifts,
            energy_min: table.energy_min,
            energy_max: table.energy_max,
        }
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn displacement(&self) -> &Displacement {
        &self.displacement
    }

    pub fn l_max(&self) -> usize {
        self.l_max
    }

    pub fn channel_count(&self) -> usize {
        self.l_max + 1
    }

    pub fn energy_count(&self) -> usize {
        self.energies.len()
    }

    pub fn declared_energy_count(&self) -> usize {
        self.declared_energy_count
    }

    pub fn is_truncated(&self) -> bool {
        self.energy_count() != self.declared_energy_count
    }

    pub fn energy_unit(&self) -> EnergyUnit {
        self.energy_unit
    }

    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    pub fn phase_shifts(&self) -> &[f64] {
        &self.phase_shifts
    }

    /// First energy read.
    pub fn energy_min(&self) -> f64 {
        self.energy_min
    }

    /// Last energy read. This is not a maximum over the table: an
    /// unsorted file reports its final energy here.
    pub fn energy_max(&self) -> f64 {
        self.energy_max
    }

    pub fn row(&self, energy_index: usize) -> Option<&[f64]> {
        let channel_count = self.channel_count();
        let start = energy_index.checked_mul(channel_count)?;
        self.phase_shifts.get(start..start + channel_count)
    }

    pub fn phase_shift(&self, energy_index: usize, l: usize) -> Option<f64> {
        if l > self.l_max {
            return None;
        }
        self.row(energy_index).map(|row| row[l])
    }

    pub fn matches(&self, source_path: &str, displacement: &Displacement) -> bool {
        self.source_path == source_path
            && displacements_match(&self.displacement, displacement, GEO_TOLERANCE)
    }

    /// Tab-separated dump of the table; zero phase shifts print as `--`.
    pub fn render_table(&self) -> String {
        let mut rendered = String::from("\t  E(H)");
        for l in 0..self.channel_count() {
            let _ = write!(rendered, "\t  l={l:2}");
        }
        rendered.push_str("\n\n");

        for (energy_index, energy) in self.energies.iter().enumerate() {
            let _ = write!(rendered, "\t{energy:7.4}");
            for value in self.row(energy_index).unwrap_or_default() {
                if value.abs() > f64::EPSILON {
                    let _ = write!(rendered, "\t{value:7.4}");
                } else {
                    rendered.push_str("\t   --  ");
                }
            }
            rendered.push('\n');
        }

        rendered
    }
}
