use super::CliError;
use anyhow::{Context, anyhow};
use cleed_core::common::config::PhaseConfig;
use cleed_core::domain::{Displacement, displacement};
use cleed_core::phase::{PhaseShiftRecord, PhaseShiftRepository};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct SourceArgs {
    /// Directory for relative phase-shift names (default: $CLEED_PHASE)
    #[arg(long, value_name = "DIR")]
    phase_dir: Option<PathBuf>,

    /// Displacement attached to every requested table
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true
    )]
    dr: Option<Vec<f64>>,
}

impl SourceArgs {
    fn repository(&self) -> PhaseShiftRepository {
        let config = PhaseConfig::from_env().overridden_by(self.phase_dir.clone());
        PhaseShiftRepository::new(config)
    }

    fn displacement(&self) -> Displacement {
        match self.dr.as_deref() {
            Some([x, y, z]) => displacement(*x, *y, *z),
            _ => displacement(0.0, 0.0, 0.0),
        }
    }
}

#[derive(clap::Args)]
pub(super) struct LoadArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Emit loaded records as JSON
    #[arg(long)]
    json: bool,

    /// Write the JSON report to a file instead of stdout
    #[arg(long, value_name = "PATH", requires = "json")]
    output: Option<PathBuf>,

    /// Phase-shift names (relative to the phase directory) or absolute paths
    #[arg(required = true, value_name = "NAME")]
    names: Vec<String>,
}

#[derive(clap::Args)]
pub(super) struct TableArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Phase-shift name or absolute path
    #[arg(value_name = "NAME")]
    name: String,
}

#[derive(Serialize)]
struct LoadedEntry<'a> {
    name: &'a str,
    index: usize,
    record: &'a PhaseShiftRecord,
}

pub(super) fn run_load_command(args: LoadArgs) -> Result<i32, CliError> {
    let mut repository = args.source.repository();
    let displacement = args.source.displacement();

    let mut indices = Vec::with_capacity(args.names.len());
    for name in &args.names {
        let index = repository
            .resolve_or_load(name, &displacement)
            .map_err(CliError::Phase)?;
        indices.push(index);
    }
    info!(
        requests = indices.len(),
        tables = repository.len(),
        "phase shifts loaded"
    );

    if args.json {
        let entries = args
            .names
            .iter()
            .zip(&indices)
            .map(|(name, &index)| {
                Ok(LoadedEntry {
                    name,
                    index,
                    record: loaded_record(&repository, index)?,
                })
            })
            .collect::<Result<Vec<_>, CliError>>()?;
        let rendered = serde_json::to_string_pretty(&entries)
            .context("failed to serialize loaded phase shifts")?;

        match &args.output {
            Some(path) => fs::write(path, rendered)
                .with_context(|| format!("failed to write JSON report '{}'", path.display()))?,
            None => println!("{}", rendered),
        }
        return Ok(0);
    }

    for (name, &index) in args.names.iter().zip(&indices) {
        let record = loaded_record(&repository, index)?;
        println!("{}", summary_line(name, index, record));
    }
    println!(
        "{} request(s), {} table(s) loaded",
        indices.len(),
        repository.len()
    );

    Ok(0)
}

pub(super) fn run_table_command(args: TableArgs) -> Result<i32, CliError> {
    let mut repository = args.source.repository();
    let index = repository
        .resolve_or_load(&args.name, &args.source.displacement())
        .map_err(CliError::Phase)?;
    let record = loaded_record(&repository, index)?;

    println!("# {}", record.source_path());
    println!(
        "# energies = {}, lmax = {}, input unit = {}",
        record.energy_count(),
        record.l_max(),
        record.energy_unit().description()
    );
    print!("{}", record.render_table());

    Ok(0)
}

fn loaded_record(
    repository: &PhaseShiftRepository,
    index: usize,
) -> Result<&PhaseShiftRecord, CliError> {
    repository
        .record(index)
        .ok_or_else(|| CliError::Internal(anyhow!("repository returned unknown index {index}")))
}

fn summary_line(name: &str, index: usize, record: &PhaseShiftRecord) -> String {
    let truncated = if record.is_truncated() {
        format!(" (truncated, {} declared)", record.declared_energy_count())
    } else {
        String::new()
    };

    format!(
        "[{index}] {name}: {} energies, lmax {}, E = {:.4} .. {:.4} H, file {}{}",
        record.energy_count(),
        record.l_max(),
        record.energy_min(),
        record.energy_max(),
        record.source_path(),
        truncated
    )
}

#[cfg(test)]
mod tests {
    use super::SourceArgs;
    use cleed_core::domain::displacement;

    #[test]
    fn missing_displacement_defaults_to_origin() {
        let args = SourceArgs {
            phase_dir: None,
            dr: None,
        };
        assert_eq!(args.displacement(), displacement(0.0, 0.0, 0.0));
    }

    #[test]
    fn displacement_components_fill_slots_one_to_three() {
        let args = SourceArgs {
            phase_dir: None,
            dr: Some(vec![0.1, -0.2, 0.3]),
        };
        assert_eq!(args.displacement(), [0.0, 0.1, -0.2, 0.3]);
    }
}
