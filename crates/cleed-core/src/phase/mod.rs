//! Phase-shift file loading and the append-only table repository.

mod model;
mod parser;
mod repository;
mod shared;
mod tokenizer;

pub use model::{EnergyUnit, PhaseShiftRecord, PhaseShiftTable};
pub use repository::{PhaseShiftRepository, resolve_phase_path};
pub use shared::SharedPhaseShiftRepository;
pub use tokenizer::{PackedReals, ScanCursor, read_packed_reals};
