//! Physical and geometric constants shared by the phase-shift loader.
//!
//! `HART` is the rounded Hartree value used by LEED phase-shift tables, not
//! the CODATA value.

pub const HART: f64 = 27.18_f64;
pub const RYD: f64 = HART / 2.0;
pub const GEO_TOLERANCE: f64 = 1.0e-4_f64;
/// Largest angular-momentum index accepted from a file header.
pub const MAX_L_MAX: usize = 100;
pub const PHASE_FILE_EXTENSION: &str = "phs";

#[cfg(test)]
mod tests {
    use super::{GEO_TOLERANCE, HART, RYD};

    #[test]
    fn constants_match_expected_relationships() {
        assert!((HART - 2.0 * RYD).abs() <= f64::EPSILON);
        assert!((RYD - 13.59).abs() <= 1.0e-12);
        assert!(GEO_TOLERANCE > 0.0 && GEO_TOLERANCE < 1.0e-3);
    }
}
