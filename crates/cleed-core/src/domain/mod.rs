pub mod errors;

pub use errors::{PhaseError, PhaseErrorCategory, PhaseResult};

/// Displacement attached to a phase-shift table.
///
/// Element 0 is reserved and never compared; elements 1..=3 hold the
/// x, y and z components.
pub type Displacement = [f64; 4];

pub const fn displacement(x: f64, y: f64, z: f64) -> Displacement {
    [0.0, x, y, z]
}

/// Component-wise absolute comparison of elements 1..=3.
pub fn displacements_match(lhs: &Displacement, rhs: &Displacement, tolerance: f64) -> bool {
    lhs[1..]
        .iter()
        .zip(&rhs[1..])
        .all(|(left, right)| (left - right).abs() < tolerance)
}

#[cfg(test)]
mod tests {
    use super::{displacement, displacements_match};

    #[test]
    fn reserved_component_is_ignored() {
        let lhs = [5.0, 0.1, 0.2, 0.3];
        let rhs = [-7.0, 0.1, 0.2, 0.3];
        assert!(displacements_match(&lhs, &rhs, 1.0e-4));
    }

    #[test]
    fn tolerance_is_strict_and_absolute() {
        let origin = displacement(0.0, 0.0, 0.0);
        assert!(displacements_match(
            &origin,
            &displacement(0.0, 0.5e-4, 0.0),
            1.0e-4
        ));
        assert!(!displacements_match(
            &origin,
            &displacement(0.0, 0.0, 2.0e-4),
            1.0e-4
        ));
        assert!(!displacements_match(
            &displacement(100.0, 0.0, 0.0),
            &displacement(100.001, 0.0, 0.0),
            1.0e-4
        ));
    }
}
