//! Search-path configuration for phase-shift files.
//!
//! Relative phase-shift names are looked up in a single directory, normally
//! taken from the `CLEED_PHASE` environment variable.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const PHASE_DIR_ENV: &str = "CLEED_PHASE";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhaseConfig {
    phase_dir: Option<PathBuf>,
}

impl PhaseConfig {
    pub fn new(phase_dir: Option<PathBuf>) -> Self {
        Self { phase_dir }
    }

    pub fn with_phase_dir(phase_dir: impl Into<PathBuf>) -> Self {
        Self {
            phase_dir: Some(phase_dir.into()),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_value(env::var_os(PHASE_DIR_ENV))
    }

    /// An empty variable counts as unset.
    pub fn from_env_value(value: Option<OsString>) -> Self {
        let phase_dir = value
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self { phase_dir }
    }

    pub fn phase_dir(&self) -> Option<&Path> {
        self.phase_dir.as_deref()
    }

    /// Explicit directories win over whatever is already configured.
    pub fn overridden_by(self, phase_dir: Option<PathBuf>) -> Self {
        match phase_dir {
            Some(phase_dir) => Self::with_phase_dir(phase_dir),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PhaseConfig;
    use std::ffi::OsString;
    use std::path::{Path, PathBuf};

    #[test]
    fn missing_or_empty_env_value_leaves_directory_unset() {
        assert_eq!(PhaseConfig::from_env_value(None).phase_dir(), None);
        assert_eq!(
            PhaseConfig::from_env_value(Some(OsString::new())).phase_dir(),
            None
        );
    }

    #[test]
    fn env_value_becomes_phase_dir() {
        let config = PhaseConfig::from_env_value(Some(OsString::from("/opt/cleed/phase")));
        assert_eq!(config.phase_dir(), Some(Path::new("/opt/cleed/phase")));
    }

    #[test]
    fn explicit_directory_overrides_configured_one() {
        let config = PhaseConfig::with_phase_dir("/from/env");
        assert_eq!(
            config.clone().overridden_by(None).phase_dir(),
            Some(Path::new("/from/env"))
        );
        assert_eq!(
            config
                .overridden_by(Some(PathBuf::from("/from/cli")))
                .phase_dir(),
            Some(Path::new("/from/cli"))
        );
    }
}
