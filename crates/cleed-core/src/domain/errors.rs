use std::fmt::{Display, Formatter};

pub type PhaseResult<T> = Result<T, PhaseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseErrorCategory {
    ConfigurationError,
    IoSystemError,
    FormatError,
    InternalError,
}

impl PhaseErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::ConfigurationError => 2,
            Self::IoSystemError => 3,
            Self::FormatError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::IoSystemError => "IoSystemError",
            Self::FormatError => "FormatError",
            Self::InternalError => "InternalError",
        }
    }
}

impl Display for PhaseErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Fatal outcome of a phase-shift load.
///
/// The placeholder is a stable dotted code (`IO.PHASE_OPEN`, ...) that
/// callers and tests can match on without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{category} [{placeholder}] {message}")]
pub struct PhaseError {
    category: PhaseErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl PhaseError {
    pub fn new(
        category: PhaseErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn configuration(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PhaseErrorCategory::ConfigurationError, placeholder, message)
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PhaseErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn format(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PhaseErrorCategory::FormatError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PhaseErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> PhaseErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

#[cfg(test)]
mod tests {
    use super::{PhaseError, PhaseErrorCategory};

    #[test]
    fn exit_mapping_is_stable() {
        let cases = [
            (PhaseErrorCategory::ConfigurationError, 2, "ConfigurationError"),
            (PhaseErrorCategory::IoSystemError, 3, "IoSystemError"),
            (PhaseErrorCategory::FormatError, 4, "FormatError"),
            (PhaseErrorCategory::InternalError, 5, "InternalError"),
        ];

        for (category, exit_code, name) in cases {
            assert_eq!(category.exit_code(), exit_code);
            assert_eq!(category.to_string(), name);
        }
    }

    #[test]
    fn fatal_error_renders_diagnostic_lines() {
        let error = PhaseError::io_system(
            "IO.PHASE_OPEN",
            "could not open file '/tmp/missing.phs'",
        );

        assert_eq!(error.exit_code(), 3);
        assert_eq!(
            error.diagnostic_line(),
            "ERROR: [IO.PHASE_OPEN] could not open file '/tmp/missing.phs'"
        );
        assert_eq!(error.fatal_exit_line(), "FATAL EXIT CODE: 3");
        assert_eq!(
            error.to_string(),
            "IoSystemError [IO.PHASE_OPEN] could not open file '/tmp/missing.phs'"
        );
    }
}
