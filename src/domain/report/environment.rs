//! Runtime environment descriptor

/// Describes the environment the report was produced in.
/// The descriptor appears on the report's `Browser:` header line; the
/// label is part of the report contract, the value is free-form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentInfo {
    descriptor: String,
}

impl EnvironmentInfo {
    /// Create from an explicit descriptor
    pub fn new(descriptor: impl Into<String>) -> Self {
        Self {
            descriptor: descriptor.into(),
        }
    }

    /// Detect the current runtime environment
    pub fn detect() -> Self {
        Self::new(format!("CLI ({})", std::env::consts::OS))
    }

    /// Get the descriptor string
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_descriptor() {
        let env = EnvironmentInfo::new("Chrome");
        assert_eq!(env.descriptor(), "Chrome");
    }

    #[test]
    fn detected_descriptor_names_the_os() {
        let env = EnvironmentInfo::detect();
        assert!(env.descriptor().starts_with("CLI ("));
        assert!(env.descriptor().contains(std::env::consts::OS));
    }
}
