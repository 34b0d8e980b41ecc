//! Parsing options and configuration.

/// Options for parsing FineReader exports.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Error handling mode for malformed nodes
    pub error_mode: ErrorMode,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip malformed nodes).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Check if malformed nodes should be skipped instead of failing.
    pub fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

/// What to do when a node carries malformed geometry.
///
/// Errors that make the whole document unusable (unknown schema, broken
/// XML) are always returned regardless of the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first malformed node
    #[default]
    Strict,
    /// Log and drop malformed nodes, keep the rest of the document
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().lenient();
        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(options.is_lenient());

        let options = options.with_error_mode(ErrorMode::Strict);
        assert!(!options.is_lenient());
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
    }
}
