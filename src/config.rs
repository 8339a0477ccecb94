//! generator configuration
//!
//! build a [`GeneratorConfig`] with the defaults and optional overrides,
//! then pass it to [`crate::Generator::new`].

use crate::error::{Error, Result};

/// default maximum selection nesting
pub const DEFAULT_DEPTH_LIMIT: usize = 100;

/// default extension for written operation files
pub const DEFAULT_FILE_EXTENSION: &str = "gql";

/// configuration for query synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// maximum nesting depth before a composite branch is pruned
    pub(crate) depth_limit: usize,

    /// whether fields flagged `@deprecated` are still visited
    pub(crate) include_deprecated_fields: bool,

    /// whether an already entered (parent type, field) edge may be entered again
    pub(crate) include_cross_references: bool,

    /// extension used by the output writer
    pub(crate) file_extension: String,

    /// skip schema validation and trust its shape
    pub(crate) assume_valid: bool,
}

impl GeneratorConfig {
    /// create a configuration with default settings
    ///
    /// # example
    ///
    /// ```
    /// use querysmith::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::new().with_depth_limit(5);
    /// assert_eq!(config.depth_limit(), 5);
    /// ```
    pub fn new() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            include_deprecated_fields: false,
            include_cross_references: false,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            assume_valid: false,
        }
    }

    /// set the maximum selection depth
    ///
    /// default: 100
    pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = depth_limit;
        self
    }

    /// visit fields flagged `@deprecated`
    ///
    /// default: disabled
    pub fn with_deprecated_fields(mut self, include: bool) -> Self {
        self.include_deprecated_fields = include;
        self
    }

    /// allow re-entering (parent type, field) edges already seen in the
    /// current root field
    ///
    /// default: disabled
    pub fn with_cross_references(mut self, include: bool) -> Self {
        self.include_cross_references = include;
        self
    }

    /// set the extension of written operation files (without the dot)
    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    /// skip schema validation (malformed schemas then produce unspecified output)
    pub fn with_assume_valid(mut self, assume_valid: bool) -> Self {
        self.assume_valid = assume_valid;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    pub fn include_deprecated_fields(&self) -> bool {
        self.include_deprecated_fields
    }

    pub fn include_cross_references(&self) -> bool {
        self.include_cross_references
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn assume_valid(&self) -> bool {
        self.assume_valid
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if self.depth_limit == 0 {
            return Err(Error::Config("depth limit must be at least 1".to_string()));
        }

        let ext = &self.file_extension;
        if ext.is_empty() {
            return Err(Error::Config("file extension cannot be empty".to_string()));
        }
        if ext.starts_with('.') || ext.contains(&['/', '\\'][..]) {
            return Err(Error::Config(format!(
                "invalid file extension: {ext}. use a bare extension like \"gql\""
            )));
        }

        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}
