//! Plugin options
//!
//! Explicit caller-supplied options for a coverage session. These merge with
//! values loaded from the project's nyc-style config file; explicit options
//! always win over loaded config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Explicit options for a coverage session
///
/// All fields are optional at the configuration surface. Field names follow
/// the camelCase plugin-config convention of the host tool when serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverlayOptions {
    /// Require the coverage env variable to be `"true"` for instrumentation
    pub require_env: bool,
    /// Disable instrumentation for production builds
    pub check_prod: bool,
    /// Instrument build output even outside a dev-server session
    pub force_build_instrument: bool,
    /// Read the coverage flag from the fixed `CYPRESS_COVERAGE` variable
    pub cypress: bool,
    /// Include patterns; overrides the project config when set
    pub include: Option<Vec<String>>,
    /// Exclude patterns; overrides the project config when set
    pub exclude: Option<Vec<String>>,
    /// Instrumentable extensions; overrides the project config when set
    pub extension: Option<Vec<String>>,
    /// Working directory for exclusion decisions; defaults to the process cwd
    pub cwd: Option<PathBuf>,
    /// Explicit path to an nyc-style config file
    pub nycrc_path: Option<PathBuf>,
}

impl Default for CoverlayOptions {
    fn default() -> Self {
        Self {
            require_env: false,
            check_prod: true,
            force_build_instrument: false,
            cypress: false,
            include: None,
            exclude: None,
            extension: None,
            cwd: None,
            nycrc_path: None,
        }
    }
}

impl CoverlayOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the coverage env variable to opt in
    #[must_use]
    pub const fn with_require_env(mut self, require_env: bool) -> Self {
        self.require_env = require_env;
        self
    }

    /// Control the production-build check
    #[must_use]
    pub const fn with_check_prod(mut self, check_prod: bool) -> Self {
        self.check_prod = check_prod;
        self
    }

    /// Instrument even outside dev-server sessions
    #[must_use]
    pub const fn with_force_build_instrument(mut self, force: bool) -> Self {
        self.force_build_instrument = force;
        self
    }

    /// Read the coverage flag from `CYPRESS_COVERAGE`
    #[must_use]
    pub const fn with_cypress(mut self, cypress: bool) -> Self {
        self.cypress = cypress;
        self
    }

    /// Set explicit include patterns
    #[must_use]
    pub fn with_include<I, S>(mut self, include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(include.into_iter().map(Into::into).collect());
        self
    }

    /// Set explicit exclude patterns
    #[must_use]
    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = Some(exclude.into_iter().map(Into::into).collect());
        self
    }

    /// Set explicit instrumentable extensions
    #[must_use]
    pub fn with_extension<I, S>(mut self, extension: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension = Some(extension.into_iter().map(Into::into).collect());
        self
    }

    /// Set the working directory for exclusion decisions
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Point at a specific nyc-style config file
    #[must_use]
    pub fn with_nycrc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.nycrc_path = Some(path.into());
        self
    }
}
