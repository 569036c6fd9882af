//! Instrumentation filter
//!
//! Decides per file whether instrumentation applies. The glob matching
//! itself is the `glob` crate's concern; this module owns the merge of
//! explicit options, loaded project config, and built-in defaults, and the
//! decision order around the matcher. The filter is built once per session,
//! before the first transform request, and is immutable afterward.

use crate::error::{CoverlayError, Result};
use crate::nycrc;
use crate::options::CoverlayOptions;
use glob::Pattern;
use std::path::{Component, Path, PathBuf};

/// Extensions instrumented when neither options nor project config specify any
pub const DEFAULT_EXTENSIONS: &[&str] =
    &[".js", ".cjs", ".mjs", ".ts", ".tsx", ".jsx", ".vue"];

/// Directory name that is never instrumented, regardless of configuration
const NODE_MODULES: &str = "node_modules";

/// Per-file instrumentation decision for a session
#[derive(Debug)]
pub struct InstrumentFilter {
    cwd: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    extensions: Vec<String>,
}

impl InstrumentFilter {
    /// Build the filter for a session
    ///
    /// Merges, in priority order: explicit plugin options, then the loaded
    /// nyc config, then [`DEFAULT_EXTENSIONS`]. Loading the project config
    /// reads the filesystem; this is the pipeline's one suspension point and
    /// must complete before any transform request is serviced.
    pub async fn build(options: &CoverlayOptions) -> Result<Self> {
        let cwd = match &options.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir()?,
        };
        let nyc = nycrc::load_nyc_config(&cwd, options.nycrc_path.as_deref()).await?;

        let include = options.include.clone().or(nyc.include).unwrap_or_default();
        let exclude = options.exclude.clone().or(nyc.exclude).unwrap_or_default();
        let extensions = options
            .extension
            .clone()
            .or(nyc.extension)
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect());

        Self::from_parts(cwd, &include, &exclude, extensions)
    }

    /// Compile pattern lists into a filter
    fn from_parts(
        cwd: PathBuf,
        include: &[String],
        exclude: &[String],
        extensions: Vec<String>,
    ) -> Result<Self> {
        Ok(Self {
            cwd,
            include: compile_patterns(include)?,
            exclude: compile_patterns(exclude)?,
            extensions,
        })
    }

    /// Should this file be instrumented?
    ///
    /// Decision order: the file must live under the working directory, must
    /// not sit under a `node_modules` directory, must carry an instrumentable
    /// extension, must match the include list (an empty list includes
    /// everything), and must not match the exclude list.
    #[must_use]
    pub fn should_instrument(&self, filename: &str) -> bool {
        let path = Path::new(filename);
        let relative = if path.is_absolute() {
            match path.strip_prefix(&self.cwd) {
                Ok(relative) => relative,
                Err(_) => return false,
            }
        } else {
            path
        };

        if relative
            .components()
            .any(|component| component == Component::Normal(NODE_MODULES.as_ref()))
        {
            return false;
        }

        if !self.extensions.is_empty()
            && !self.extensions.iter().any(|ext| filename.ends_with(ext))
        {
            return false;
        }

        let relative = relative.to_string_lossy();
        let included = self.include.is_empty()
            || self.include.iter().any(|pattern| pattern.matches(&relative));
        included && !self.exclude.iter().any(|pattern| pattern.matches(&relative))
    }

    /// The working directory exclusion decisions are relative to
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// Compile a pattern list, surfacing the offending pattern on failure
fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|err| CoverlayError::pattern(raw, err.to_string()))
        })
        .collect()
}
