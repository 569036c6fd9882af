//! nyc-style project configuration loading
//!
//! Include/exclude/extension lists can come from the project's nyc
//! configuration instead of explicit plugin options. Loading searches the
//! working directory for the usual config filenames, falling back to the
//! `nyc` key of `package.json`. A missing config is not an error; an
//! unreadable or unparsable one aborts session startup.

use crate::error::{CoverlayError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config filenames probed in the working directory, in order
const SEARCH_FILENAMES: &[&str] = &[".nycrc", ".nycrc.json", ".nycrc.yml", ".nycrc.yaml"];

/// Manifest consulted for an embedded `nyc` section when no rc file exists
const PACKAGE_MANIFEST: &str = "package.json";

/// The slice of an nyc config this pipeline consumes
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NycConfig {
    /// Include patterns
    pub include: Option<Vec<String>>,
    /// Exclude patterns
    pub exclude: Option<Vec<String>>,
    /// Instrumentable extensions
    pub extension: Option<Vec<String>>,
}

/// Load the project's nyc config
///
/// An explicit `nycrc_path` is authoritative: it must exist and parse.
/// Without one, the working directory is searched for the conventional
/// filenames, then for a `nyc` key in `package.json`; if nothing turns up
/// the config is empty and downstream defaults apply.
pub async fn load_nyc_config(cwd: &Path, nycrc_path: Option<&Path>) -> Result<NycConfig> {
    if let Some(path) = nycrc_path {
        let resolved = resolve_config_path(cwd, path);
        let contents = tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|err| CoverlayError::config_load(&resolved, err.to_string()))?;
        return parse_config(&resolved, &contents);
    }

    for name in SEARCH_FILENAMES {
        let candidate = cwd.join(name);
        match tokio::fs::read_to_string(&candidate).await {
            Ok(contents) => return parse_config(&candidate, &contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(CoverlayError::config_load(&candidate, err.to_string())),
        }
    }

    load_from_package_manifest(cwd).await
}

/// Parse a config file, dispatching on its extension
///
/// `.yml`/`.yaml` parse as YAML; everything else, including the extensionless
/// `.nycrc`, parses as JSON.
fn parse_config(path: &Path, contents: &str) -> Result<NycConfig> {
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml" | "yaml")
    );
    let parsed = if is_yaml {
        serde_yaml_ng::from_str(contents).map_err(|err| err.to_string())
    } else {
        serde_json::from_str(contents).map_err(|err| err.to_string())
    };
    parsed.map_err(|message| CoverlayError::config_load(path, message))
}

/// Read the `nyc` section of `package.json`, if either exists
async fn load_from_package_manifest(cwd: &Path) -> Result<NycConfig> {
    let manifest = cwd.join(PACKAGE_MANIFEST);
    let contents = match tokio::fs::read_to_string(&manifest).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(NycConfig::default());
        }
        Err(err) => return Err(CoverlayError::config_load(&manifest, err.to_string())),
    };

    let parsed: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|err| CoverlayError::config_load(&manifest, err.to_string()))?;
    match parsed.get("nyc") {
        Some(section) => serde_json::from_value(section.clone())
            .map_err(|err| CoverlayError::config_load(&manifest, err.to_string())),
        None => Ok(NycConfig::default()),
    }
}

/// Resolve an explicit path against the working directory
#[must_use]
pub fn resolve_config_path(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
