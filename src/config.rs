//! Configuration Management
//!
//! Locates and loads the resource definitions for a run.

use crate::error::ConfigError;
use crate::resource::Registry;
use std::path::{Path, PathBuf};

/// Definitions file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Where the resource definitions came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionsSource {
    File(PathBuf),
    Builtin,
}

impl std::fmt::Display for DefinitionsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionsSource::File(path) => write!(f, "{}", path.display()),
            DefinitionsSource::Builtin => write!(f, "built-in definitions"),
        }
    }
}

/// Pick the definitions source (explicit path > ./config.yaml > built-in)
pub fn locate(explicit: Option<&Path>) -> DefinitionsSource {
    if let Some(path) = explicit {
        return DefinitionsSource::File(path.to_path_buf());
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        DefinitionsSource::File(local)
    } else {
        DefinitionsSource::Builtin
    }
}

/// Load and validate the definitions from `source`
pub fn load(source: &DefinitionsSource) -> Result<Registry, ConfigError> {
    match source {
        DefinitionsSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Registry::from_yaml(&content)
        }
        DefinitionsSource::Builtin => Registry::builtin(),
    }
}
