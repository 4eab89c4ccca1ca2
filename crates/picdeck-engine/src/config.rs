//! Build configuration, validation, and error types.
//!
//! [`BuildConfig`] tells [`Simulation::build`](crate::Simulation::build)
//! where to find schemas and where side files and the final mapping go.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use picdeck_core::{RenderError, ValidationError};
use picdeck_init::InitError;
use picdeck_schema::SchemaError;

// ── BuildConfig ────────────────────────────────────────────────────

/// Where a build reads schemas from and writes its output to.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildConfig {
    /// Directory holding the schema documents. `None` uses the process-wide
    /// store, which must already be installed. Default: `None`.
    pub schema_dir: Option<PathBuf>,
    /// Directory receiving side configuration files. Default: `"."`.
    pub side_file_dir: PathBuf,
    /// File name of the rendered simulation, inside the sink.
    /// Default: `"picdeck.json"`.
    pub output_file_name: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            schema_dir: None,
            side_file_dir: PathBuf::from("."),
            output_file_name: "picdeck.json".to_string(),
        }
    }
}

impl BuildConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Paths must not be empty.
        if let Some(dir) = &self.schema_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath {
                    field: "schema_dir",
                });
            }
        }
        if self.side_file_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath {
                field: "side_file_dir",
            });
        }
        // 2. The output is a plain file name placed by the sink.
        let name = &self.output_file_name;
        if name.is_empty() {
            return Err(ConfigError::InvalidFileName {
                name: name.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ConfigError::InvalidFileName {
                name: name.clone(),
                reason: "must be a file name, not a path".to_string(),
            });
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`BuildConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A directory setting is empty.
    EmptyPath {
        /// Name of the setting.
        field: &'static str,
    },
    /// The output file name is unusable.
    InvalidFileName {
        /// The configured name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath { field } => write!(f, "{field} must not be empty"),
            Self::InvalidFileName { name, reason } => {
                write!(f, "output file name '{name}' {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── BuildError ─────────────────────────────────────────────────────

/// Errors from [`Simulation::build`](crate::Simulation::build) and
/// [`Simulation::write`](crate::Simulation::write).
#[derive(Debug)]
pub enum BuildError {
    /// The build configuration is invalid.
    Config(ConfigError),
    /// The schema store could not be loaded.
    Schema(SchemaError),
    /// A simulation parameter is invalid.
    Validation(ValidationError),
    /// Species or operations could not be finalized.
    Init(InitError),
    /// Rendering or schema validation failed.
    Render(RenderError),
    /// A plugin observes a species the simulation does not define.
    UnknownPluginSpecies {
        /// Tag of the plugin.
        plugin: &'static str,
        /// Name of the species.
        species: String,
    },
    /// The sink could not store the rendered simulation.
    Output {
        /// Destination path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Schema(e) => write!(f, "schema store: {e}"),
            Self::Validation(e) => write!(f, "{e}"),
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
            Self::UnknownPluginSpecies { plugin, species } => {
                write!(f, "plugin '{plugin}' observes unknown species '{species}'")
            }
            Self::Output { path, reason } => {
                write!(f, "writing {} failed: {reason}", path.display())
            }
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Schema(e) => Some(e),
            Self::Validation(e) => Some(e),
            Self::Init(e) => Some(e),
            Self::Render(e) => Some(e),
            Self::UnknownPluginSpecies { .. } | Self::Output { .. } => None,
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SchemaError> for BuildError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<ValidationError> for BuildError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<InitError> for BuildError {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

impl From<RenderError> for BuildError {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}
