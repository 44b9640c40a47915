//! `team-query.yaml`: query groups, their engines and targets, and an
//! optional static schema.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use teamq_compiler::Engine;
use teamq_compiler::schema::{NoSchema, SchemaLookup, StaticSchema};

pub const SUPPORTED_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported configuration version {version} in '{}' (expected {SUPPORTED_VERSION})", path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("'{}' declares no `sql` groups", path.display())]
    NoGroups { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub project: Option<Project>,
    pub sql: Vec<SqlGroup>,
    #[serde(default)]
    pub schema: Option<SchemaConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlGroup {
    pub queries: Vec<PathBuf>,
    #[serde(default)]
    pub engine: Engine,
    #[serde(rename = "gen", default)]
    pub targets: Vec<GenTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenTarget {
    pub plugin: String,
    pub out: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaConfig {
    pub tables: StaticSchema,
}

impl Config {
    /// Read and validate `path`, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        tracing::debug!(path = %path.display(), "loading configuration");
        Self::parse(&text, path, base)
    }

    /// Parse configuration text. `path` is only used in errors.
    pub fn parse(text: &str, path: &Path, base: &Path) -> Result<Config, ConfigError> {
        let mut config: Config =
            serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.version != SUPPORTED_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                path: path.to_path_buf(),
                version: config.version,
            });
        }
        if config.sql.is_empty() {
            return Err(ConfigError::NoGroups {
                path: path.to_path_buf(),
            });
        }

        for group in &mut config.sql {
            for query in &mut group.queries {
                *query = base.join(&*query);
            }
            for target in &mut group.targets {
                target.out = base.join(&target.out);
            }
        }
        Ok(config)
    }

    pub fn schema(&self) -> &dyn SchemaLookup {
        match &self.schema {
            Some(schema) => &schema.tables,
            None => &NoSchema,
        }
    }
}
