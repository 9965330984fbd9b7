// crates/addendum-cli/src/config.rs
use addendum::{AgentParty, AgreementKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "addendum.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parsing error in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
}

/// Defaults that can be kept in `addendum.toml` instead of being repeated on
/// every command line.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct AddendumConfig {
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub agreement_kind: Option<AgreementKind>,
    #[serde(default)]
    pub acting_word: Option<String>,

    /// Replaces the built-in agent party; missing keys keep their defaults.
    #[serde(default)]
    pub agent: Option<AgentParty>,
}

impl AddendumConfig {
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        match read_if_exists(path)? {
            Some(content) => Ok(Some(Self::parse(&content, path)?)),
            None => Ok(None),
        }
    }

    /// Loads an explicitly requested config file; absence is an error.
    pub fn from_required(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file(path)?.ok_or_else(|| ConfigError::NotFound(path.to_path_buf()))
    }

    /// `addendum.toml` in the working directory, or an empty config.
    pub fn from_nearest() -> Result<Self, ConfigError> {
        let mut config = AddendumConfig::default();
        if let Some(local) = Self::from_file(Path::new(CONFIG_FILE))? {
            config.merge(local);
        }
        Ok(config)
    }

    /// Merge another config into this one, taking values from other if they are Some
    pub fn merge(&mut self, other: Self) {
        macro_rules! merge_field {
            ($field:ident) => {
                if let Some(value) = other.$field {
                    self.$field = Some(value);
                }
            };
        }

        merge_field!(template);
        merge_field!(city);
        merge_field!(agreement_kind);
        merge_field!(acting_word);
        merge_field!(agent);
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}
