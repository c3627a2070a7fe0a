use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Config file looked up in the repository root when none is given.
pub const DEFAULT_CONFIG_PATH: &str = ".requirecodeowners.yml";

/// A path to validate and how many directory levels to descend below it
/// before checking coverage. `path` may contain wildcard segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySpec {
    pub path: String,
    pub level: usize,
}

impl DirectorySpec {
    pub fn new(path: impl Into<String>, level: usize) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }
}

/// Parses `PATH` or `PATH:LEVEL`.
impl FromStr for DirectorySpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (path, level) = match s.rsplit_once(':') {
            Some((path, level)) => {
                let level = level
                    .parse::<i64>()
                    .map_err(|_| Error::MalformedLevel(level.to_owned()))?;
                (path, level)
            }
            None => (s, 0),
        };
        checked_spec(path, level, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub directories: Vec<DirectorySpec>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    directories: Vec<RawDirectorySpec>,
}

#[derive(Deserialize)]
struct RawDirectorySpec {
    #[serde(default)]
    path: String,
    #[serde(default)]
    level: i64,
}

impl Config {
    /// Read and validate the YAML config file at `path`.
    pub fn load(path: &Path) -> Result<Config> {
        let source = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&source)?;
        tracing::debug!(
            path = %path.display(),
            directories = config.directories.len(),
            "loaded config"
        );
        Ok(config)
    }

    pub fn from_yaml(source: &str) -> Result<Config> {
        let raw: RawConfig = serde_yaml::from_str(source)?;
        let directories = raw
            .directories
            .into_iter()
            .enumerate()
            .map(|(idx, d)| checked_spec(&d.path, d.level, idx))
            .collect::<Result<Vec<_>>>()?;

        if directories.is_empty() {
            return Err(Error::NoDirectories);
        }
        Ok(Config { directories })
    }
}

fn checked_spec(path: &str, level: i64, idx: usize) -> Result<DirectorySpec> {
    if path.is_empty() {
        return Err(Error::MissingPath(idx));
    }
    let level = usize::try_from(level).map_err(|_| Error::InvalidLevel {
        path: path.to_owned(),
        level,
    })?;
    Ok(DirectorySpec::new(path, level))
}
