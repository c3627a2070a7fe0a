use std::path::PathBuf;

use thiserror::Error;

/// Startup failures that make validation meaningless. Validation findings are
/// never reported through this type; they end up in a [`crate::Report`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("reading config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("directory at index {0} has no path")]
    MissingPath(usize),

    #[error("directory {path} has invalid level {level} (must be >= 0)")]
    InvalidLevel { path: String, level: i64 },

    #[error("invalid level `{0}`")]
    MalformedLevel(String),

    #[error("no directories configured")]
    NoDirectories,

    #[error("CODEOWNERS not found in standard locations (.github/, root, docs/)")]
    CodeownersNotFound,

    #[error("opening {}", path.display())]
    CodeownersRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    CodeownersParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("compiling rules from {}", path.display())]
    CodeownersCompile {
        path: PathBuf,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
