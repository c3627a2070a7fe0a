use std::fmt;

use serde::Serialize;

/// Why a directory failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    NotFound,
    NotADirectory,
    NoSubdirectoriesAtLevel,
    StatFailure,
    ExpansionFailure,
    NotCovered,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reason::NotFound => "not found",
            Reason::NotADirectory => "not a directory",
            Reason::NoSubdirectoriesAtLevel => "no subdirectories at level",
            Reason::StatFailure => "stat failure",
            Reason::ExpansionFailure => "expansion failure",
            Reason::NotCovered => "not covered",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub reason: Reason,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: Reason, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason,
            message: message.into(),
        }
    }
}

/// Every validation failure from one run, in path order once the run is
/// finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    errors: Vec<ValidationError>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Order errors by path. The sort is stable, so errors sharing a path keep
    /// the order they were found in.
    pub fn sort(&mut self) {
        self.errors.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
