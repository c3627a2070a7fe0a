use std::path::{Path, PathBuf};

use crate::{
    config::{DirectorySpec, DEFAULT_CONFIG_PATH},
    coverage::{self, Ruleset},
    expand::{self, ExpandError},
    report::{Reason, Report, ValidationError},
};

/// Checks directory specs against a ruleset, collecting every failure rather
/// than stopping at the first.
pub struct Validator<'a, R: ?Sized> {
    ruleset: &'a R,
    root: PathBuf,
    source: String,
}

impl<'a, R: Ruleset + ?Sized> Validator<'a, R> {
    pub fn new(ruleset: &'a R) -> Self {
        Self {
            ruleset,
            root: PathBuf::from("."),
            source: DEFAULT_CONFIG_PATH.to_owned(),
        }
    }

    /// Directory that spec paths are relative to. Defaults to the current
    /// directory.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Where the specs came from, named in remediation messages.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Validate every spec and return the failures sorted by path.
    pub fn validate(&self, specs: &[DirectorySpec]) -> Report {
        let mut report = Report::new();
        for spec in specs {
            let before = report.len();
            self.validate_spec(spec, &mut report);
            tracing::debug!(
                path = %spec.path,
                level = spec.level,
                errors = report.len() - before,
                "validated directory spec"
            );
        }
        report.sort();

        tracing::info!(
            specs = specs.len(),
            errors = report.len(),
            "validation finished"
        );
        report
    }

    fn validate_spec(&self, spec: &DirectorySpec, report: &mut Report) {
        let glob = expand::has_wildcard(&spec.path);

        // Literal paths are checked up front so a missing or misconfigured
        // path produces one precise error.
        if !glob {
            if let Err(err) = expand::resolve_dir(&self.root, Path::new(&spec.path)) {
                report.push(self.resolve_error(spec, err));
                return;
            }
        }

        let expansion = match expand::expand(&self.root, &spec.path, spec.level) {
            Ok(expansion) => expansion,
            Err(err) => {
                report.push(ValidationError::new(
                    &spec.path,
                    Reason::ExpansionFailure,
                    format!("error reading: {err}"),
                ));
                return;
            }
        };

        if glob && expansion.bases.is_empty() {
            report.push(ValidationError::new(
                &spec.path,
                Reason::NotFound,
                format!(
                    "no directories match pattern. Fix the pattern or remove from {}",
                    self.source
                ),
            ));
            return;
        }

        if spec.level > 0 && expansion.dirs.is_empty() {
            report.push(ValidationError::new(
                &spec.path,
                Reason::NoSubdirectoriesAtLevel,
                format!(
                    "no subdirectories at level {}. Create subdirectories or set level: 0",
                    spec.level
                ),
            ));
            return;
        }

        // Reported paths keep the form they were given in; only the
        // suggested CODEOWNERS entry is normalized.
        for dir in &expansion.dirs {
            if !coverage::is_covered(self.ruleset, dir) {
                let message = format!(
                    "missing CODEOWNERS entry. Add to CODEOWNERS: /{}/ @owner",
                    coverage::normalize(dir)
                );
                report.push(ValidationError::new(
                    dir.display().to_string(),
                    Reason::NotCovered,
                    message,
                ));
            }
        }
    }

    fn resolve_error(&self, spec: &DirectorySpec, err: ExpandError) -> ValidationError {
        let (reason, message) = match err {
            ExpandError::NotFound => (
                Reason::NotFound,
                format!(
                    "directory does not exist. Create it or remove from {}",
                    self.source
                ),
            ),
            ExpandError::NotADirectory => (
                Reason::NotADirectory,
                format!("path is a file, not a directory. Update {}", self.source),
            ),
            err => (Reason::StatFailure, format!("error: {err}")),
        };
        ValidationError::new(&spec.path, reason, message)
    }
}

/// Validate `specs` relative to the current directory.
pub fn validate<R: Ruleset + ?Sized>(specs: &[DirectorySpec], ruleset: &R) -> Report {
    Validator::new(ruleset).validate(specs)
}
