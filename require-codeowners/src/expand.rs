//! Expansion of a directory spec into the concrete directories it designates.
//!
//! All paths handed in and returned are relative to a root directory, and
//! filesystem access goes through `root.join(path)`. Symlinked directories are
//! never descended into and never returned from a descent, so a walk cannot
//! enter a symlink cycle. A base path that is itself a symlink to a directory
//! is accepted.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use globset::{GlobBuilder, GlobMatcher};
use memchr::memchr3;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("directory does not exist")]
    NotFound,

    #[error("path is not a directory")]
    NotADirectory,

    #[error("{source}")]
    Stat {
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern segment `{segment}`")]
    Pattern {
        segment: String,
        #[source]
        source: globset::Error,
    },

    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The result of expanding one spec: the directories the spec path resolved
/// to, and the directories found `level` levels below them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub bases: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
}

/// Whether `path` has a segment containing a wildcard character.
pub fn has_wildcard(path: &str) -> bool {
    memchr3(b'*', b'?', b'[', path.as_bytes()).is_some()
}

/// Check that the literal `path` exists under `root` and is a directory.
pub fn resolve_dir(root: &Path, path: &Path) -> Result<(), ExpandError> {
    match fs::metadata(root.join(path)) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(ExpandError::NotADirectory),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(ExpandError::NotFound),
        Err(source) => Err(ExpandError::Stat { source }),
    }
}

/// Expand `path` (which may contain wildcard segments) and descend `level`
/// directory levels below every directory it resolves to.
///
/// A literal path must exist and be a directory. A wildcard path resolves to
/// whatever directories currently match, possibly none.
pub fn expand(root: &Path, path: &str, level: usize) -> Result<Expansion, ExpandError> {
    let bases = if has_wildcard(path) {
        expand_glob(root, path)?
    } else {
        let path = PathBuf::from(path);
        resolve_dir(root, &path)?;
        vec![path]
    };

    let mut dirs = Vec::new();
    for base in &bases {
        dirs.extend(dirs_at_level(root, base, level)?);
    }

    tracing::debug!(
        path,
        level,
        bases = bases.len(),
        dirs = dirs.len(),
        "expanded directory spec"
    );
    Ok(Expansion { bases, dirs })
}

/// The directories exactly `level` levels below `dir`, sorted by name at each
/// level. Level 0 is `dir` itself. Files are ignored at every level.
pub fn dirs_at_level(root: &Path, dir: &Path, level: usize) -> Result<Vec<PathBuf>, ExpandError> {
    if level == 0 {
        return Ok(vec![dir.to_path_buf()]);
    }

    let base = root.join(dir);
    let walker = WalkDir::new(&base)
        .min_depth(level)
        .max_depth(level)
        .follow_links(false)
        .sort_by_file_name();

    let mut dirs = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().map_or_else(|| base.clone(), Path::to_path_buf);
            ExpandError::Read {
                path: relative_to(root, path),
                source: err.into(),
            }
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        match entry.path().strip_prefix(&base) {
            Ok(tail) => dirs.push(dir.join(tail)),
            Err(_) => dirs.push(entry.into_path()),
        }
    }
    Ok(dirs)
}

/// Expand a path with wildcard segments into the existing directories it
/// matches, sorted. Missing intermediate directories and non-directory
/// matches are skipped rather than reported.
fn expand_glob(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, ExpandError> {
    let start = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    let mut matches = vec![start];

    for segment in pattern.split('/').filter(|s| !s.is_empty() && *s != ".") {
        if !has_wildcard(segment) {
            for path in &mut matches {
                path.push(segment);
            }
            continue;
        }

        let matcher = segment_matcher(segment).map_err(|source| ExpandError::Pattern {
            segment: segment.to_owned(),
            source,
        })?;
        let mut next = Vec::new();
        for dir in &matches {
            let full = root.join(dir);
            if !full.is_dir() {
                continue;
            }
            let entries = fs::read_dir(&full).map_err(|source| ExpandError::Read {
                path: dir.clone(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| ExpandError::Read {
                    path: dir.clone(),
                    source,
                })?;
                let name = entry.file_name();
                if let Some(name) = name.to_str() {
                    if matcher.is_match(name) {
                        next.push(dir.join(name));
                    }
                }
            }
        }
        matches = next;
    }

    matches.retain(|path| root.join(path).is_dir());
    matches.sort();
    Ok(matches)
}

/// Compile one path segment into a glob matcher. `*` and `?` never cross a
/// `/`, and `[...]` is a character class (`[!...]` or `[^...]` negated).
fn segment_matcher(segment: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(segment)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn relative_to(root: &Path, path: PathBuf) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    }
}
