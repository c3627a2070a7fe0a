use std::path::{Component, Path};

/// Name of the file looked up inside a directory to ask whether "some file in
/// this directory" is owned.
pub const SAMPLE_FILE_NAME: &str = "file.txt";

/// Something that knows who owns a path, typically a parsed CODEOWNERS file.
pub trait Ruleset {
    type Owner;

    /// The owners assigned by the rule deciding `path`, or `None` if no rule
    /// matches. A rule that matches but assigns nobody yields an empty slice.
    fn owners_of(&self, path: &str) -> Option<&[Self::Owner]>;
}

impl Ruleset for codeowners_rs::RuleSet {
    type Owner = codeowners_rs::Owner;

    fn owners_of(&self, path: &str) -> Option<&[Self::Owner]> {
        self.matching_rule(path).map(|rule| rule.owners.as_slice())
    }
}

/// Render `path` with `/` separators, dropping `.` components and redundant
/// separators. Symlinks are not resolved.
pub fn normalize(path: &Path) -> String {
    let mut normalized = String::new();
    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::RootDir => {
                normalized.push('/');
                continue;
            }
            Component::Prefix(prefix) => normalized.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::ParentDir => normalized.push_str(".."),
            Component::Normal(segment) => normalized.push_str(&segment.to_string_lossy()),
        }
        normalized.push('/');
    }
    if normalized.len() > 1 {
        normalized.pop();
    }
    if normalized.is_empty() {
        normalized.push('.');
    }
    normalized
}

/// The paths a ruleset is asked about for directory `dir`. Ownership rules
/// anchor differently depending on how they're written (`/dir/`, `/dir/**`,
/// `dir`), and between them these three catch every style.
pub fn query_paths(dir: &str) -> [String; 3] {
    [
        dir.to_owned(),
        format!("{dir}/"),
        format!("{dir}/{SAMPLE_FILE_NAME}"),
    ]
}

/// Whether some rule with at least one owner matches directory `dir`.
pub fn is_covered<R: Ruleset + ?Sized>(ruleset: &R, dir: &Path) -> bool {
    query_paths(&normalize(dir))
        .iter()
        .any(|path| matches!(ruleset.owners_of(path), Some(owners) if !owners.is_empty()))
}
