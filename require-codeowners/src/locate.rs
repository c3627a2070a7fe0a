use std::path::{Path, PathBuf};

use codeowners_rs::RuleSet;

use crate::error::{Error, Result};

/// Where GitHub looks for a CODEOWNERS file, in order of precedence.
pub const CODEOWNERS_LOCATIONS: [&str; 3] = [".github/CODEOWNERS", "CODEOWNERS", "docs/CODEOWNERS"];

/// Find the CODEOWNERS file GitHub would use for the repository at `root`.
pub fn find_codeowners(root: &Path) -> Option<PathBuf> {
    CODEOWNERS_LOCATIONS
        .iter()
        .map(|location| root.join(location))
        .find(|path| path.is_file())
}

/// Load the ruleset from `explicit` if given, otherwise from the first
/// standard location under `root`. Returns the path it was loaded from.
pub fn load_ruleset(root: &Path, explicit: Option<&Path>) -> Result<(PathBuf, RuleSet)> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => find_codeowners(root).ok_or(Error::CodeownersNotFound)?,
    };
    let ruleset = load_codeowners_file(&path)?;
    Ok((path, ruleset))
}

/// Parse the CODEOWNERS file at `path`. A file with parse errors is rejected;
/// the first error is reported, and the rest are logged.
pub fn load_codeowners_file(path: &Path) -> Result<RuleSet> {
    let parsed = codeowners_rs::parse_file(path).map_err(|source| Error::CodeownersRead {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(first) = parsed.errors.first() {
        for error in &parsed.errors[1..] {
            tracing::warn!(
                path = %path.display(),
                line = error.line,
                "{}",
                error.message
            );
        }
        return Err(Error::CodeownersParse {
            path: path.to_path_buf(),
            line: first.line,
            message: first.message.clone(),
        });
    }

    tracing::debug!(
        path = %path.display(),
        rules = parsed.rules.len(),
        "loaded CODEOWNERS"
    );
    parsed
        .into_ruleset()
        .map_err(|source| Error::CodeownersCompile {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn finds_standard_locations_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(find_codeowners(tmp.path()), None);

        fs::create_dir_all(tmp.path().join("docs")).unwrap();
        fs::write(tmp.path().join("docs/CODEOWNERS"), "* @docs\n").unwrap();
        assert_eq!(
            find_codeowners(tmp.path()),
            Some(tmp.path().join("docs/CODEOWNERS"))
        );

        fs::write(tmp.path().join("CODEOWNERS"), "* @root\n").unwrap();
        assert_eq!(
            find_codeowners(tmp.path()),
            Some(tmp.path().join("CODEOWNERS"))
        );

        fs::create_dir_all(tmp.path().join(".github")).unwrap();
        fs::write(tmp.path().join(".github/CODEOWNERS"), "/src/ @team\n").unwrap();
        let (path, ruleset) = load_ruleset(tmp.path(), None).unwrap();
        assert_eq!(path, tmp.path().join(".github/CODEOWNERS"));
        assert!(ruleset.owners("src/main.rs").is_some());
    }

    #[test]
    fn missing_codeowners() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_ruleset(tmp.path(), None),
            Err(Error::CodeownersNotFound)
        ));
        assert!(matches!(
            load_ruleset(tmp.path(), Some(&tmp.path().join("nope"))),
            Err(Error::CodeownersRead { .. })
        ));
    }

    #[test]
    fn parse_errors_are_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("CODEOWNERS");
        fs::write(&path, "/src/ @team\n/lib/ not-an-owner\n").unwrap();

        let err = load_codeowners_file(&path).unwrap_err();
        assert!(matches!(err, Error::CodeownersParse { line: 2, .. }));
        assert!(err.to_string().ends_with(":2: invalid owner: not-an-owner"));
    }
}
