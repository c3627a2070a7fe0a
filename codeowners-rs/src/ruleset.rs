use std::{fmt, path::Path};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::pattern::pattern_to_regex;

/// A set of CODEOWNERS rules compiled for matching. Rules later in the file
/// take precedence over earlier ones, so the last matching rule wins.
///
/// Each rule gets its own small regex, so the size of the set is bounded by
/// the number of rules rather than by a single compiled automaton.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    matchers: Vec<Regex>,
}

impl RuleSet {
    /// Compile a `RuleSet` from rules in file order.
    pub fn new(rules: Vec<Rule>) -> Result<Self, regex::Error> {
        let matchers = rules
            .iter()
            .map(|rule| Regex::new(&pattern_to_regex(&rule.pattern)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules, matchers })
    }

    /// The rules in the set, in the order they were declared.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rule that decides ownership of `path`: the last one that matches.
    /// A rule with no owners is still returned; it explicitly un-owns the path.
    pub fn matching_rule(&self, path: impl AsRef<Path>) -> Option<&Rule> {
        let path = path.as_ref().to_string_lossy();
        self.matchers
            .iter()
            .rposition(|matcher| matcher.is_match(&path))
            .map(|idx| &self.rules[idx])
    }

    /// Every rule matching `path`, paired with its index in the file.
    pub fn all_matching_rules(&self, path: impl AsRef<Path>) -> Vec<(usize, &Rule)> {
        let path = path.as_ref().to_string_lossy();
        self.matchers
            .iter()
            .enumerate()
            .filter(|(_, matcher)| matcher.is_match(&path))
            .map(|(idx, _)| (idx, &self.rules[idx]))
            .collect()
    }

    /// The owners of `path`, or `None` if no rule matches or the matching
    /// rule has no owners.
    pub fn owners(&self, path: impl AsRef<Path>) -> Option<&[Owner]> {
        self.matching_rule(path).and_then(|rule| {
            if rule.owners.is_empty() {
                None
            } else {
                Some(rule.owners.as_ref())
            }
        })
    }
}

/// A CODEOWNERS rule: a pattern and the owners assigned to paths it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub owners: Vec<Owner>,
}

/// An owner of a CODEOWNERS rule: a user, a team, or an email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner {
    pub value: String,
    pub kind: OwnerKind,
}

impl Owner {
    pub fn new(value: String, kind: OwnerKind) -> Self {
        Self { value, kind }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    User,
    Team,
    Email,
}

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9.-]+\z").expect("valid regex"));
static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A@[A-Za-z0-9_-]+\z").expect("valid regex"));
static TEAM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A@[A-Za-z0-9_-]+/[A-Za-z0-9_.-]+\z").expect("valid regex"));

impl TryFrom<String> for Owner {
    type Error = InvalidOwnerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let kind = if USERNAME_REGEX.is_match(&value) {
            OwnerKind::User
        } else if TEAM_REGEX.is_match(&value) {
            OwnerKind::Team
        } else if EMAIL_REGEX.is_match(&value) {
            OwnerKind::Email
        } else {
            return Err(InvalidOwnerError { owner: value });
        };
        Ok(Owner::new(value, kind))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOwnerError {
    owner: String,
}

impl fmt::Display for InvalidOwnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid owner: {}", self.owner)
    }
}

impl std::error::Error for InvalidOwnerError {}
