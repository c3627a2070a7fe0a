pub mod parser;
mod pattern;
mod ruleset;

use std::{io, path::Path};

pub use parser::{parse, parse_file, ParseError, ParseResult};
pub use ruleset::{InvalidOwnerError, Owner, OwnerKind, Rule, RuleSet};

/// Read and parse the CODEOWNERS file at `path` into a `RuleSet`. Parse errors
/// are ignored; use [`parse_file`] to inspect them.
pub fn from_path(path: impl AsRef<Path>) -> io::Result<RuleSet> {
    parse_file(path.as_ref())?
        .into_ruleset()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
