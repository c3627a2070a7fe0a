//! Checks that directories in a source tree are covered by CODEOWNERS rules.
//!
//! A run takes a list of [`DirectorySpec`]s and a [`Ruleset`], expands every
//! spec into concrete directories, and reports each one that no owned rule
//! covers. See [`Validator`].

pub mod config;
pub mod coverage;
pub mod error;
pub mod expand;
pub mod locate;
pub mod render;
pub mod report;
pub mod validate;

pub use config::{Config, DirectorySpec};
pub use coverage::{is_covered, Ruleset};
pub use error::{Error, Result};
pub use report::{Reason, Report, ValidationError};
pub use validate::{validate, Validator};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_VALIDATION_FAILED: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
