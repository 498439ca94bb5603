//! Flag value validation.
//!
//! Validation is purely syntactic: each value-carrying kind maps to a regular
//! expression, multi-value flags repeat that expression around the configured
//! separator, and path flags may additionally be checked for existence via an
//! injected predicate. Multi-value strings are validated as a whole and never
//! split.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//!
//! use command_flags_core::*;
//!
//! let flag = FlagDefinition::int("ids", "Identifiers").allow_many();
//! let exists = |_: &Path| true;
//!
//! assert!(validate_flag(&flag, "1,2,3", &exists).is_ok());
//! assert_eq!(
//!     validate_flag(&flag, "1;2", &exists),
//!     Err(CliError::InvalidInteger { flag: "ids".into() })
//! );
//! ```

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{CliError, Result};
use crate::{FlagDefinition, FlagKind};

const INT_PATTERN: &str = "[0-9]+";
const FLOAT_PATTERN: &str = r"[0-9]{1,16}\.[0-9]{1,16}";

/// Returns the anchored pattern a value of `flag` must match, or `None` for
/// kinds that are not pattern-checked (string, path, bool).
///
/// # Examples
///
/// ```
/// use command_flags_core::{FlagDefinition, Separator, value_pattern};
///
/// let flag = FlagDefinition::alphanumeric("tag", "").allow_underscore();
/// assert_eq!(value_pattern(&flag).as_deref(), Some("^[0-9a-zA-Z_]+$"));
///
/// let flag = FlagDefinition::int("ports", "").allow_many().separator(Separator::Colon);
/// assert_eq!(value_pattern(&flag).as_deref(), Some("^[0-9]+(?::[0-9]+)*$"));
///
/// assert_eq!(value_pattern(&FlagDefinition::string("name", "")), None);
/// ```
pub fn value_pattern(flag: &FlagDefinition) -> Option<String> {
    let mods = flag.modifiers();
    let item = match flag.kind() {
        FlagKind::Int => INT_PATTERN.to_string(),
        FlagKind::Float => FLOAT_PATTERN.to_string(),
        FlagKind::Alphanumeric => {
            let underscore = if mods.allow_underscore { "_" } else { "" };
            let dots = if mods.allow_dots { r"\." } else { "" };
            format!("[0-9a-zA-Z{underscore}{dots}]+")
        }
        FlagKind::String | FlagKind::PathFile | FlagKind::Bool => return None,
    };

    if mods.allow_many {
        let sep = regex::escape(&mods.separator.as_char().to_string());
        Some(format!("^{item}(?:{sep}{item})*$"))
    } else {
        Some(format!("^{item}$"))
    }
}

/// Validates the raw value of one flag.
///
/// `raw` is the extracted value (`""` when absent; `"true"`/`"false"` for
/// booleans). Checks run in this order and the first failure is returned:
///
/// 1. required string/path flags must be non-empty;
/// 2. a non-empty path flag with `must_exist` must satisfy `path_exists`;
/// 3. int, float and alphanumeric flags that are required or non-empty must
///    match [`value_pattern`].
///
/// # Errors
///
/// Returns the [`CliError`] variant matching the failed check.
pub fn validate_flag(
    flag: &FlagDefinition,
    raw: &str,
    path_exists: &dyn Fn(&Path) -> bool,
) -> Result<()> {
    let name = flag.name();
    let mods = flag.modifiers();

    match flag.kind() {
        FlagKind::Bool => Ok(()),
        FlagKind::String => {
            if mods.required && raw.is_empty() {
                return Err(CliError::MissingRequiredValue {
                    flag: name.to_string(),
                });
            }
            Ok(())
        }
        FlagKind::PathFile => {
            if mods.required && raw.is_empty() {
                return Err(CliError::MissingRequiredValue {
                    flag: name.to_string(),
                });
            }
            if mods.must_exist && !raw.is_empty() && !path_exists(Path::new(raw)) {
                return Err(CliError::FileNotFound {
                    flag: name.to_string(),
                    path: raw.to_string(),
                });
            }
            Ok(())
        }
        kind @ (FlagKind::Int | FlagKind::Float | FlagKind::Alphanumeric) => {
            if !mods.required && raw.is_empty() {
                return Ok(());
            }
            if matches_pattern(flag, raw) {
                return Ok(());
            }
            let flag = name.to_string();
            Err(match kind {
                FlagKind::Int => CliError::InvalidInteger { flag },
                FlagKind::Float => CliError::InvalidFloat { flag },
                _ => CliError::InvalidAlphanumeric { flag },
            })
        }
    }
}

fn matches_pattern(flag: &FlagDefinition, raw: &str) -> bool {
    let Some(pattern) = value_pattern(flag) else {
        return true;
    };
    match Regex::new(&pattern) {
        Ok(re) => {
            let matched = re.is_match(raw);
            debug!(flag = flag.name(), %pattern, matched, "checked flag value");
            matched
        }
        Err(e) => {
            warn!(flag = flag.name(), %pattern, "flag pattern failed to compile: {e}");
            false
        }
    }
}
