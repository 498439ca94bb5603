//! Token extraction and the per-command parse pipeline.
//!
//! Raw tokens are split into flags with a clap `Command` built on the fly
//! from the command's flag definitions, then every flag is validated in
//! registration order. The first failure aborts the parse.

use std::collections::BTreeMap;
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, ColorChoice};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};
use crate::validate::validate_flag;
use crate::{CommandDefinition, FlagDefinition, FlagKind};

/// Id of the hidden catch-all positional argument. Starts with `-`, which
/// [`FlagDefinition::has_usable_name`] rejects, so no registered flag shares it.
const TRAILING_ARGS: &str = "-args";

/// Validated flag values keyed by flag name.
///
/// Every registered flag has an entry after a successful parse: the raw
/// string for valued flags (`""` when absent) and `"true"`/`"false"` for
/// booleans.
///
/// # Examples
///
/// ```
/// use command_flags_core::FlagValues;
///
/// let values = FlagValues::default();
/// assert_eq!(values.get("missing"), "");
/// assert!(values.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagValues(BTreeMap<String, String>);

impl FlagValues {
    /// Returns the value of `name`, or `""` if it has none.
    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn insert(&mut self, name: &str, value: String) {
        self.0.insert(name.to_string(), value);
    }
}

/// Result of a successful parse of one command's tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFlags {
    pub flags: FlagValues,
    /// Positional tokens that were not consumed as flags or flag values.
    pub args: Vec<String>,
}

/// Extracts and validates the flags of `cmd` from `tokens` (the arguments
/// after the command name).
///
/// Valued flags accept `--name value` and `--name=value`; boolean flags
/// accept `--name`, `--name=true` and `--name=false`. A repeated flag keeps
/// its last value.
///
/// # Errors
///
/// Returns [`CliError::InvalidFlagName`] if a registered flag cannot be
/// spelled as `--name`, [`CliError::InvalidSyntax`] if the tokens cannot be
/// split into the command's flags, otherwise the first validation error in
/// registration order.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use command_flags_core::*;
///
/// let cmd = CommandDefinition::new("tag", "Tag a build", |_| 0)
///     .with_flag(FlagDefinition::alphanumeric("name", "Tag name").required())
///     .with_flag(FlagDefinition::boolean("force", "Move existing tag"));
///
/// let parsed = parse_flags(&cmd, &["--name=v2", "--force"], &|_: &Path| true).unwrap();
/// assert_eq!(parsed.flags.get("name"), "v2");
/// assert_eq!(parsed.flags.get("force"), "true");
///
/// let err = parse_flags(&cmd, &["--force"], &|_: &Path| true).unwrap_err();
/// assert_eq!(err, CliError::InvalidAlphanumeric { flag: "name".into() });
/// ```
pub fn parse_flags<S: AsRef<str>>(
    cmd: &CommandDefinition,
    tokens: &[S],
    path_exists: &dyn Fn(&Path) -> bool,
) -> Result<ParsedFlags> {
    if let Some(flag) = cmd.flags().find(|f| !f.has_usable_name()) {
        return Err(CliError::InvalidFlagName {
            flag: flag.name().to_string(),
        });
    }

    let matches = flag_set(cmd)
        .try_get_matches_from(tokens.iter().map(|t| t.as_ref().to_string()))
        .map_err(|e| CliError::InvalidSyntax(syntax_message(&e)))?;

    let mut parsed = ParsedFlags {
        args: matches
            .get_many::<String>(TRAILING_ARGS)
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        ..Default::default()
    };

    for flag in cmd.flags() {
        let raw = raw_value(&matches, flag);
        debug!(command = cmd.name(), flag = flag.name(), value = %raw, "validating flag");
        validate_flag(flag, &raw, path_exists)?;
        parsed.flags.insert(flag.name(), raw);
    }

    Ok(parsed)
}

fn flag_set(cmd: &CommandDefinition) -> clap::Command {
    let catch_all = Arg::new(TRAILING_ARGS)
        .num_args(1..)
        .action(ArgAction::Append)
        .hide(true);

    cmd.flags().fold(
        clap::Command::new(cmd.name().to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .color(ColorChoice::Never)
            .arg(catch_all),
        |set, flag| set.arg(flag_arg(flag)),
    )
}

fn flag_arg(flag: &FlagDefinition) -> Arg {
    let arg = Arg::new(flag.name().to_string())
        .long(flag.name().to_string())
        .overrides_with(flag.name().to_string())
        .help(flag.description().to_string());

    match flag.kind() {
        FlagKind::Bool => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .value_parser(clap::value_parser!(bool)),
        _ => arg.action(ArgAction::Set).allow_hyphen_values(true),
    }
}

fn raw_value(matches: &ArgMatches, flag: &FlagDefinition) -> String {
    match flag.kind() {
        FlagKind::Bool => matches
            .get_one::<bool>(flag.name())
            .copied()
            .unwrap_or(false)
            .to_string(),
        _ => matches
            .get_one::<String>(flag.name())
            .cloned()
            .unwrap_or_default(),
    }
}

/// First line of clap's rendered error without its `error: ` prefix.
fn syntax_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim().to_string()
}
