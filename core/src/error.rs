//! Error types for command resolution and flag validation.
//!
//! Every variant is a user-input error. [`Application::run`] turns them into
//! a printed diagnostic followed by the usage text and exit code `1`.
//!
//! [`Application::run`]: crate::Application::run

use thiserror::Error;

/// Errors produced while resolving a command or validating its flags.
///
/// The `Display` impl is the diagnostic printed after `ERROR: `.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// A required string or path flag was empty or absent.
    #[error("Flag --{flag} is missing!")]
    MissingRequiredValue { flag: String },

    /// A path flag marked `must_exist` points nowhere.
    #[error("File {path} from --{flag} does not exist!")]
    FileNotFound { flag: String, path: String },

    #[error("Flag --{flag} is not a valid integer!")]
    InvalidInteger { flag: String },

    #[error("Flag --{flag} is not a valid float!")]
    InvalidFloat { flag: String },

    #[error("Flag --{flag} is not a valid alphanumeric value!")]
    InvalidAlphanumeric { flag: String },

    /// A registered flag name cannot be used as `--name` (empty, leading
    /// `-`, contains `=` or whitespace).
    #[error("Flag name '{flag}' cannot be used as --{flag}!")]
    InvalidFlagName { flag: String },

    /// The first positional argument names no registered command.
    #[error("Command {0} is not available!")]
    UnknownCommand(String),

    /// No command name was given at all.
    #[error("No command given!")]
    NoCommandGiven,

    /// Tokens could not be split into flags (unknown flag, missing value,
    /// malformed boolean).
    #[error("{0}")]
    InvalidSyntax(String),
}

impl CliError {
    /// Name of the flag the error refers to, if any.
    pub fn flag(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredValue { flag }
            | Self::FileNotFound { flag, .. }
            | Self::InvalidInteger { flag }
            | Self::InvalidFloat { flag }
            | Self::InvalidAlphanumeric { flag }
            | Self::InvalidFlagName { flag } => Some(flag),
            Self::UnknownCommand(_) | Self::NoCommandGiven | Self::InvalidSyntax(_) => None,
        }
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
