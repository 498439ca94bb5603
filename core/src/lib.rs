//! Typed, validated sub-command flags for small command-line applications.
//!
//! A host program builds an [`Application`], registers named commands with
//! their flags and hands the raw process arguments to [`Application::run`],
//! which resolves the command, validates the flags and dispatches to the
//! command's handler:
//!
//! - [`FlagDefinition`]: one `--name` flag, made of a base [`FlagKind`] plus
//!   independent [`FlagModifiers`] (required, must-exist, multi-value with a
//!   [`Separator`], extra alphanumeric characters).
//! - [`CommandDefinition`]: a named command holding ordered flags and a
//!   handler that receives a [`Context`].
//! - [`Application`]: the registry holding metadata, commands, the last validated
//!   [`FlagValues`] and the usage renderer.
//!
//! Validation ([`validate_flag`], [`value_pattern`]) is purely syntactic and
//! fails fast on the first invalid flag with a [`CliError`]. Multi-value
//! flags are checked as a whole and handed to handlers as the raw delimited
//! string.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use command_flags_core::*;
//!
//! let mut app = Application::new("imgtool", "Image utilities", "ACME")
//!     .with_path_check(|path: &Path| path == Path::new("cat.png"));
//! app.add_cmd("resize", "Resize an image", |ctx| {
//!     assert_eq!(ctx.flag("sizes"), "64,128");
//!     0
//! })
//! .add_flag(FlagDefinition::path("input", "Source image").required().must_exist())
//! .add_flag(FlagDefinition::int("sizes", "Target sizes").allow_many());
//!
//! let (mut out, mut err) = (Vec::new(), Vec::new());
//! let ok = app.run(
//!     ["imgtool", "resize", "--input=cat.png", "--sizes=64,128"],
//!     &mut out,
//!     &mut err,
//! );
//! assert_eq!(ok, 0);
//!
//! let failed = app.run(["imgtool", "resize", "--input=dog.png"], &mut out, &mut err);
//! assert_eq!(failed, EXIT_FAILURE);
//! assert!(String::from_utf8_lossy(&err).contains("File dog.png from --input does not exist!"));
//! ```

mod app;
mod command;
mod error;
mod parse;
mod types;
mod validate;

pub use app::{Application, EXIT_FAILURE, Invocation, program_name};
pub use command::{CommandDefinition, Context, Handler};
pub use error::CliError;
pub use parse::{FlagValues, ParsedFlags, parse_flags};
pub use types::*;
pub use validate::{validate_flag, value_pattern};
