//! Command definitions and the handler context.

use std::fmt;
use std::io::Write;

use crate::{Application, FlagDefinition, FlagValues};

/// Boxed command handler. Receives the invocation [`Context`] and returns
/// the process exit code.
pub type Handler = Box<dyn Fn(&mut Context<'_>) -> i32>;

/// A named command with its flags and handler.
///
/// Flags keep their registration order, which is the order they are
/// validated in and listed in usage text. Adding a flag whose name is
/// already registered replaces the old definition in place.
///
/// # Examples
///
/// ```
/// use command_flags_core::{CommandDefinition, FlagDefinition};
///
/// let mut cmd = CommandDefinition::new("serve", "Start the server", |_| 0);
/// cmd.add_flag(FlagDefinition::int("port", "Port").required())
///     .add_flag(FlagDefinition::boolean("verbose", "Verbose output"));
///
/// assert_eq!(cmd.flag_names(), vec!["port", "verbose"]);
/// assert_eq!(cmd.flags_usage(), " --port=<int> [--verbose]");
/// assert!(cmd.flag("host").is_none());
/// ```
pub struct CommandDefinition {
    name: String,
    description: String,
    flags: Vec<FlagDefinition>,
    handler: Handler,
}

impl CommandDefinition {
    /// Creates a command with no flags.
    pub fn new<F>(name: &str, description: &str, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>) -> i32 + 'static,
    {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            flags: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Registers a flag; last write wins on duplicate names.
    pub fn add_flag(&mut self, flag: FlagDefinition) -> &mut Self {
        match self.flags.iter_mut().find(|f| f.name() == flag.name()) {
            Some(existing) => *existing = flag,
            None => self.flags.push(flag),
        }
        self
    }

    /// Consuming variant of [`add_flag`](Self::add_flag).
    pub fn with_flag(mut self, flag: FlagDefinition) -> Self {
        self.add_flag(flag);
        self
    }

    /// Registered flag names in registration order.
    pub fn flag_names(&self) -> Vec<&str> {
        self.flags.iter().map(FlagDefinition::name).collect()
    }

    /// Looks up a flag by name.
    pub fn flag(&self, name: &str) -> Option<&FlagDefinition> {
        self.flags.iter().find(|f| f.name() == name)
    }

    /// Iterates over flag definitions in registration order.
    pub fn flags(&self) -> impl Iterator<Item = &FlagDefinition> {
        self.flags.iter()
    }

    /// One-line flag summary for usage text, each fragment prefixed by a
    /// space.
    pub fn flags_usage(&self) -> String {
        self.flags
            .iter()
            .map(|f| format!(" {}", f.usage_fragment()))
            .collect()
    }

    /// Invokes the handler and returns its exit code unchanged.
    pub fn run(&self, ctx: &mut Context<'_>) -> i32 {
        (self.handler)(ctx)
    }
}

impl fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// What a handler sees while it runs: the owning application (metadata and
/// validated flags) and the two output sinks.
pub struct Context<'a> {
    app: &'a Application,
    stdout: &'a mut dyn Write,
    stderr: &'a mut dyn Write,
}

impl<'a> Context<'a> {
    pub fn new(app: &'a Application, stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self {
            app,
            stdout,
            stderr,
        }
    }

    pub fn app(&self) -> &'a Application {
        self.app
    }

    /// Validated value of a flag, `""` if it was not parsed.
    pub fn flag(&self, name: &str) -> &'a str {
        self.app.flag(name)
    }

    pub fn flags(&self) -> &'a FlagValues {
        self.app.flags()
    }

    /// Positional tokens left over after flag parsing.
    pub fn args(&self) -> &'a [String] {
        self.app.args()
    }

    pub fn stdout(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.stdout
    }

    pub fn stderr(&mut self) -> &mut (dyn Write + 'a) {
        &mut *self.stderr
    }
}
