//! Application registry, dispatch and usage rendering.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};

use crate::command::{CommandDefinition, Context};
use crate::error::{CliError, Result};
use crate::parse::{FlagValues, parse_flags};

/// Exit code returned when no command could be dispatched.
pub const EXIT_FAILURE: i32 = 1;

type PathCheck = Box<dyn Fn(&Path) -> bool>;

/// A resolved and validated invocation, produced by
/// [`Application::try_parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name of the matched command.
    pub command: String,
    pub flags: FlagValues,
    pub args: Vec<String>,
}

/// A command-line application: display metadata plus its registered
/// commands.
///
/// Commands are attached before [`run`](Self::run). Each run resolves the
/// command named by the first positional argument, validates its flags and
/// invokes the handler. The validated values stay readable through
/// [`flag`](Self::flag) until the next run.
///
/// # Examples
///
/// ```
/// use command_flags_core::{Application, FlagDefinition};
///
/// let mut app = Application::new("greeter", "Says hello", "Jane Doe");
/// app.add_cmd("hello", "Greet someone", |ctx| {
///     let name = ctx.flag("name").to_string();
///     match writeln!(ctx.stdout(), "Hello, {name}!") {
///         Ok(()) => 0,
///         Err(_) => 1,
///     }
/// })
/// .add_flag(FlagDefinition::string("name", "Who to greet").required());
///
/// let mut out = Vec::new();
/// let mut err = Vec::new();
/// let code = app.run(["greeter", "hello", "--name=World"], &mut out, &mut err);
///
/// assert_eq!(code, 0);
/// assert_eq!(String::from_utf8(out).unwrap(), "Hello, World!\n");
/// assert_eq!(app.flag("name"), "World");
/// ```
pub struct Application {
    name: String,
    description: String,
    author: String,
    cmds: BTreeMap<String, CommandDefinition>,
    parsed_flags: FlagValues,
    args: Vec<String>,
    path_exists: PathCheck,
}

impl Application {
    /// Creates an application with no commands. The metadata is only used in
    /// usage text.
    pub fn new(name: &str, description: &str, author: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            author: author.to_string(),
            cmds: BTreeMap::new(),
            parsed_flags: FlagValues::default(),
            args: Vec::new(),
            path_exists: Box::new(|path: &Path| path.exists()),
        }
    }

    /// Replaces the predicate used to check `must_exist` path flags
    /// (defaults to [`Path::exists`]).
    pub fn with_path_check<F>(mut self, path_exists: F) -> Self
    where
        F: Fn(&Path) -> bool + 'static,
    {
        self.path_exists = Box::new(path_exists);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Creates a command, attaches it and returns it for flag registration.
    pub fn add_cmd<F>(&mut self, name: &str, description: &str, handler: F) -> &mut CommandDefinition
    where
        F: Fn(&mut Context<'_>) -> i32 + 'static,
    {
        let cmd = CommandDefinition::new(name, description, handler);
        match self.cmds.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                debug!(app = %self.name, command = name, "replaced previously attached command");
                entry.insert(cmd);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(cmd),
        }
    }

    /// Attaches a pre-built command, replacing any command of the same name.
    pub fn attach_cmd(&mut self, cmd: CommandDefinition) {
        if self.cmds.insert(cmd.name().to_string(), cmd).is_some() {
            debug!(app = %self.name, "replaced previously attached command");
        }
    }

    pub fn cmd(&self, name: &str) -> Option<&CommandDefinition> {
        self.cmds.get(name)
    }

    pub fn cmd_mut(&mut self, name: &str) -> Option<&mut CommandDefinition> {
        self.cmds.get_mut(name)
    }

    /// Names of all registered commands. Callers must not rely on the order.
    pub fn cmd_names(&self) -> Vec<&str> {
        self.cmds.keys().map(String::as_str).collect()
    }

    pub fn cmds(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.cmds.values()
    }

    /// Value of `name` from the last run, `""` if absent or not yet parsed.
    pub fn flag(&self, name: &str) -> &str {
        self.parsed_flags.get(name)
    }

    pub fn flags(&self) -> &FlagValues {
        &self.parsed_flags
    }

    /// Positional tokens left over after flag parsing in the last run.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Renders the usage text: a banner followed by one line per command.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_flags_core::{Application, FlagDefinition};
    ///
    /// let mut app = Application::new("tool", "Does things", "ACME");
    /// app.add_cmd("sync", "Sync data", |_| 0)
    ///     .add_flag(FlagDefinition::path("dir", "Directory").required());
    ///
    /// assert_eq!(
    ///     app.usage("tool"),
    ///     "tool by ACME\nDoes things\n\nAvailable commands:\ntool sync --dir=<path>\n"
    /// );
    /// ```
    pub fn usage(&self, program: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} by {}\n{}\n\n", self.name, self.author, self.description));
        out.push_str("Available commands:\n");
        for cmd in self.cmds.values() {
            out.push_str(&format!("{program} {}{}\n", cmd.name(), cmd.flags_usage()));
        }
        out
    }

    /// Writes [`usage`](Self::usage) to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from the sink.
    pub fn write_usage(&self, out: &mut dyn Write, program: &str) -> io::Result<()> {
        out.write_all(self.usage(program).as_bytes())
    }

    /// Resolves the command named by `args[1]` and validates the remaining
    /// tokens against its flags, without running the handler or touching the
    /// application state.
    ///
    /// `args[0]` is the program path.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::NoCommandGiven`], [`CliError::UnknownCommand`] or
    /// the first flag error.
    pub fn try_parse<S: AsRef<str>>(&self, args: &[S]) -> Result<Invocation> {
        let Some(name): Option<&str> = args.get(1).map(|arg| arg.as_ref()) else {
            return Err(CliError::NoCommandGiven);
        };
        let cmd = self
            .cmds
            .get(name)
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;
        debug!(app = %self.name, command = name, "resolved command");

        let tokens = args.get(2..).unwrap_or_default();
        let parsed = parse_flags(cmd, tokens, &*self.path_exists)?;

        Ok(Invocation {
            command: name.to_string(),
            flags: parsed.flags,
            args: parsed.args,
        })
    }

    /// Parses `args`, validates them and runs the matched command's handler.
    ///
    /// `args[0]` is the program path and `args[1]` the command name. Returns
    /// the handler's exit code, or [`EXIT_FAILURE`] after printing a
    /// diagnostic to `stderr` and the usage text to `stdout` when no command
    /// was given, the command is unknown, or a flag is invalid.
    pub fn run<I, S>(&mut self, args: I, stdout: &mut dyn Write, stderr: &mut dyn Write) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let program = program_name(args.as_slice(), &self.name);

        self.parsed_flags = FlagValues::default();
        self.args.clear();

        let invocation = match self.try_parse(args.as_slice()) {
            Ok(invocation) => invocation,
            Err(err) => return self.fail(&err, &program, stdout, stderr),
        };
        self.parsed_flags = invocation.flags;
        self.args = invocation.args;

        let Some(cmd) = self.cmds.get(&invocation.command) else {
            let err = CliError::UnknownCommand(invocation.command);
            return self.fail(&err, &program, stdout, stderr);
        };
        let mut ctx = Context::new(self, stdout, stderr);
        let code = cmd.run(&mut ctx);
        debug!(command = cmd.name(), code, "handler finished");
        code
    }

    fn fail(
        &self,
        err: &CliError,
        program: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> i32 {
        debug!(
            app = %self.name,
            flag = err.flag().unwrap_or("-"),
            "invocation rejected: {err}"
        );
        if !matches!(err, CliError::NoCommandGiven) {
            if let Err(e) = write!(stderr, "ERROR: {err}\n\n") {
                warn!("failed to write diagnostic: {e}");
            }
        }
        if let Err(e) = self.write_usage(stdout, program) {
            warn!("failed to write usage: {e}");
        }
        EXIT_FAILURE
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("author", &self.author)
            .field("cmds", &self.cmds)
            .field("parsed_flags", &self.parsed_flags)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Base name of `args[0]`, falling back to `fallback` when it is missing or
/// not valid UTF-8.
///
/// # Examples
///
/// ```
/// use command_flags_core::program_name;
///
/// assert_eq!(program_name(&["/usr/local/bin/tool", "run"], "app"), "tool");
/// assert_eq!(program_name::<&str>(&[], "app"), "app");
/// ```
pub fn program_name<S: AsRef<str>>(args: &[S], fallback: &str) -> String {
    args.first()
        .and_then(|arg0| Path::new(arg0.as_ref()).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use crate::FlagDefinition;

    use super::*;

    fn app() -> Application {
        let mut app = Application::new("demo", "Demo app", "Tester");
        app.add_cmd("echo", "Echo a value", |ctx| {
            let value = ctx.flag("value").to_string();
            let _ = write!(ctx.stdout(), "{value}");
            0
        })
        .add_flag(FlagDefinition::string("value", "Value").required());
        app
    }

    #[test]
    fn test_add_cmd_returns_attached_command() {
        let mut app = Application::new("demo", "Demo app", "Tester");
        app.add_cmd("one", "First", |_| 0)
            .add_flag(FlagDefinition::boolean("x", "X"));

        assert_eq!(app.cmd("one").unwrap().flag_names(), vec!["x"]);
        assert!(app.cmd("two").is_none());
    }

    #[test]
    fn test_attach_cmd_overwrites() {
        let mut app = app();
        app.attach_cmd(CommandDefinition::new("echo", "Replaced", |_| 3));

        assert_eq!(app.cmd_names(), vec!["echo"]);
        assert_eq!(app.cmd("echo").unwrap().description(), "Replaced");

        let (mut out, mut err) = (Vec::new(), Vec::new());
        assert_eq!(app.run(["demo", "echo"], &mut out, &mut err), 3);
    }

    #[test]
    fn test_cmd_mut_allows_late_flags() {
        let mut app = app();
        app.cmd_mut("echo")
            .unwrap()
            .add_flag(FlagDefinition::boolean("loud", "Shout"));

        let invocation = app.try_parse(&["demo", "echo", "--value=a", "--loud"]).unwrap();
        assert_eq!(invocation.flags.get("loud"), "true");
    }

    #[test]
    fn test_try_parse_does_not_touch_state() {
        let app = app();
        let invocation = app.try_parse(&["demo", "echo", "--value", "hi", "rest"]).unwrap();

        assert_eq!(invocation.command, "echo");
        assert_eq!(invocation.flags.get("value"), "hi");
        assert_eq!(invocation.args, vec!["rest".to_string()]);
        assert_eq!(app.flag("value"), "");
    }

    #[test]
    fn test_try_parse_errors() {
        let app = app();

        assert_eq!(app.try_parse(&["demo"]), Err(CliError::NoCommandGiven));
        assert_eq!(
            app.try_parse(&["demo", "nope"]),
            Err(CliError::UnknownCommand("nope".to_string()))
        );
    }

    #[test]
    fn test_run_resets_flags_between_runs() {
        let mut app = app();
        let (mut out, mut err) = (Vec::new(), Vec::new());

        assert_eq!(app.run(["demo", "echo", "--value=first"], &mut out, &mut err), 0);
        assert_eq!(app.flag("value"), "first");

        assert_eq!(app.run(["demo", "echo"], &mut out, &mut err), EXIT_FAILURE);
        assert_eq!(app.flag("value"), "");
        assert!(app.flags().is_empty());
    }

    #[test]
    fn test_usage_uses_program_base_name() {
        let mut app = app();
        let (mut out, mut err) = (Vec::new(), Vec::new());

        assert_eq!(app.run(["/opt/bin/demo-cli"], &mut out, &mut err), EXIT_FAILURE);

        let usage = String::from_utf8(out).unwrap();
        assert!(usage.contains("demo-cli echo --value=<string>\n"));
        assert!(err.is_empty());
    }
}
