//! Flag type definitions.
//!
//! A flag is described by a name, a description, exactly one base
//! [`FlagKind`] and a set of independent [`FlagModifiers`]. Definitions are
//! plain data: nothing is checked when they are built, the modifiers only
//! take effect when the parser validates a value against them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Base type of a flag.
///
/// The kind selects how the raw value is extracted and which validation rule
/// applies to it.
///
/// # Examples
///
/// ```
/// use command_flags_core::FlagKind;
///
/// assert_eq!(FlagKind::default(), FlagKind::String);
/// assert!(FlagKind::Int.takes_value());
/// assert!(!FlagKind::Bool.takes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FlagKind {
    /// Free-form string (the default).
    #[default]
    String,
    /// Path to a file, optionally checked for existence.
    PathFile,
    /// Unsigned integer, digits only.
    Int,
    /// Decimal number with a mandatory fractional part.
    Float,
    /// Letters and digits, optionally with `_` and `.`.
    Alphanumeric,
    /// Switch without a value.
    Bool,
}

impl FlagKind {
    /// Returns `true` for every kind except [`FlagKind::Bool`].
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::Bool)
    }

    /// Placeholder used for the value in usage text.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::PathFile => "path",
            Self::Int => "int",
            Self::Float => "float",
            Self::Alphanumeric => "alnum",
            Self::Bool => "bool",
        }
    }
}

/// Separator between the items of a multi-value flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Separator {
    /// `,` (the default).
    #[default]
    Comma,
    /// `:`
    Colon,
    /// `;`
    SemiColon,
}

impl Separator {
    /// Returns the separator character.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_flags_core::Separator;
    ///
    /// assert_eq!(Separator::default().as_char(), ',');
    /// assert_eq!(Separator::SemiColon.as_char(), ';');
    /// ```
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Colon => ':',
            Self::SemiColon => ';',
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Independent modifiers combinable with any [`FlagKind`].
///
/// Modifiers that do not apply to a kind are ignored by the parser, e.g.
/// `must_exist` only matters for [`FlagKind::PathFile`] and `required` never
/// applies to [`FlagKind::Bool`].
///
/// # Examples
///
/// ```
/// use command_flags_core::{FlagModifiers, Separator};
///
/// let mods = FlagModifiers {
///     allow_many: true,
///     separator: Separator::Colon,
///     ..Default::default()
/// };
/// assert!(!mods.required);
/// assert_eq!(mods.separator.as_char(), ':');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagModifiers {
    /// A value must be supplied.
    pub required: bool,
    /// The path must exist (path flags only).
    pub must_exist: bool,
    /// The value is a separator-delimited list.
    pub allow_many: bool,
    /// Separator used when `allow_many` is set.
    pub separator: Separator,
    /// Alphanumeric values may contain `_`.
    pub allow_underscore: bool,
    /// Alphanumeric values may contain `.`.
    pub allow_dots: bool,
}

/// Definition of a single command flag, used on the command line as
/// `--name`.
///
/// Use the kind-specific constructors and chain modifier builders before
/// handing the definition to a
/// [`CommandDefinition`](crate::CommandDefinition).
///
/// # Examples
///
/// ```
/// use command_flags_core::{FlagDefinition, FlagKind, Separator};
///
/// let ports = FlagDefinition::int("ports", "Ports to listen on")
///     .required()
///     .allow_many()
///     .separator(Separator::Colon);
///
/// assert_eq!(ports.name(), "ports");
/// assert_eq!(ports.kind(), FlagKind::Int);
/// assert!(ports.modifiers().required);
/// assert_eq!(ports.usage_fragment(), "--ports=<int[:int...]>");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDefinition {
    name: String,
    description: String,
    kind: FlagKind,
    #[serde(default)]
    modifiers: FlagModifiers,
}

impl FlagDefinition {
    /// Creates a flag of the given kind with no modifiers.
    pub fn new(name: &str, description: &str, kind: FlagKind) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind,
            modifiers: FlagModifiers::default(),
        }
    }

    /// Creates a [`FlagKind::String`] flag.
    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, description, FlagKind::String)
    }

    /// Creates a [`FlagKind::PathFile`] flag.
    pub fn path(name: &str, description: &str) -> Self {
        Self::new(name, description, FlagKind::PathFile)
    }

    /// Creates a [`FlagKind::Int`] flag.
    pub fn int(name: &str, description: &str) -> Self {
        Self::new(name, description, FlagKind::Int)
    }

    /// Creates a [`FlagKind::Float`] flag.
    pub fn float(name: &str, description: &str) -> Self {
        Self::new(name, description, FlagKind::Float)
    }

    /// Creates a [`FlagKind::Alphanumeric`] flag.
    pub fn alphanumeric(name: &str, description: &str) -> Self {
        Self::new(name, description, FlagKind::Alphanumeric)
    }

    /// Creates a [`FlagKind::Bool`] flag.
    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, description, FlagKind::Bool)
    }

    /// Marks the flag as requiring a value.
    pub fn required(mut self) -> Self {
        self.modifiers.required = true;
        self
    }

    /// Requires the given path to exist.
    pub fn must_exist(mut self) -> Self {
        self.modifiers.must_exist = true;
        self
    }

    /// Accepts a separator-delimited list of values.
    pub fn allow_many(mut self) -> Self {
        self.modifiers.allow_many = true;
        self
    }

    /// Sets the list separator.
    pub fn separator(mut self, separator: Separator) -> Self {
        self.modifiers.separator = separator;
        self
    }

    /// Allows `_` in alphanumeric values.
    pub fn allow_underscore(mut self) -> Self {
        self.modifiers.allow_underscore = true;
        self
    }

    /// Allows `.` in alphanumeric values.
    pub fn allow_dots(mut self) -> Self {
        self.modifiers.allow_dots = true;
        self
    }

    /// Replaces all modifiers at once.
    pub fn with_modifiers(mut self, modifiers: FlagModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> FlagKind {
        self.kind
    }

    pub fn modifiers(&self) -> &FlagModifiers {
        &self.modifiers
    }

    /// Returns `true` if the name can be spelled as `--name` on the command
    /// line: non-empty, no leading `-`, no `=` and no whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_flags_core::FlagDefinition;
    ///
    /// assert!(FlagDefinition::string("dry-run", "").has_usable_name());
    /// assert!(!FlagDefinition::string("-x", "").has_usable_name());
    /// assert!(!FlagDefinition::string("a=b", "").has_usable_name());
    /// ```
    pub fn has_usable_name(&self) -> bool {
        !self.name.is_empty()
            && !self.name.starts_with('-')
            && !self.name.contains(|c: char| c == '=' || c.is_whitespace())
    }

    /// Returns `true` if an empty value is an error for this flag.
    ///
    /// Booleans always have a value, so they are never required.
    pub fn is_required(&self) -> bool {
        self.modifiers.required && self.kind.takes_value()
    }

    /// Renders this flag's part of a command usage line.
    ///
    /// Optional flags are wrapped in brackets, valued flags show their type
    /// and multi-value flags show the separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_flags_core::FlagDefinition;
    ///
    /// assert_eq!(FlagDefinition::boolean("verbose", "").usage_fragment(), "[--verbose]");
    /// assert_eq!(FlagDefinition::string("name", "").usage_fragment(), "[--name=<string>]");
    /// assert_eq!(
    ///     FlagDefinition::path("input", "").required().usage_fragment(),
    ///     "--input=<path>"
    /// );
    /// ```
    pub fn usage_fragment(&self) -> String {
        if !self.kind.takes_value() {
            return format!("[--{}]", self.name);
        }

        let placeholder = self.kind.placeholder();
        let value = if self.modifiers.allow_many {
            format!("<{placeholder}[{}{placeholder}...]>", self.modifiers.separator)
        } else {
            format!("<{placeholder}>")
        };

        if self.is_required() {
            format!("--{}={value}", self.name)
        } else {
            format!("[--{}={value}]", self.name)
        }
    }
}
