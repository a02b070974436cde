//! Declaration tree types.
//!
//! A declaration tree describes every argument and subcommand a command-line
//! program accepts, before any actual input is parsed. The converter only
//! reads these values; they are produced by an argument library adapter or
//! deserialized from JSON/YAML.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{FileConstructor, SchemaType};

/// Default open mode for file-typed declarations.
pub const DEFAULT_FILE_MODE: &str = "r";

/// Buffer size meaning "use the platform default buffering".
pub const DEFAULT_FILE_BUFSIZE: i64 = -1;

/// File-open configuration attached to a file-typed declaration.
///
/// Every field has a default (read mode, unlimited buffering, platform
/// encoding, default error policy). Only fields that differ from those
/// defaults end up in the generated form entry.
///
/// # Examples
///
/// ```
/// use argform_core::FileSpec;
///
/// assert!(FileSpec::default().constructor().is_none());
///
/// let ctor = FileSpec::new("w").constructor().unwrap();
/// assert_eq!(ctor.mode.as_deref(), Some("w"));
/// assert!(ctor.bufsize.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSpec {
    /// Open mode (e.g. `"r"`, `"w"`, `"rb"`).
    pub mode: String,
    /// Buffer size, `-1` for the platform default.
    pub bufsize: i64,
    /// Text encoding, `None` for the platform default.
    pub encoding: Option<String>,
    /// Encoding error policy, `None` for the default policy.
    pub errors: Option<String>,
}

impl Default for FileSpec {
    fn default() -> Self {
        Self {
            mode: DEFAULT_FILE_MODE.to_string(),
            bufsize: DEFAULT_FILE_BUFSIZE,
            encoding: None,
            errors: None,
        }
    }
}

impl FileSpec {
    /// Creates a file spec with the given open mode and default settings.
    pub fn new(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            ..Default::default()
        }
    }

    /// Sets the buffer size.
    pub fn with_bufsize(mut self, bufsize: i64) -> Self {
        self.bufsize = bufsize;
        self
    }

    /// Sets the text encoding.
    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = Some(encoding.to_string());
        self
    }

    /// Sets the encoding error policy.
    pub fn with_errors(mut self, errors: &str) -> Self {
        self.errors = Some(errors.to_string());
        self
    }

    /// Returns the non-default settings, or `None` when everything is default.
    pub fn constructor(&self) -> Option<FileConstructor> {
        let ctor = FileConstructor {
            mode: (self.mode != DEFAULT_FILE_MODE).then(|| self.mode.clone()),
            bufsize: (self.bufsize != DEFAULT_FILE_BUFSIZE).then_some(self.bufsize),
            encoding: self.encoding.clone(),
            errors: self.errors.clone(),
        };
        (!ctor.is_empty()).then_some(ctor)
    }
}

/// Declared conversion type of a value-taking declaration.
///
/// Only [`ValueType::Integer`] maps to an `integer` schema; every other type
/// (floats, booleans, custom converters, files) is rendered as `string`.
///
/// # Examples
///
/// ```
/// use argform_core::{FileSpec, SchemaType, ValueType};
///
/// assert_eq!(ValueType::Integer.schema_type(), SchemaType::Integer);
/// assert_eq!(ValueType::Float.schema_type(), SchemaType::String);
/// assert_eq!(ValueType::File(FileSpec::new("w")).schema_type(), SchemaType::String);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Plain string (the default).
    #[default]
    String,
    /// Integer.
    Integer,
    /// Floating point number.
    Float,
    /// Boolean parsed from a value.
    Bool,
    /// File opened with the given configuration.
    File(FileSpec),
    /// Any other user-supplied converter, identified by name.
    Custom(String),
}

impl ValueType {
    /// Scalar schema type inferred from this conversion type.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            ValueType::Integer => SchemaType::Integer,
            _ => SchemaType::String,
        }
    }

    /// Returns the file configuration when this is a file type.
    pub fn file_spec(&self) -> Option<&FileSpec> {
        match self {
            ValueType::File(spec) => Some(spec),
            _ => None,
        }
    }
}

/// A named group of nested parsers, selected by command name.
///
/// Commands keep their insertion order, which decides both the order of the
/// generated properties and the order of the selector items.
///
/// # Examples
///
/// ```
/// use argform_core::{ParserDecl, SubcommandGroup};
///
/// let group = SubcommandGroup::new()
///     .with_command("add", ParserDecl::new())
///     .with_command("remove", ParserDecl::new());
///
/// assert_eq!(group.command_names(), vec!["add", "remove"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubcommandGroup {
    /// Nested parsers keyed by command name.
    #[serde(default)]
    pub commands: IndexMap<String, ParserDecl>,
    /// Group-level help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl SubcommandGroup {
    /// Creates an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command. Re-adding a name replaces its parser in place.
    pub fn with_command(mut self, name: &str, parser: ParserDecl) -> Self {
        self.commands.insert(name.to_string(), parser);
        self
    }

    /// Sets the group-level help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Command names in insertion order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}

/// Kind of a declaration.
///
/// The converter handles the supported kinds and rejects the rest with
/// [`Error::UnsupportedDeclarationKind`](crate::Error::UnsupportedDeclarationKind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ArgKind {
    /// Implicit help/usage declaration. Never part of the output.
    Help,
    /// Stores a single value.
    Store {
        #[serde(default)]
        value_type: ValueType,
    },
    /// Stores a constant.
    StoreConst,
    /// Stores `true` when present.
    StoreTrue,
    /// Stores `false` when present.
    StoreFalse,
    /// Collects repeated values into a list.
    Append {
        #[serde(default)]
        value_type: ValueType,
    },
    /// Appends a constant on every occurrence.
    AppendConst,
    /// Nested parsers selected by command name.
    Subcommands(SubcommandGroup),
    /// Counts occurrences.
    Count,
    /// Prints a version string and exits.
    Version,
    /// Extends a list with every value of every occurrence.
    Extend {
        #[serde(default)]
        value_type: ValueType,
    },
    /// `--flag` / `--no-flag` pair.
    BooleanOptional,
    /// Any kind the declaring library defines beyond the ones above.
    Other { name: String },
}

impl ArgKind {
    /// Stable name of this kind, used in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            ArgKind::Help => "help",
            ArgKind::Store { .. } => "store",
            ArgKind::StoreConst => "store_const",
            ArgKind::StoreTrue => "store_true",
            ArgKind::StoreFalse => "store_false",
            ArgKind::Append { .. } => "append",
            ArgKind::AppendConst => "append_const",
            ArgKind::Subcommands(_) => "subcommands",
            ArgKind::Count => "count",
            ArgKind::Version => "version",
            ArgKind::Extend { .. } => "extend",
            ArgKind::BooleanOptional => "boolean_optional",
            ArgKind::Other { name } => name.as_str(),
        }
    }
}

/// A single argument declaration.
///
/// Use [`positional`](ArgDecl::positional) or [`option`](ArgDecl::option)
/// to create one, then chain builder methods.
///
/// # Examples
///
/// ```
/// use argform_core::{ArgDecl, ValueType};
///
/// let input = ArgDecl::positional("input").with_type(ValueType::Integer);
/// assert!(input.is_positional());
/// assert!(input.required);
///
/// let dry_run = ArgDecl::option(&["-n", "--dry-run"]).store_true();
/// assert_eq!(dry_run.dest, "dry_run");
/// assert!(!dry_run.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgDecl {
    /// Destination key the parsed value is stored under.
    pub dest: String,
    /// Flag-style identifiers; empty for positionals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_strings: Vec<String>,
    /// Whether the argument must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Display name for the value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metavar: Option<String>,
    /// Allowed values, in declared order. Values keep their JSON type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    /// Declaration kind.
    pub kind: ArgKind,
}

impl ArgDecl {
    /// Creates a required positional string declaration.
    pub fn positional(dest: &str) -> Self {
        Self {
            dest: dest.to_string(),
            option_strings: Vec::new(),
            required: true,
            help: None,
            metavar: None,
            choices: None,
            kind: ArgKind::Store {
                value_type: ValueType::String,
            },
        }
    }

    /// Creates an optional string declaration identified by flags.
    ///
    /// The destination key is derived from the first long flag, or the first
    /// flag when there is no long one: leading dashes are stripped and inner
    /// dashes become underscores.
    pub fn option(flags: &[&str]) -> Self {
        let option_strings: Vec<String> = flags.iter().map(|f| f.to_string()).collect();
        Self {
            dest: derive_dest(&option_strings),
            option_strings,
            required: false,
            help: None,
            metavar: None,
            choices: None,
            kind: ArgKind::Store {
                value_type: ValueType::String,
            },
        }
    }

    /// Creates the conventional `-h/--help` declaration.
    pub fn help() -> Self {
        Self::option(&["-h", "--help"])
            .with_kind(ArgKind::Help)
            .with_help("show this help message and exit")
    }

    /// Overrides the destination key.
    pub fn with_dest(mut self, dest: &str) -> Self {
        self.dest = dest.to_string();
        self
    }

    /// Sets the conversion type, keeping the store/append kind.
    ///
    /// Kinds that carry no value type are left untouched.
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        match &mut self.kind {
            ArgKind::Store { value_type: vt }
            | ArgKind::Append { value_type: vt }
            | ArgKind::Extend { value_type: vt } => *vt = value_type,
            _ => {}
        }
        self
    }

    /// Sets the allowed values.
    ///
    /// ```
    /// use argform_core::{ArgDecl, ValueType};
    ///
    /// let level = ArgDecl::positional("level")
    ///     .with_type(ValueType::Integer)
    ///     .with_choices(&[1, 2, 3]);
    /// assert_eq!(level.choices, Some(vec![1.into(), 2.into(), 3.into()]));
    /// ```
    pub fn with_choices<T>(mut self, choices: &[T]) -> Self
    where
        T: Clone + Into<Value>,
    {
        self.choices = Some(choices.iter().cloned().map(Into::into).collect());
        self
    }

    /// Sets the display name.
    pub fn with_metavar(mut self, metavar: &str) -> Self {
        self.metavar = Some(metavar.to_string());
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Marks the declaration as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the declaration as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Replaces the kind.
    pub fn with_kind(mut self, kind: ArgKind) -> Self {
        self.kind = kind;
        self
    }

    /// Turns this into a constant store.
    pub fn store_const(self) -> Self {
        self.with_kind(ArgKind::StoreConst)
    }

    /// Turns this into a `true` toggle.
    pub fn store_true(self) -> Self {
        self.with_kind(ArgKind::StoreTrue)
    }

    /// Turns this into a `false` toggle.
    pub fn store_false(self) -> Self {
        self.with_kind(ArgKind::StoreFalse)
    }

    /// Turns this into a repeated value, keeping the current value type.
    pub fn append(mut self) -> Self {
        let value_type = match &self.kind {
            ArgKind::Store { value_type } | ArgKind::Extend { value_type } => value_type.clone(),
            _ => ValueType::String,
        };
        self.kind = ArgKind::Append { value_type };
        self
    }

    /// Turns this into a repeated constant.
    pub fn append_const(self) -> Self {
        self.with_kind(ArgKind::AppendConst)
    }

    /// Returns `true` when the declaration has no flag-style identifier.
    pub fn is_positional(&self) -> bool {
        self.option_strings.is_empty()
    }
}

fn derive_dest(option_strings: &[String]) -> String {
    let chosen = option_strings
        .iter()
        .find(|s| s.starts_with("--"))
        .or_else(|| option_strings.first());
    match chosen {
        Some(flag) => flag.trim_start_matches('-').replace('-', "_"),
        None => String::new(),
    }
}

/// Root of a declaration tree.
///
/// [`ParserDecl::new`] seeds the conventional help declaration, just as an
/// argument library adds `-h/--help` to every parser; the converter skips it.
///
/// # Examples
///
/// ```
/// use argform_core::{ArgDecl, ParserDecl, SubcommandGroup};
///
/// let parser = ParserDecl::new()
///     .with_description("Example program")
///     .with_argument(ArgDecl::positional("input"))
///     .with_subcommands(
///         "command",
///         SubcommandGroup::new()
///             .with_command("run", ParserDecl::new().with_argument(ArgDecl::positional("script"))),
///     );
///
/// assert_eq!(
///     parser.dest_paths(),
///     vec![vec!["input"], vec!["run"], vec!["run", "script"]],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserDecl {
    /// Program or command name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prog: Option<String>,
    /// Help text describing the parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declarations in declared order.
    #[serde(default)]
    pub arguments: Vec<ArgDecl>,
}

impl Default for ParserDecl {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserDecl {
    /// Creates a parser carrying only the help declaration.
    pub fn new() -> Self {
        Self {
            arguments: vec![ArgDecl::help()],
            ..Self::bare()
        }
    }

    /// Creates a parser without any declaration.
    pub fn bare() -> Self {
        Self {
            prog: None,
            description: None,
            arguments: Vec::new(),
        }
    }

    /// Sets the program name.
    pub fn with_prog(mut self, prog: &str) -> Self {
        self.prog = Some(prog.to_string());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Appends a declaration.
    pub fn with_argument(mut self, arg: ArgDecl) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Appends a subcommand group stored under `dest`.
    pub fn with_subcommands(mut self, dest: &str, group: SubcommandGroup) -> Self {
        let help = group.help.clone();
        self.arguments.push(ArgDecl {
            dest: dest.to_string(),
            option_strings: Vec::new(),
            required: false,
            help,
            metavar: None,
            choices: None,
            kind: ArgKind::Subcommands(group),
        });
        self
    }

    /// Property paths this tree should produce once converted.
    ///
    /// Each value-carrying declaration contributes its destination key; each
    /// subcommand contributes its name followed by the paths of its own
    /// parser. Help declarations and subcommand group keys contribute nothing.
    pub fn dest_paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        collect_dest_paths(self, &mut Vec::new(), &mut paths);
        paths
    }
}

fn collect_dest_paths(parser: &ParserDecl, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for arg in &parser.arguments {
        match &arg.kind {
            ArgKind::Help => {}
            ArgKind::Subcommands(group) => {
                for (name, sub) in &group.commands {
                    prefix.push(name.clone());
                    out.push(prefix.clone());
                    collect_dest_paths(sub, prefix, out);
                    prefix.pop();
                }
            }
            _ => {
                let mut path = prefix.clone();
                path.push(arg.dest.clone());
                out.push(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_dest_prefers_long_flag() {
        assert_eq!(ArgDecl::option(&["-i", "--input-file"]).dest, "input_file");
        assert_eq!(ArgDecl::option(&["-v"]).dest, "v");
        assert_eq!(ArgDecl::option(&[]).dest, "");
    }

    #[test]
    fn test_with_type_keeps_kind() {
        let arg = ArgDecl::option(&["--n"]).append().with_type(ValueType::Integer);
        assert_eq!(
            arg.kind,
            ArgKind::Append {
                value_type: ValueType::Integer
            }
        );

        let flag = ArgDecl::option(&["--x"]).store_true().with_type(ValueType::Integer);
        assert_eq!(flag.kind, ArgKind::StoreTrue);
    }

    #[test]
    fn test_file_spec_constructor_only_non_defaults() {
        let spec = FileSpec::new("r").with_bufsize(0).with_encoding("utf-8");
        let ctor = spec.constructor().unwrap();
        assert_eq!(ctor.mode, None);
        assert_eq!(ctor.bufsize, Some(0));
        assert_eq!(ctor.encoding.as_deref(), Some("utf-8"));
        assert_eq!(ctor.errors, None);
    }

    #[test]
    fn test_parser_new_carries_help() {
        let parser = ParserDecl::new();
        assert_eq!(parser.arguments.len(), 1);
        assert_eq!(parser.arguments[0].kind, ArgKind::Help);
        assert!(ParserDecl::bare().arguments.is_empty());
    }

    #[test]
    fn test_declaration_tree_deserializes_from_json() {
        let json = r#"{
            "description": "demo",
            "arguments": [
                {"dest": "count", "kind": {"action": "store", "value_type": "integer"}},
                {"dest": "out", "kind": {"action": "store", "value_type": {"file": {"mode": "w"}}}},
                {"dest": "verbose", "option_strings": ["-v"], "kind": {"action": "store_true"}}
            ]
        }"#;
        let parser: ParserDecl = serde_json::from_str(json).unwrap();
        assert_eq!(parser.arguments.len(), 3);
        assert_eq!(parser.arguments[0].kind.name(), "store");
        assert_eq!(
            parser.arguments[1].kind,
            ArgKind::Store {
                value_type: ValueType::File(FileSpec::new("w"))
            }
        );
        assert!(!parser.arguments[2].is_positional());
    }
}
