//! Read [`clap`] command definitions into argform declaration trees.
//!
//! [`from_command`] walks a [`clap::Command`] (arguments first, then visible
//! subcommands) and builds the equivalent [`ParserDecl`]; [`convert_command`]
//! chains that with the schema converter.
//!
//! # Example
//!
//! ```
//! use clap::{Arg, ArgAction, Command, value_parser};
//!
//! let cmd = Command::new("resize")
//!     .about("Resize images")
//!     .arg(Arg::new("width").required(true).value_parser(value_parser!(u32)))
//!     .arg(Arg::new("verbose").short('v').long("verbose").action(ArgAction::SetTrue));
//!
//! let doc = argform_clap::convert_command(&cmd).unwrap();
//! assert_eq!(doc.description.as_deref(), Some("Resize images"));
//! assert_eq!(doc.required, vec!["width"]);
//! ```

use std::any::TypeId;

use argform_core::{
    ArgDecl, ArgKind, ParserDecl, Result, SchemaDocument, SubcommandGroup, ValueType, convert,
};
use clap::{Arg, ArgAction, Command};
use serde_json::Value;
use tracing::debug;

/// Destination key of the subcommand group when clap defines no value name.
pub const DEFAULT_SUBCOMMAND_DEST: &str = "command";

/// Builds a declaration tree from a clap command.
///
/// Hidden arguments and subcommands, version flags, and the generated `help`
/// subcommand are left out. Help flags are kept as help declarations, which
/// the converter skips.
pub fn from_command(cmd: &Command) -> ParserDecl {
    let mut parser = ParserDecl::bare().with_prog(cmd.get_name());
    parser.description = cmd.get_about().map(|about| about.to_string());

    for arg in cmd.get_arguments() {
        if arg.is_hide_set() {
            debug!(command = cmd.get_name(), arg = %arg.get_id(), "Skipping hidden argument");
            continue;
        }
        if matches!(arg.get_action(), ArgAction::Version) {
            debug!(command = cmd.get_name(), arg = %arg.get_id(), "Skipping version argument");
            continue;
        }
        parser.arguments.push(arg_decl(arg));
    }

    let mut group = SubcommandGroup::new();
    for sub in cmd.get_subcommands() {
        if sub.is_hide_set() || sub.get_name() == "help" {
            debug!(command = cmd.get_name(), subcommand = sub.get_name(), "Skipping subcommand");
            continue;
        }
        group = group.with_command(sub.get_name(), from_command(sub));
    }

    if !group.commands.is_empty() {
        let dest = cmd
            .get_subcommand_value_name()
            .unwrap_or(DEFAULT_SUBCOMMAND_DEST);
        parser = parser.with_subcommands(dest, group);
    }

    parser
}

/// Converts a clap command straight into a schema document.
pub fn convert_command(cmd: &Command) -> Result<SchemaDocument> {
    convert(&from_command(cmd))
}

fn arg_decl(arg: &Arg) -> ArgDecl {
    let mut option_strings = Vec::new();
    if let Some(short) = arg.get_short() {
        option_strings.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        option_strings.push(format!("--{long}"));
    }

    let kind = arg_kind(arg);
    let takes_values = matches!(kind, ArgKind::Store { .. } | ArgKind::Append { .. });

    let choices: Vec<Value> = if takes_values {
        arg.get_possible_values()
            .iter()
            .filter(|value| !value.is_hide_set())
            .map(|value| Value::String(value.get_name().to_string()))
            .collect()
    } else {
        Vec::new()
    };

    ArgDecl {
        dest: arg.get_id().as_str().to_string(),
        option_strings,
        required: arg.is_required_set(),
        help: arg.get_help().map(|help| help.to_string()),
        metavar: arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(|name| name.as_str().to_string()),
        choices: (!choices.is_empty()).then_some(choices),
        kind,
    }
}

fn arg_kind(arg: &Arg) -> ArgKind {
    match arg.get_action() {
        ArgAction::Set => ArgKind::Store {
            value_type: value_type(arg),
        },
        ArgAction::Append => ArgKind::Append {
            value_type: value_type(arg),
        },
        ArgAction::SetTrue => ArgKind::StoreTrue,
        ArgAction::SetFalse => ArgKind::StoreFalse,
        ArgAction::Count => ArgKind::Count,
        ArgAction::Help | ArgAction::HelpShort | ArgAction::HelpLong => ArgKind::Help,
        ArgAction::Version => ArgKind::Version,
        other => ArgKind::Other {
            name: format!("{other:?}"),
        },
    }
}

fn value_type(arg: &Arg) -> ValueType {
    let type_id = arg.get_value_parser().type_id();
    let is = |candidate: TypeId| type_id == candidate;

    let integers = [
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<usize>(),
    ];

    if integers.into_iter().any(is) {
        ValueType::Integer
    } else if is(TypeId::of::<f64>()) || is(TypeId::of::<f32>()) {
        ValueType::Float
    } else if is(TypeId::of::<bool>()) {
        ValueType::Bool
    } else {
        ValueType::String
    }
}

#[cfg(test)]
mod tests {
    use clap::value_parser;

    use super::*;

    #[test]
    fn test_value_type_from_parser() {
        let int = Arg::new("n").value_parser(value_parser!(i64));
        let uint = Arg::new("n").value_parser(value_parser!(u16));
        let float = Arg::new("n").value_parser(value_parser!(f64));
        let text = Arg::new("n");

        assert_eq!(value_type(&int), ValueType::Integer);
        assert_eq!(value_type(&uint), ValueType::Integer);
        assert_eq!(value_type(&float), ValueType::Float);
        assert_eq!(value_type(&text), ValueType::String);
    }

    #[test]
    fn test_arg_decl_option_strings() {
        let arg = Arg::new("output").short('o').long("output").help("Output path");
        let decl = arg_decl(&arg);

        assert_eq!(decl.dest, "output");
        assert_eq!(decl.option_strings, vec!["-o", "--output"]);
        assert_eq!(decl.help.as_deref(), Some("Output path"));
        assert!(!decl.required);
    }

    #[test]
    fn test_toggle_has_no_choices() {
        let arg = Arg::new("force").long("force").action(ArgAction::SetTrue);
        let decl = arg_decl(&arg);

        assert_eq!(decl.kind, ArgKind::StoreTrue);
        assert!(decl.choices.is_none());
    }

    #[test]
    fn test_possible_values_become_string_choices() {
        let arg = Arg::new("format")
            .long("format")
            .value_parser(["tar", "zip"]);
        let decl = arg_decl(&arg);

        assert_eq!(
            decl.choices,
            Some(vec![Value::from("tar"), Value::from("zip")])
        );
    }

    #[test]
    fn test_help_and_count_actions() {
        let help = Arg::new("help").long("help").action(ArgAction::Help);
        let count = Arg::new("verbose").short('v').action(ArgAction::Count);

        assert_eq!(arg_kind(&help), ArgKind::Help);
        assert_eq!(arg_kind(&count), ArgKind::Count);
    }
}
