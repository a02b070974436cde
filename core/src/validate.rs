//! Declaration tree linting.
//!
//! The converter trusts its input: structural validity of a declaration tree
//! is the declaring library's job. [`validate_parser`] is an opt-in check for
//! trees assembled by hand or deserialized from files, catching the problems
//! that would silently produce a lossy schema (colliding keys, empty groups)
//! before conversion.
//!
//! # Examples
//!
//! ```
//! use argform_core::*;
//!
//! let parser = ParserDecl::new().with_argument(ArgDecl::option(&["-v", "--verbose"]).store_true());
//! assert!(validate_parser(&parser).is_empty());
//!
//! // Invalid: short option missing its leading dash
//! let bad = ParserDecl::new().with_argument(ArgDecl::option(&["v"]).store_true());
//! assert!(!validate_parser(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::declaration::{ArgDecl, ArgKind, ParserDecl};

/// Declaration tree validation errors.
///
/// Paths are space-separated, starting at the parser's `prog` (or `<root>`)
/// and followed by subcommand names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A value-carrying declaration has a blank destination key.
    #[error("empty destination key at: {0}")]
    EmptyDest(String),
    /// Short option does not start with a single dash (e.g., `"v"` instead of `"-v"`).
    #[error("invalid short option format: {0}")]
    InvalidShortOption(String),
    /// Long option does not start with `--` or is too short.
    #[error("invalid long option format: {0}")]
    InvalidLongOption(String),
    /// Two declarations, or a declaration and a subcommand, share a key.
    #[error("duplicate property key: {0}")]
    DuplicateDest(String),
    /// A subcommand group declares no command.
    #[error("subcommand group without commands at: {0}")]
    EmptySubcommandGroup(String),
    /// A subcommand name is empty or whitespace-only.
    #[error("empty subcommand name at: {0}")]
    EmptySubcommandName(String),
}

/// Validates a declaration tree, stopping at the first problem found.
///
/// # Examples
///
/// ```
/// use argform_core::*;
///
/// // A subcommand named like a sibling declaration collides in `properties`.
/// let parser = ParserDecl::new()
///     .with_prog("tool")
///     .with_argument(ArgDecl::positional("run"))
///     .with_subcommands("command", SubcommandGroup::new().with_command("run", ParserDecl::new()));
///
/// assert_eq!(
///     validate_parser(&parser),
///     vec![ValidationError::DuplicateDest("tool run".to_string())],
/// );
/// ```
pub fn validate_parser(parser: &ParserDecl) -> Vec<ValidationError> {
    let root = parser.prog.clone().unwrap_or_else(|| "<root>".to_string());
    let mut path = vec![root];
    validate_scope(parser, &mut path)
}

fn validate_scope(parser: &ParserDecl, path: &mut Vec<String>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for arg in &parser.arguments {
        errors.extend(validate_option_strings(arg));
        if !errors.is_empty() {
            return errors;
        }

        match &arg.kind {
            ArgKind::Help => {}
            ArgKind::Subcommands(group) => {
                if group.commands.is_empty() {
                    errors.push(ValidationError::EmptySubcommandGroup(path.join(" ")));
                    return errors;
                }

                for (name, sub) in &group.commands {
                    if name.trim().is_empty() {
                        errors.push(ValidationError::EmptySubcommandName(path.join(" ")));
                        return errors;
                    }
                    if !seen.insert(name.as_str()) {
                        errors.push(ValidationError::DuplicateDest(join_key(path, name)));
                        return errors;
                    }

                    path.push(name.clone());
                    errors.extend(validate_scope(sub, path));
                    path.pop();
                    if !errors.is_empty() {
                        return errors;
                    }
                }
            }
            _ => {
                if arg.dest.trim().is_empty() {
                    errors.push(ValidationError::EmptyDest(path.join(" ")));
                    return errors;
                }
                if !seen.insert(arg.dest.as_str()) {
                    errors.push(ValidationError::DuplicateDest(join_key(path, &arg.dest)));
                    return errors;
                }
            }
        }
    }

    errors
}

fn validate_option_strings(arg: &ArgDecl) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for option in &arg.option_strings {
        if option.starts_with("--") {
            if option.len() < 3 {
                errors.push(ValidationError::InvalidLongOption(option.clone()));
                return errors;
            }
        } else if !option.starts_with('-') || option.len() < 2 {
            errors.push(ValidationError::InvalidShortOption(option.clone()));
            return errors;
        }
    }

    errors
}

fn join_key(path: &[String], key: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain(std::iter::once(key))
        .collect::<Vec<_>>()
        .join(" ")
}
