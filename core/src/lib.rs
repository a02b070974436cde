//! Argument declaration trees to JSON schemas and UI forms.
//!
//! This crate converts a declarative description of a command-line
//! interface into a JSON-Schema-like document plus a form description that a
//! UI renderer uses to build an equivalent input form:
//!
//! - [`ParserDecl`] — root of a declaration tree (arguments, subcommands).
//! - [`ArgDecl`] / [`ArgKind`] — a single declaration and its kind.
//! - [`SchemaDocument`] — the generated object schema, including the flat
//!   [`FormEntry`] list.
//! - [`convert`] / [`Converter`] — the conversion itself.
//!
//! Validation ([`validate_parser`]) is an optional lint for hand-written
//! trees; the converter does not call it.
//!
//! # Example
//!
//! ```
//! use argform_core::*;
//!
//! let parser = ParserDecl::new()
//!     .with_description("Arithmetic")
//!     .with_subcommands(
//!         "command",
//!         SubcommandGroup::new()
//!             .with_command(
//!                 "add",
//!                 ParserDecl::new()
//!                     .with_argument(ArgDecl::positional("x").with_type(ValueType::Integer))
//!                     .with_argument(ArgDecl::positional("y").with_type(ValueType::Integer)),
//!             )
//!             .with_command("reset", ParserDecl::new()),
//!     );
//!
//! let doc = convert(&parser).unwrap();
//! assert_eq!(doc.description.as_deref(), Some("Arithmetic"));
//!
//! let add = doc.property("add").and_then(PropertySchema::as_object).unwrap();
//! assert_eq!(add.required, vec!["x", "y"]);
//! assert_eq!(doc.form.len(), 1);
//! assert_eq!(doc.property_paths(), parser.dest_paths());
//! ```

mod convert;
mod declaration;
mod error;
mod options;
mod schema;
mod validate;

pub use convert::{Converter, convert};
pub use declaration::*;
pub use error::{Error, Result};
pub use options::{ConvertOptions, DEFAULT_SELECTOR_TITLE};
pub use schema::*;
pub use validate::{ValidationError, validate_parser};
