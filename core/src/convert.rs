//! Declaration tree to schema conversion.
//!
//! The converter walks a [`ParserDecl`] depth first, in declaration order.
//! Every declaration is turned into a fresh fragment (properties, an
//! optional required key, form entries) by a pure function, and the caller
//! merges fragments into the enclosing [`SchemaDocument`]. Subcommand groups
//! recurse: each command becomes an independent nested document installed as
//! a sibling property, while its form entries are lifted into the flat form
//! list right after the group's selector.
//!
//! # Example
//!
//! ```
//! use argform_core::{ArgDecl, ParserDecl, ValueType, convert};
//!
//! let parser = ParserDecl::new()
//!     .with_argument(ArgDecl::positional("count").with_type(ValueType::Integer))
//!     .with_argument(ArgDecl::option(&["-v", "--verbose"]).store_true());
//!
//! let doc = convert(&parser).unwrap();
//! assert_eq!(doc.required, vec!["count"]);
//! assert_eq!(
//!     doc.to_json_value().unwrap(),
//!     serde_json::json!({
//!         "type": "object",
//!         "properties": {
//!             "count": {"type": "integer", "required": true, "positional": true},
//!             "verbose": {"type": "boolean"}
//!         },
//!         "required": ["count"]
//!     }),
//! );
//! ```

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::declaration::{ArgDecl, ArgKind, ParserDecl, SubcommandGroup, ValueType};
use crate::error::{Error, Result};
use crate::options::ConvertOptions;
use crate::schema::{
    FieldSchema, FormEntry, PropertySchema, SchemaDocument, SchemaType, SelectItem,
};

/// Converts a declaration tree with default options.
///
/// Fails with [`Error::UnsupportedDeclarationKind`] when any declaration in
/// the tree, nested ones included, has a kind the converter does not handle.
pub fn convert(parser: &ParserDecl) -> Result<SchemaDocument> {
    Converter::default().convert(parser)
}

/// Schema converter.
///
/// Holds only immutable options, so one converter can be shared freely and
/// reused across trees.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

/// Contribution of one declaration to its enclosing object schema.
#[derive(Debug, Default)]
struct Fragment {
    properties: Vec<(String, PropertySchema)>,
    required: Option<String>,
    form: Vec<FormEntry>,
}

impl Fragment {
    fn field(key: &str, field: FieldSchema) -> Self {
        Self {
            properties: vec![(key.to_string(), field.into())],
            ..Default::default()
        }
    }
}

impl Converter {
    /// Creates a converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Options in effect.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Converts a declaration tree into a schema document.
    pub fn convert(&self, parser: &ParserDecl) -> Result<SchemaDocument> {
        self.convert_seeded(parser, IndexMap::new(), Vec::new())
    }

    /// Converts a declaration tree on top of pre-existing content.
    ///
    /// Seeded properties and form entries come first. A declared key equal to
    /// a seeded key replaces the seeded schema at the seeded position.
    ///
    /// # Examples
    ///
    /// ```
    /// use argform_core::{
    ///     ArgDecl, Converter, FieldSchema, ParserDecl, PropertySchema, SchemaType,
    /// };
    /// use indexmap::IndexMap;
    ///
    /// let mut base: IndexMap<String, PropertySchema> = IndexMap::new();
    /// base.insert("config".to_string(), FieldSchema::new(SchemaType::String).into());
    ///
    /// let parser = ParserDecl::new().with_argument(ArgDecl::positional("input"));
    /// let doc = Converter::default().convert_seeded(&parser, base, Vec::new()).unwrap();
    ///
    /// let keys: Vec<&str> = doc.properties.keys().map(String::as_str).collect();
    /// assert_eq!(keys, vec!["config", "input"]);
    /// ```
    pub fn convert_seeded(
        &self,
        parser: &ParserDecl,
        base_properties: IndexMap<String, PropertySchema>,
        base_form: Vec<FormEntry>,
    ) -> Result<SchemaDocument> {
        self.convert_parser(parser, base_properties, base_form, 0)
    }

    fn convert_parser(
        &self,
        parser: &ParserDecl,
        properties: IndexMap<String, PropertySchema>,
        form: Vec<FormEntry>,
        depth: usize,
    ) -> Result<SchemaDocument> {
        debug!(
            prog = parser.prog.as_deref().unwrap_or("<root>"),
            arguments = parser.arguments.len(),
            depth,
            "Converting parser"
        );

        let mut doc = SchemaDocument {
            properties,
            form,
            description: parser.description.clone(),
            ..SchemaDocument::new()
        };

        for arg in &parser.arguments {
            let fragment = self.convert_argument(arg, depth)?;
            merge_fragment(&mut doc, fragment);
        }

        Ok(doc)
    }

    fn convert_argument(&self, arg: &ArgDecl, depth: usize) -> Result<Fragment> {
        trace!(dest = %arg.dest, kind = arg.kind.name(), "Converting declaration");

        match &arg.kind {
            ArgKind::Help => Ok(Fragment::default()),
            ArgKind::Store { value_type } => Ok(store_fragment(arg, value_type)),
            ArgKind::StoreConst | ArgKind::StoreTrue | ArgKind::StoreFalse => {
                Ok(Fragment::field(&arg.dest, toggle_field(arg)))
            }
            ArgKind::Append { value_type } => Ok(Fragment::field(
                &arg.dest,
                list_field(arg, value_type.schema_type()),
            )),
            ArgKind::AppendConst => Ok(Fragment::field(
                &arg.dest,
                list_field(arg, SchemaType::Boolean),
            )),
            ArgKind::Subcommands(group) => self.subcommands_fragment(group, depth),
            ArgKind::Count
            | ArgKind::Version
            | ArgKind::Extend { .. }
            | ArgKind::BooleanOptional
            | ArgKind::Other { .. } => {
                debug!(dest = %arg.dest, kind = arg.kind.name(), "Unsupported declaration kind");
                Err(Error::UnsupportedDeclarationKind {
                    kind: arg.kind.name().to_string(),
                    dest: arg.dest.clone(),
                })
            }
        }
    }

    fn subcommands_fragment(&self, group: &SubcommandGroup, depth: usize) -> Result<Fragment> {
        let mut fragment = Fragment::default();
        fragment.form.push(FormEntry::SelectFieldset {
            title: self.options.selector_title.clone(),
            items: group
                .commands
                .keys()
                .map(|name| SelectItem::command(name))
                .collect(),
        });

        for (name, parser) in &group.commands {
            let mut nested = self.convert_parser(parser, IndexMap::new(), Vec::new(), depth + 1)?;
            fragment.form.append(&mut nested.form);
            fragment.properties.push((name.clone(), nested.into()));
        }

        Ok(fragment)
    }
}

fn merge_fragment(doc: &mut SchemaDocument, fragment: Fragment) {
    doc.properties.extend(fragment.properties);
    doc.required.extend(fragment.required);
    doc.form.extend(fragment.form);
}

fn store_fragment(arg: &ArgDecl, value_type: &ValueType) -> Fragment {
    let mut field = FieldSchema::new(value_type.schema_type())
        .with_labels(arg.metavar.as_deref(), arg.help.as_deref());
    field.positional = arg.is_positional();
    field.required = arg.required;
    field.enum_values = arg.choices.clone().filter(|choices| !choices.is_empty());

    let mut fragment = Fragment::field(&arg.dest, field);
    if arg.required {
        fragment.required = Some(arg.dest.clone());
    }
    if let Some(spec) = value_type.file_spec() {
        fragment.form.push(FormEntry::File {
            key: arg.dest.clone(),
            constructor: spec.constructor(),
        });
    }
    fragment
}

fn toggle_field(arg: &ArgDecl) -> FieldSchema {
    FieldSchema::new(SchemaType::Boolean).with_labels(arg.metavar.as_deref(), arg.help.as_deref())
}

fn list_field(arg: &ArgDecl, item_type: SchemaType) -> FieldSchema {
    FieldSchema::array_of(item_type).with_labels(arg.metavar.as_deref(), arg.help.as_deref())
}

#[cfg(test)]
mod tests {
    use crate::declaration::FileSpec;

    use super::*;

    #[test]
    fn test_store_fragment_collects_required_key() {
        let arg = ArgDecl::option(&["--name"]).required().with_choices(&["a", "b"]);
        let fragment = store_fragment(&arg, &ValueType::String);

        assert_eq!(fragment.required.as_deref(), Some("name"));
        assert!(fragment.form.is_empty());
        let field = fragment.properties[0].1.as_field().unwrap();
        assert!(field.required);
        assert!(!field.positional);
        assert_eq!(field.enum_values, Some(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_store_fragment_drops_empty_choices() {
        let mut arg = ArgDecl::positional("x");
        arg.choices = Some(Vec::new());
        let fragment = store_fragment(&arg, &ValueType::String);

        let field = fragment.properties[0].1.as_field().unwrap();
        assert!(field.enum_values.is_none());
    }

    #[test]
    fn test_store_fragment_default_file_has_no_constructor() {
        let arg = ArgDecl::positional("input").with_type(ValueType::File(FileSpec::default()));
        let fragment = store_fragment(&arg, &ValueType::File(FileSpec::default()));

        assert_eq!(
            fragment.form,
            vec![FormEntry::File {
                key: "input".into(),
                constructor: None,
            }]
        );
    }

    #[test]
    fn test_toggle_field_ignores_required() {
        let arg = ArgDecl::option(&["--flag"]).store_true().required();
        let fragment = Converter::default().convert_argument(&arg, 0).unwrap();

        assert!(fragment.required.is_none());
        let field = fragment.properties[0].1.as_field().unwrap();
        assert_eq!(field, &FieldSchema::new(SchemaType::Boolean));
    }

    #[test]
    fn test_append_is_never_required() {
        let arg = ArgDecl::option(&["--tag"]).append().required();
        let fragment = Converter::default().convert_argument(&arg, 0).unwrap();

        assert!(fragment.required.is_none());
        assert_eq!(
            fragment.properties[0].1.as_field().unwrap(),
            &FieldSchema::array_of(SchemaType::String)
        );
    }

    #[test]
    fn test_help_contributes_nothing() {
        let fragment = Converter::default()
            .convert_argument(&ArgDecl::help(), 0)
            .unwrap();
        assert!(fragment.properties.is_empty());
        assert!(fragment.required.is_none());
        assert!(fragment.form.is_empty());
    }

    #[test]
    fn test_unsupported_kind_names_kind_and_dest() {
        let arg = ArgDecl::option(&["-v"]).with_kind(ArgKind::Count);
        let err = Converter::default().convert_argument(&arg, 0).unwrap_err();

        match err {
            Error::UnsupportedDeclarationKind { kind, dest } => {
                assert_eq!(kind, "count");
                assert_eq!(dest, "v");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_selector_title() {
        let converter = Converter::new(ConvertOptions {
            selector_title: "Action".into(),
        });
        let group = SubcommandGroup::new().with_command("run", ParserDecl::new());
        let fragment = converter.subcommands_fragment(&group, 0).unwrap();

        assert_eq!(
            fragment.form[0],
            FormEntry::SelectFieldset {
                title: "Action".into(),
                items: vec![SelectItem::command("run")],
            }
        );
    }
}
