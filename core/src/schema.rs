//! Output schema and form types.
//!
//! A converted declaration tree is a [`SchemaDocument`]: a JSON-Schema-like
//! object whose `properties` describe each destination key, plus a flat list
//! of [`FormEntry`] rendering directives. Optional fields are omitted from the
//! serialized JSON when absent; they are never emitted as `null` or as empty
//! collections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// JSON Schema `type` keyword values produced by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Boolean,
    Array,
    Object,
}

/// Schema of a single value-carrying property.
///
/// # Examples
///
/// ```
/// use argform_core::{FieldSchema, SchemaType};
///
/// let field = FieldSchema::new(SchemaType::String);
/// assert_eq!(serde_json::to_string(&field).unwrap(), r#"{"type":"string"}"#);
///
/// let list = FieldSchema::array_of(SchemaType::Integer);
/// assert_eq!(
///     serde_json::to_string(&list).unwrap(),
///     r#"{"type":"array","items":{"type":"integer"}}"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Element schema for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldSchema>>,
    /// Emitted only when `true`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub positional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Emitted only when `true`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Allowed literal values. The converter leaves this unset rather than empty.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl FieldSchema {
    /// Creates a bare field of the given type.
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            items: None,
            positional: false,
            description: None,
            required: false,
            enum_values: None,
            title: None,
        }
    }

    /// Creates an array field whose items have the given type.
    pub fn array_of(item_type: SchemaType) -> Self {
        Self {
            items: Some(Box::new(Self::new(item_type))),
            ..Self::new(SchemaType::Array)
        }
    }

    /// Sets `title` and `description`, leaving absent values absent.
    pub fn with_labels(mut self, title: Option<&str>, description: Option<&str>) -> Self {
        self.title = title.map(String::from);
        self.description = description.map(String::from);
        self
    }
}

/// A property of an object schema: either a value field or a nested object
/// produced from a subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertySchema {
    Object(SchemaDocument),
    Field(FieldSchema),
}

impl PropertySchema {
    /// Returns the field schema, if this is a value field.
    pub fn as_field(&self) -> Option<&FieldSchema> {
        match self {
            PropertySchema::Field(field) => Some(field),
            PropertySchema::Object(_) => None,
        }
    }

    /// Returns the nested document, if this is a subcommand object.
    pub fn as_object(&self) -> Option<&SchemaDocument> {
        match self {
            PropertySchema::Object(doc) => Some(doc),
            PropertySchema::Field(_) => None,
        }
    }
}

impl From<FieldSchema> for PropertySchema {
    fn from(field: FieldSchema) -> Self {
        PropertySchema::Field(field)
    }
}

impl From<SchemaDocument> for PropertySchema {
    fn from(doc: SchemaDocument) -> Self {
        PropertySchema::Object(doc)
    }
}

/// Non-default file-open settings carried by a file form entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConstructor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bufsize: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl FileConstructor {
    /// Returns `true` when no setting is present.
    pub fn is_empty(&self) -> bool {
        self.mode.is_none()
            && self.bufsize.is_none()
            && self.encoding.is_none()
            && self.errors.is_none()
    }
}

/// One choice of a command selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectItem {
    pub key: String,
    pub legend: String,
}

impl SelectItem {
    /// Creates an item whose legend is the command name itself.
    pub fn command(name: &str) -> Self {
        Self {
            key: name.to_string(),
            legend: name.to_string(),
        }
    }
}

/// UI rendering directive, tagged by its `type` key.
///
/// # Examples
///
/// ```
/// use argform_core::{FormEntry, SelectItem};
///
/// let entry = FormEntry::SelectFieldset {
///     title: "Choose command".into(),
///     items: vec![SelectItem::command("add")],
/// };
/// let json = serde_json::to_value(&entry).unwrap();
/// assert_eq!(json["type"], "selectfieldset");
/// assert_eq!(json["items"][0]["legend"], "add");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormEntry {
    /// File picker for the property `key`.
    File {
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        constructor: Option<FileConstructor>,
    },
    /// Command selector listing one subcommand group.
    SelectFieldset { title: String, items: Vec<SelectItem> },
}

/// Object schema produced for a parser.
///
/// The root document carries the whole flattened `form`; nested documents
/// (subcommands) never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Always [`SchemaType::Object`].
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub properties: IndexMap<String, PropertySchema>,
    /// Required keys in declaration order; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Flat, depth-first list of rendering directives; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form: Vec<FormEntry>,
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaDocument {
    /// Creates an empty object schema.
    pub fn new() -> Self {
        Self {
            schema_type: SchemaType::Object,
            properties: IndexMap::new(),
            required: Vec::new(),
            description: None,
            form: Vec::new(),
        }
    }

    /// Returns the property stored under `key`.
    pub fn property(&self, key: &str) -> Option<&PropertySchema> {
        self.properties.get(key)
    }

    /// Every property path in the document, depth first.
    ///
    /// A nested object contributes its own key followed by the paths of its
    /// properties, so the result lines up with
    /// [`ParserDecl::dest_paths`](crate::ParserDecl::dest_paths).
    pub fn property_paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        collect_property_paths(self, &mut Vec::new(), &mut paths);
        paths
    }

    /// Serializes the document into a JSON value.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serializes the document into pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn collect_property_paths(
    doc: &SchemaDocument,
    prefix: &mut Vec<String>,
    out: &mut Vec<Vec<String>>,
) {
    for (key, property) in &doc.properties {
        prefix.push(key.clone());
        out.push(prefix.clone());
        if let PropertySchema::Object(nested) = property {
            collect_property_paths(nested, prefix, out);
        }
        prefix.pop();
    }
}
