//! Schema-related structure definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix shared by every component schema reference.
pub const COMPONENTS_SCHEMAS_PREFIX: &str = "#/components/schemas/";

/// Schema reference or inline schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaRef {
    /// Schema reference (e.g., "#/components/schemas/User")
    Ref(Reference),
    /// Inline schema
    Inline(Box<Schema>),
}

impl SchemaRef {
    /// Wrap a schema as an inline node
    #[must_use]
    pub fn inline(schema: Schema) -> Self {
        Self::Inline(Box::new(schema))
    }

    /// Returns the inline schema, if this is not a reference
    #[must_use]
    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            Self::Inline(schema) => Some(schema),
            Self::Ref(_) => None,
        }
    }

    /// Returns the reference, if this is one
    #[must_use]
    pub const fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Ref(reference) => Some(reference),
            Self::Inline(_) => None,
        }
    }

    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self, Self::Ref(_))
    }
}

impl From<Schema> for SchemaRef {
    fn from(schema: Schema) -> Self {
        Self::inline(schema)
    }
}

impl From<Reference> for SchemaRef {
    fn from(reference: Reference) -> Self {
        Self::Ref(reference)
    }
}

/// Reference definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    /// Reference path (e.g., "#/components/schemas/User")
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Reference {
    /// Create a new reference
    #[must_use]
    pub const fn new(ref_path: String) -> Self {
        Self { ref_path }
    }

    /// Create a component schema reference
    #[must_use]
    pub fn schema(name: &str) -> Self {
        Self::new(format!("{COMPONENTS_SCHEMAS_PREFIX}{name}"))
    }

    /// Name of the referenced component schema, if this points into `#/components/schemas`
    #[must_use]
    pub fn schema_name(&self) -> Option<&str> {
        self.ref_path.strip_prefix(COMPONENTS_SCHEMAS_PREFIX)
    }
}

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// Well-known `format` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenApiFormat {
    Date,
    DateTime,
    Time,
    Duration,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Url,
    Uuid,
    Regex,
    JsonPointer,
    Binary,
}

impl OpenApiFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Email => "email",
            Self::Hostname => "hostname",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Uri => "uri",
            Self::UriReference => "uri-reference",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::Regex => "regex",
            Self::JsonPointer => "json-pointer",
            Self::Binary => "binary",
        }
    }
}

impl From<OpenApiFormat> for String {
    fn from(format: OpenApiFormat) -> Self {
        format.as_str().to_string()
    }
}

/// Whole-number bounds are written as JSON integers (`5`, not `5.0`).
#[allow(clippy::ref_option)] // serde serialize_with mandates &Option<T> signature
fn serialize_number_constraint<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        #[allow(clippy::cast_possible_truncation)]
        Some(bound) if bound.fract() == 0.0 && bound.abs() < 9.0e15 => {
            serializer.serialize_some(&(*bound as i64))
        }
        Some(bound) => serializer.serialize_some(bound),
        None => serializer.serialize_none(),
    }
}

/// JSON Schema definition
///
/// Two schemas with identical attributes compare equal, which is what the
/// component registry relies on to tell a repeated title from a conflicting one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Schema type; `None` for pure composition nodes
    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Single admissible value
    #[serde(rename = "const")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<serde_json::Value>>,

    // numeric
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number_constraint"
    )]
    pub minimum: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number_constraint"
    )]
    pub maximum: Option<f64>,
    /// Exclusive minimum (`OpenAPI` 3.1 numeric form)
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number_constraint"
    )]
    pub exclusive_minimum: Option<f64>,
    /// Exclusive maximum (`OpenAPI` 3.1 numeric form)
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number_constraint"
    )]
    pub exclusive_maximum: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_number_constraint"
    )]
    pub multiple_of: Option<f64>,

    // string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Media type of string content (e.g. uploads)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_media_type: Option<String>,
    /// Encoding of string content (e.g. base64)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,

    // array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    // object
    /// Property definitions, in insertion order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Schema every additional property value must satisfy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#enum: Option<Vec<serde_json::Value>>,
    /// Members of which exactly one must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
}

impl Schema {
    /// Schema of the given type with nothing else set
    #[must_use]
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Create a string schema
    #[must_use]
    pub fn string() -> Self {
        Self::new(SchemaType::String)
    }

    #[must_use]
    pub fn integer() -> Self {
        Self::new(SchemaType::Integer)
    }

    #[must_use]
    pub fn number() -> Self {
        Self::new(SchemaType::Number)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::new(SchemaType::Boolean)
    }

    /// Create a null schema
    #[must_use]
    pub fn null() -> Self {
        Self::new(SchemaType::Null)
    }

    /// Create an object schema without properties
    #[must_use]
    pub fn object() -> Self {
        Self::new(SchemaType::Object)
    }

    /// Create an array schema
    #[must_use]
    pub fn array(items: SchemaRef) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::new(SchemaType::Array)
        }
    }

    /// Create an untyped `oneOf` composition
    #[must_use]
    pub fn one_of(members: Vec<SchemaRef>) -> Self {
        Self {
            one_of: Some(members),
            ..Self::default()
        }
    }

    /// Set the `format` tag
    #[must_use]
    pub fn with_format(mut self, format: OpenApiFormat) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the schema is the open schema `{}` that matches anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// External documentation reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDocumentation {
    /// Documentation description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Documentation URL
    pub url: String,
}

/// `OpenAPI` Components (reusable components)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Schema definitions, in registration order
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub schemas: IndexMap<String, Schema>,
}
