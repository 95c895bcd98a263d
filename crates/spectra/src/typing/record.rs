//! User-defined record types and the reflection each modeling convention exposes.

use std::{fmt, sync::OnceLock};

use serde_json::Value;

use super::{annotation::Annotation, field::DefaultValue, kwarg::KwargDefinition};

/// Modeling conventions, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Validated model with aliases, a config title and a config example
    Model,
    /// Attribute-class records where a missing default is the `NOTHING` sentinel
    Attrs,
    /// Serialization structs with an encode name per field
    Struct,
    /// Plain data records
    DataClass,
    /// Typed mappings with explicit required keys
    TypedMapping,
}

impl RecordKind {
    pub const PRIORITY: [Self; 5] = [
        Self::Model,
        Self::Attrs,
        Self::Struct,
        Self::DataClass,
        Self::TypedMapping,
    ];

    /// Capability check against a record body.
    #[must_use]
    pub const fn supports(self, body: &RecordBody) -> bool {
        matches!(
            (self, body),
            (Self::Model, RecordBody::Model(_))
                | (Self::Attrs, RecordBody::Attrs(_))
                | (Self::Struct, RecordBody::Struct(_))
                | (Self::DataClass, RecordBody::DataClass(_))
                | (Self::TypedMapping, RecordBody::TypedMapping(_))
        )
    }

    /// First convention in priority order that claims `annotation`.
    #[must_use]
    pub fn detect(annotation: &Annotation) -> Option<Self> {
        let body = annotation.as_record()?.body()?;
        Self::PRIORITY.into_iter().find(|kind| kind.supports(body))
    }
}

/// Field of a validated model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelField {
    pub name: String,
    pub alias: Option<String>,
    pub annotation: Annotation,
    pub default: DefaultValue,
    pub has_default_factory: bool,
    pub constraints: Option<KwargDefinition>,
}

impl ModelField {
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            alias: None,
            annotation,
            default: DefaultValue::Empty,
            has_default_factory: false,
            constraints: None,
        }
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = DefaultValue::Value(default);
        self
    }

    #[must_use]
    pub fn constraints(mut self, constraints: KwargDefinition) -> Self {
        self.constraints = Some(constraints);
        self
    }
}

/// Validated model body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelBody {
    pub fields: Vec<ModelField>,
    /// Config title; replaces the derived schema name entirely
    pub title: Option<String>,
    /// Config example
    pub example: Option<Value>,
}

/// Attribute of an attrs-style class; `DefaultValue::Empty` stands for `NOTHING`
#[derive(Debug, Clone, PartialEq)]
pub struct AttrsAttribute {
    pub name: String,
    pub annotation: Annotation,
    pub default: DefaultValue,
}

impl AttrsAttribute {
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            default: DefaultValue::Empty,
        }
    }

    #[must_use]
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = DefaultValue::Value(default);
        self
    }
}

/// Field of a serialization struct
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    /// Wire name, when it differs from `name`
    pub encode_name: Option<String>,
    pub annotation: Annotation,
    pub default: DefaultValue,
    pub has_default_factory: bool,
}

impl StructField {
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            encode_name: None,
            annotation,
            default: DefaultValue::Empty,
            has_default_factory: false,
        }
    }

    #[must_use]
    pub fn encode_name(mut self, encode_name: impl Into<String>) -> Self {
        self.encode_name = Some(encode_name.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = DefaultValue::Value(default);
        self
    }
}

/// Field of a plain data record
#[derive(Debug, Clone, PartialEq)]
pub struct DataClassField {
    pub name: String,
    pub annotation: Annotation,
    pub default: DefaultValue,
    pub has_default_factory: bool,
}

impl DataClassField {
    pub fn new(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            default: DefaultValue::Empty,
            has_default_factory: false,
        }
    }

    #[must_use]
    pub fn default_value(mut self, default: Value) -> Self {
        self.default = DefaultValue::Value(default);
        self
    }

    #[must_use]
    pub const fn default_factory(mut self) -> Self {
        self.has_default_factory = true;
        self
    }
}

/// Key of a typed mapping
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMappingKey {
    pub name: String,
    pub annotation: Annotation,
    pub required: bool,
}

impl TypedMappingKey {
    pub fn required(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            required: true,
        }
    }

    pub fn not_required(name: impl Into<String>, annotation: Annotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            required: false,
        }
    }
}

/// Native reflection of a record, one variant per modeling convention
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    Model(ModelBody),
    Attrs(Vec<AttrsAttribute>),
    Struct(Vec<StructField>),
    DataClass(Vec<DataClassField>),
    TypedMapping(Vec<TypedMappingKey>),
}

/// A user-defined record type.
///
/// Identity is the qualified name. Self-referential records are built in two
/// steps: [`RecordType::declare`] first, so fields can point back at the
/// declared type, then [`RecordType::define`].
pub struct RecordType {
    name: String,
    qualified_name: String,
    schema_name: Option<String>,
    body: OnceLock<RecordBody>,
}

impl RecordType {
    pub fn new(name: impl Into<String>, body: RecordBody) -> Self {
        let record = Self::declare(name);
        let _ = record.body.set(body);
        record
    }

    pub fn declare(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            qualified_name: name.clone(),
            name,
            schema_name: None,
            body: OnceLock::new(),
        }
    }

    /// Attach the body of a declared record. Fails when a body is already set.
    pub fn define(&self, body: RecordBody) -> Result<(), RecordBody> {
        self.body.set(body)
    }

    /// Name used in component titles instead of the declared name
    #[must_use]
    pub fn with_schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    #[must_use]
    pub fn with_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.qualified_name = qualified_name.into();
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    #[must_use]
    pub fn schema_name(&self) -> &str {
        self.schema_name.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn body(&self) -> Option<&RecordBody> {
        self.body.get()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

// Bodies may point back at their own record, so only the identity is printed.
impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("qualified_name", &self.qualified_name)
            .field("kind", &self.body().and_then(|body| {
                RecordKind::PRIORITY
                    .into_iter()
                    .find(|kind| kind.supports(body))
            }))
            .finish_non_exhaustive()
    }
}
