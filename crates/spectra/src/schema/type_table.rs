//! Canonical schemas for builtin and well-known types.

use std::{
    collections::HashMap,
    sync::{Arc, LazyLock},
};

use spectra_core::{OpenApiFormat, Schema, SchemaType};

use super::enum_schema::create_enum_schema;
use crate::typing::{Annotation, Builtin, ContainerKind};

/// Lookup key of a type table entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    None,
    Builtin(Builtin),
    /// Container constructor, used as a fallback tag when no element type is known
    Container(ContainerKind),
    /// Library or plugin type by qualified name
    Named(String),
}

impl TypeKey {
    #[must_use]
    pub fn of(annotation: &Annotation) -> Option<Self> {
        match annotation {
            Annotation::None => Some(Self::None),
            Annotation::Builtin(builtin) => Some(Self::Builtin(*builtin)),
            Annotation::Container(kind, _) => Some(Self::Container(*kind)),
            Annotation::Named(name) => Some(Self::Named(name.clone())),
            _ => None,
        }
    }
}

static DEFAULT_TABLE: LazyLock<Arc<TypeTable>> = LazyLock::new(|| Arc::new(TypeTable::new()));
static EXTENDED_TABLE: LazyLock<Arc<TypeTable>> =
    LazyLock::new(|| Arc::new(TypeTable::new().with_model_extensions()));

/// Static mapping from type identity to schema.
///
/// Lookups hand out clones, so callers may mutate the result freely.
#[derive(Debug, Clone)]
pub struct TypeTable {
    entries: HashMap<TypeKey, Schema>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

fn string_with(format: OpenApiFormat) -> Schema {
    Schema::string().with_format(format)
}

fn ip_any(kind: &str) -> Schema {
    Schema::one_of(vec![
        string_with(OpenApiFormat::Ipv4)
            .with_description(format!("IPv4 {kind}"))
            .into(),
        string_with(OpenApiFormat::Ipv6)
            .with_description(format!("IPv6 {kind}"))
            .into(),
    ])
}

impl TypeTable {
    /// Table holding the builtin entries only.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        let mut builtin = |builtin: Builtin, schema: Schema| {
            entries.insert(TypeKey::Builtin(builtin), schema);
        };

        builtin(Builtin::Decimal, Schema::number());
        builtin(Builtin::Float, Schema::number());
        builtin(Builtin::Int, Schema::integer());
        builtin(Builtin::Bool, Schema::boolean());
        builtin(Builtin::Str, Schema::string());
        builtin(Builtin::Bytes, Schema::string());
        builtin(Builtin::ByteArray, Schema::string());
        builtin(Builtin::Date, string_with(OpenApiFormat::Date));
        builtin(Builtin::DateTime, string_with(OpenApiFormat::DateTime));
        builtin(Builtin::Time, string_with(OpenApiFormat::Duration));
        builtin(Builtin::TimeDelta, string_with(OpenApiFormat::Duration));
        builtin(
            Builtin::Uuid,
            string_with(OpenApiFormat::Uuid).with_description("Any UUID string"),
        );
        builtin(Builtin::Path, string_with(OpenApiFormat::Uri));
        builtin(Builtin::Pattern, string_with(OpenApiFormat::Regex));
        builtin(Builtin::Ipv4Address, string_with(OpenApiFormat::Ipv4));
        builtin(Builtin::Ipv4Interface, string_with(OpenApiFormat::Ipv4));
        builtin(Builtin::Ipv4Network, string_with(OpenApiFormat::Ipv4));
        builtin(Builtin::Ipv6Address, string_with(OpenApiFormat::Ipv6));
        builtin(Builtin::Ipv6Interface, string_with(OpenApiFormat::Ipv6));
        builtin(Builtin::Ipv6Network, string_with(OpenApiFormat::Ipv6));
        builtin(
            Builtin::UploadFile,
            Schema {
                content_media_type: Some("application/octet-stream".to_string()),
                ..Schema::string()
            },
        );

        entries.insert(TypeKey::None, Schema::null());

        for kind in [
            ContainerKind::List,
            ContainerKind::Tuple,
            ContainerKind::Set,
            ContainerKind::FrozenSet,
            ContainerKind::Deque,
            ContainerKind::Sequence,
            ContainerKind::MutableSequence,
            ContainerKind::Iterable,
        ] {
            entries.insert(TypeKey::Container(kind), Schema::new(SchemaType::Array));
        }
        for kind in [
            ContainerKind::Dict,
            ContainerKind::DefaultDict,
            ContainerKind::OrderedDict,
            ContainerKind::Mapping,
            ContainerKind::MutableMapping,
        ] {
            entries.insert(TypeKey::Container(kind), Schema::object());
        }

        Self { entries }
    }

    /// Shared builtin table.
    #[must_use]
    pub fn shared(include_model_extensions: bool) -> Arc<Self> {
        if include_model_extensions {
            Arc::clone(&EXTENDED_TABLE)
        } else {
            Arc::clone(&DEFAULT_TABLE)
        }
    }

    /// Merge extension entries keyed by qualified type name. Later entries win.
    #[must_use]
    pub fn with_extensions<I, N>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = (N, Schema)>,
        N: Into<String>,
    {
        self.entries.extend(
            extensions
                .into_iter()
                .map(|(name, schema)| (TypeKey::Named(name.into()), schema)),
        );
        self
    }

    /// Merge the validated-model library types.
    #[must_use]
    pub fn with_model_extensions(self) -> Self {
        self.with_extensions(model_extensions())
    }

    #[must_use]
    pub fn lookup(&self, annotation: &Annotation) -> Option<Schema> {
        TypeKey::of(annotation).and_then(|key| self.lookup_key(&key))
    }

    #[must_use]
    pub fn lookup_key(&self, key: &TypeKey) -> Option<Schema> {
        self.entries.get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Table entry, enum schema, or the open schema that matches anything.
    #[must_use]
    pub fn create_schema_for_annotation(&self, annotation: &Annotation) -> Schema {
        if let Some(schema) = self.lookup(annotation) {
            return schema;
        }
        if let Annotation::Enum(enum_type) = annotation {
            return create_enum_schema(enum_type);
        }
        Schema::default()
    }
}

/// Types of the validated-model library, keyed by qualified name.
#[must_use]
pub fn model_extensions() -> Vec<(&'static str, Schema)> {
    let uuid = |version: &str| {
        string_with(OpenApiFormat::Uuid).with_description(format!("{version} string"))
    };
    let http_url =
        || string_with(OpenApiFormat::Url).with_description("must be a valid HTTP based URL");

    vec![
        ("pydantic.ByteSize", Schema::integer()),
        ("pydantic.EmailStr", string_with(OpenApiFormat::Email)),
        ("pydantic.IPvAnyAddress", ip_any("address")),
        ("pydantic.IPvAnyInterface", ip_any("interface")),
        ("pydantic.IPvAnyNetwork", ip_any("network")),
        (
            "pydantic.Json",
            Schema::object().with_format(OpenApiFormat::JsonPointer),
        ),
        (
            "pydantic.NameEmail",
            string_with(OpenApiFormat::Email).with_description("Name and email"),
        ),
        (
            "pydantic.PyObject",
            Schema::string().with_description(
                "dot separated path identifying a python object, e.g. 'decimal.Decimal'",
            ),
        ),
        ("pydantic.UUID1", uuid("UUID1")),
        ("pydantic.UUID3", uuid("UUID3")),
        ("pydantic.UUID4", uuid("UUID4")),
        ("pydantic.UUID5", uuid("UUID5")),
        (
            "pydantic.DirectoryPath",
            string_with(OpenApiFormat::UriReference),
        ),
        ("pydantic.FilePath", string_with(OpenApiFormat::UriReference)),
        ("pydantic.AnyUrl", string_with(OpenApiFormat::Url)),
        ("pydantic.AnyHttpUrl", http_url()),
        (
            "pydantic.HttpUrl",
            Schema {
                max_length: Some(2083),
                ..http_url()
            },
        ),
        (
            "pydantic.RedisDsn",
            string_with(OpenApiFormat::Uri).with_description("redis DSN"),
        ),
        (
            "pydantic.PostgresDsn",
            string_with(OpenApiFormat::Uri).with_description("postgres DSN"),
        ),
        ("pydantic.SecretBytes", Schema::string()),
        ("pydantic.SecretStr", Schema::string()),
        ("pydantic.StrictBool", Schema::boolean()),
        ("pydantic.StrictBytes", Schema::string()),
        ("pydantic.StrictFloat", Schema::number()),
        ("pydantic.StrictInt", Schema::integer()),
        ("pydantic.StrictStr", Schema::string()),
        (
            "pydantic.NegativeFloat",
            Schema {
                exclusive_maximum: Some(0.0),
                ..Schema::number()
            },
        ),
        (
            "pydantic.NegativeInt",
            Schema {
                exclusive_maximum: Some(0.0),
                ..Schema::integer()
            },
        ),
        (
            "pydantic.NonNegativeInt",
            Schema {
                minimum: Some(0.0),
                ..Schema::integer()
            },
        ),
        (
            "pydantic.NonPositiveFloat",
            Schema {
                maximum: Some(0.0),
                ..Schema::number()
            },
        ),
        (
            "pydantic.PaymentCardNumber",
            Schema {
                min_length: Some(12),
                max_length: Some(19),
                ..Schema::string()
            },
        ),
        (
            "pydantic.PositiveFloat",
            Schema {
                exclusive_minimum: Some(0.0),
                ..Schema::number()
            },
        ),
        (
            "pydantic.PositiveInt",
            Schema {
                exclusive_minimum: Some(0.0),
                ..Schema::integer()
            },
        ),
    ]
}
