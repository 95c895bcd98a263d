//! Per-run component schema registry.

use indexmap::IndexMap;
use spectra_core::{Components, Reference, Schema, SchemaRef};
use tracing::{debug, warn};

use crate::error::SchemaError;

/// Named schemas shared across one document build, keyed by title.
///
/// A title holds exactly one shape. Registering an equal schema again is a no-op
/// that yields the same reference; a different schema under a used title fails.
/// Examples are not part of the shape, the first registered ones are kept.
/// Concurrent document builds need their own registry each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Schema>,
}

/// `schema` with its examples removed, down through nested inline schemas
fn without_examples(schema: &Schema) -> Schema {
    let strip = |node: &SchemaRef| match node {
        SchemaRef::Inline(inner) => SchemaRef::inline(without_examples(inner)),
        SchemaRef::Ref(_) => node.clone(),
    };
    Schema {
        examples: None,
        items: schema.items.as_deref().map(|items| Box::new(strip(items))),
        additional_properties: schema
            .additional_properties
            .as_deref()
            .map(|values| Box::new(strip(values))),
        properties: schema.properties.as_ref().map(|properties| {
            properties
                .iter()
                .map(|(key, node)| (key.clone(), strip(node)))
                .collect()
        }),
        one_of: schema
            .one_of
            .as_ref()
            .map(|members| members.iter().map(strip).collect()),
        ..schema.clone()
    }
}

fn same_shape(left: &Schema, right: &Schema) -> bool {
    left == right || without_examples(left) == without_examples(right)
}

fn render(schema: &Schema) -> String {
    serde_json::to_string(schema).unwrap_or_else(|err| format!("<unserializable schema: {err}>"))
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `schema` under `title` and return a reference to it.
    pub fn register(&mut self, title: &str, schema: Schema) -> Result<Reference, SchemaError> {
        match self.schemas.get(title) {
            Some(existing) if !same_shape(existing, &schema) => {
                warn!(title, "conflicting schemas share a component title");
                return Err(SchemaError::TitleCollision {
                    title: title.to_string(),
                    first: render(existing),
                    second: render(&schema),
                });
            }
            Some(_) => debug!(title, "reusing registered component schema"),
            None => {
                debug!(title, "registering component schema");
                self.schemas.insert(title.to_string(), schema);
            }
        }
        Ok(Reference::schema(title))
    }

    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Schema> {
        self.schemas.get(title)
    }

    /// Resolve a component reference created by this registry.
    #[must_use]
    pub fn resolve(&self, reference: &Reference) -> Option<&Schema> {
        reference.schema_name().and_then(|title| self.get(title))
    }

    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.schemas.contains_key(title)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Titles and schemas in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().map(|(title, schema)| (title.as_str(), schema))
    }

    #[must_use]
    pub fn into_components(self) -> Components {
        Components {
            schemas: self.schemas,
        }
    }
}
