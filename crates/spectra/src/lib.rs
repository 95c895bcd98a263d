//! Compile runtime type descriptions into `OpenAPI` schema fragments.
//!
//! A [`SchemaCreator`] resolves one [`FieldDefinition`] at a time into an
//! inline [`Schema`] or a [`Reference`] to a named component. Named object
//! schemas are collected in a [`SchemaRegistry`] that lives for one document
//! build.
//!
//! ```
//! use spectra::{
//!     Annotation, Builtin, FieldDefinition, SchemaConfig, SchemaCreator, SchemaRegistry,
//!     SchemaType,
//! };
//!
//! let mut registry = SchemaRegistry::new();
//! let mut creator = SchemaCreator::new(&mut registry, &SchemaConfig::default());
//! let field = FieldDefinition::from_kwarg(Annotation::list(Builtin::Int.into()), "ids");
//! let schema = creator.for_field_definition(&field, None).unwrap();
//! assert_eq!(schema.as_schema().unwrap().schema_type, Some(SchemaType::Array));
//! ```

pub mod config;
pub mod error;
pub mod examples;
pub mod plugin;
pub mod registry;
pub mod schema;
pub mod typing;

pub use config::SchemaConfig;
pub use error::SchemaError;
pub use examples::ExampleFactory;
pub use plugin::{OpenApiSchemaPlugin, PluginSchema};
pub use registry::SchemaRegistry;
pub use schema::{SchemaCreator, SchemaPurpose, TypeTable, sort_schemas_and_references};
pub use spectra_core::{
    COMPONENTS_SCHEMAS_PREFIX, Components, ExternalDocumentation, OpenApiFormat, Reference,
    Schema, SchemaRef, SchemaType,
};
pub use typing::{
    Annotation, AttrsAttribute, Builtin, ConstrainedType, ContainerKind, DataClassField,
    DefaultValue, EnumType, FieldDefinition, KwargDefinition, LiteralArg, ModelBody, ModelField,
    PaginationKind, RecordBody, RecordKind, RecordType, StructField, TypedMappingKey,
};
