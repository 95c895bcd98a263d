//! Runtime type descriptions handed to the schema compiler.
//!
//! # Module Structure
//!
//! - `annotation` - declared type identities ([`Annotation`])
//! - `field` - typed sites ([`FieldDefinition`]) and the "no default" sentinel
//! - `kwarg` - validation bounds and documentation overrides ([`KwargDefinition`])
//! - `record` - record types and the reflection each modeling convention exposes

mod annotation;
mod field;
mod kwarg;
mod record;

pub use annotation::{
    Annotation, Builtin, ConstrainedType, ContainerKind, EnumType, LiteralArg, PaginationKind,
};
pub use field::{DefaultValue, FieldDefinition};
pub use kwarg::{KwargDefinition, date_bound, datetime_bound};
pub use record::{
    AttrsAttribute, DataClassField, ModelBody, ModelField, RecordBody, RecordKind, RecordType,
    StructField, TypedMappingKey,
};
