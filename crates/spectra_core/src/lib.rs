//! Output data model for the spectra schema compiler.
//!
//! Everything here serializes into the JSON-Schema flavoured vocabulary used by
//! `OpenAPI` 3.1 component schemas.

pub mod schema;

pub use schema::{
    COMPONENTS_SCHEMAS_PREFIX, Components, ExternalDocumentation, OpenApiFormat, Reference,
    Schema, SchemaRef, SchemaType,
};
