//! Field definitions to JSON Schema.
//!
//! # Module Structure
//!
//! - `type_table` - canonical schemas of builtin and well-known types
//! - `enum_schema` - enumerations and literal value sets
//! - `constrained` - scalar schemas narrowed by validation bounds
//! - `record_schema` - per-convention record reflection adapters
//! - `creator` - the orchestrator ([`SchemaCreator`])
//! - `utils` - member ordering and record titles

pub mod constrained;
pub mod creator;
pub mod enum_schema;
pub mod record_schema;
pub mod type_table;
pub mod utils;

pub use constrained::{
    create_date_constrained_field_schema, create_numerical_constrained_field_schema,
    create_string_constrained_field_schema,
};
pub use creator::SchemaCreator;
pub use enum_schema::{create_enum_schema, create_literal_schema};
pub use record_schema::{RecordAdapter, RecordDescription, RecordFieldDescription};
pub use type_table::{TypeKey, TypeTable, model_extensions};
pub use utils::{SchemaPurpose, get_type_schema_name, sort_schemas_and_references};
