//! Scalar schemas narrowed by declared validation bounds.
//!
//! Each function starts from the type table entry of the base type and overlays
//! the bounds that are present. Collections need recursive element resolution and
//! live on the schema creator.

use spectra_core::Schema;

use super::type_table::TypeTable;
use crate::typing::{Annotation, KwargDefinition};

fn base_schema(type_table: &TypeTable, base: &Annotation, fallback: fn() -> Schema) -> Schema {
    type_table.lookup(base).unwrap_or_else(fallback)
}

fn overlay_bounds(schema: &mut Schema, kwarg: &KwargDefinition) {
    if let Some(le) = kwarg.le {
        schema.maximum = Some(le);
    }
    if let Some(lt) = kwarg.lt {
        schema.exclusive_maximum = Some(lt);
    }
    if let Some(ge) = kwarg.ge {
        schema.minimum = Some(ge);
    }
    if let Some(gt) = kwarg.gt {
        schema.exclusive_minimum = Some(gt);
    }
}

/// int, float and decimal bounds
#[must_use]
pub fn create_numerical_constrained_field_schema(
    type_table: &TypeTable,
    base: &Annotation,
    kwarg: &KwargDefinition,
) -> Schema {
    let mut schema = base_schema(type_table, base, Schema::number);
    overlay_bounds(&mut schema, kwarg);
    if let Some(multiple_of) = kwarg.multiple_of {
        schema.multiple_of = Some(multiple_of);
    }
    schema
}

/// str and bytes length, pattern and case
#[must_use]
pub fn create_string_constrained_field_schema(
    type_table: &TypeTable,
    base: &Annotation,
    kwarg: &KwargDefinition,
) -> Schema {
    let mut schema = base_schema(type_table, base, Schema::string);
    if let Some(min_length) = kwarg.min_length {
        schema.min_length = Some(min_length);
    }
    if let Some(max_length) = kwarg.max_length {
        schema.max_length = Some(max_length);
    }
    if let Some(pattern) = &kwarg.pattern {
        schema.pattern = Some(pattern.clone());
    }
    if kwarg.lower_case {
        schema.description = Some("must be in lower case".to_string());
    }
    if kwarg.upper_case {
        schema.description = Some("must be in upper case".to_string());
    }
    schema
}

/// date and datetime bounds, as timestamps
#[must_use]
pub fn create_date_constrained_field_schema(
    type_table: &TypeTable,
    base: &Annotation,
    kwarg: &KwargDefinition,
) -> Schema {
    let mut schema = base_schema(type_table, base, Schema::string);
    overlay_bounds(&mut schema, kwarg);
    schema
}
