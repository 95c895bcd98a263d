//! Enumeration and literal value sets to JSON Schema.

use serde_json::Value;
use spectra_core::{Schema, SchemaType};

use super::type_table::{TypeKey, TypeTable};
use crate::{
    error::SchemaError,
    typing::{Builtin, ContainerKind, EnumType, LiteralArg},
};

/// Schema for an enumeration: every member value, in declaration order.
///
/// The first member decides the type for all of them: `string` when it is a
/// string, `integer` otherwise. Mixed enumerations are tagged by their first member.
#[must_use]
pub fn create_enum_schema(enum_type: &EnumType) -> Schema {
    let values: Vec<Value> = enum_type.values().cloned().collect();
    let schema_type = match values.first() {
        Some(Value::String(_)) | None => SchemaType::String,
        Some(_) => SchemaType::Integer,
    };
    Schema {
        r#enum: Some(values),
        ..Schema::new(schema_type)
    }
}

pub(crate) fn flatten_literal_args<'a>(args: &'a [LiteralArg], out: &mut Vec<&'a Value>) {
    for arg in args {
        match arg {
            LiteralArg::Value(value) => out.push(value),
            LiteralArg::Literal(nested) => flatten_literal_args(nested, out),
        }
    }
}

/// Type table key of a literal value's runtime type
fn literal_value_key(value: &Value) -> TypeKey {
    match value {
        Value::Null => TypeKey::None,
        Value::Bool(_) => TypeKey::Builtin(Builtin::Bool),
        Value::Number(number) if number.is_i64() || number.is_u64() => {
            TypeKey::Builtin(Builtin::Int)
        }
        Value::Number(_) => TypeKey::Builtin(Builtin::Float),
        Value::String(_) => TypeKey::Builtin(Builtin::Str),
        Value::Array(_) => TypeKey::Container(ContainerKind::List),
        Value::Object(_) => TypeKey::Container(ContainerKind::Dict),
    }
}

/// Schema for a literal type.
///
/// Nested literals are flattened depth-first. The schema of the first value's
/// type is used for all of them; a single value becomes `const`, several become `enum`.
pub fn create_literal_schema(
    args: &[LiteralArg],
    type_table: &TypeTable,
) -> Result<Schema, SchemaError> {
    let mut values = Vec::new();
    flatten_literal_args(args, &mut values);

    let first = values.first().ok_or(SchemaError::EmptyLiteral)?;
    let mut schema = type_table
        .lookup_key(&literal_value_key(first))
        .unwrap_or_default();

    if values.len() == 1 {
        schema.const_value = Some(values[0].clone());
    } else {
        schema.r#enum = Some(values.into_iter().cloned().collect());
    }
    Ok(schema)
}
