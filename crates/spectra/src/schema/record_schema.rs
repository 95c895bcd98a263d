//! Record adapters: each modeling convention's reflection reduced to one field shape.
//!
//! The adapters only decide property key, declared type, default and whether the
//! field is required. Building the object schema from that is shared.

use serde_json::Value;

use crate::typing::{
    AttrsAttribute, DataClassField, FieldDefinition, ModelBody, RecordBody, StructField,
    TypedMappingKey,
};

/// One record field, as every adapter reports it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFieldDescription {
    /// Property key in the emitted schema
    pub key: String,
    pub definition: FieldDefinition,
    pub required: bool,
}

/// Uniform view of a record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDescription {
    /// Replaces the derived title, purpose suffix included
    pub title: Option<String>,
    pub examples: Option<Vec<Value>>,
    pub fields: Vec<RecordFieldDescription>,
}

/// Reflection adapter for one modeling convention
pub trait RecordAdapter {
    fn describe(&self, prefer_alias: bool) -> RecordDescription;
}

impl RecordBody {
    #[must_use]
    pub fn adapter(&self) -> &dyn RecordAdapter {
        match self {
            Self::Model(model) => model,
            Self::Attrs(attributes) => attributes,
            Self::Struct(fields) => fields,
            Self::DataClass(fields) => fields,
            Self::TypedMapping(keys) => keys,
        }
    }
}

fn describe_field(
    key: String,
    definition: FieldDefinition,
    has_default: bool,
) -> RecordFieldDescription {
    let required = !has_default && !definition.is_optional();
    RecordFieldDescription {
        key,
        definition,
        required,
    }
}

impl RecordAdapter for ModelBody {
    fn describe(&self, prefer_alias: bool) -> RecordDescription {
        let fields = self
            .fields
            .iter()
            .map(|field| {
                let key = match &field.alias {
                    Some(alias) if prefer_alias => alias.clone(),
                    _ => field.name.clone(),
                };
                let mut definition = FieldDefinition::from_kwarg(field.annotation.clone(), &key)
                    .with_default(field.default.clone());
                if let Some(constraints) = &field.constraints {
                    definition = definition.with_kwarg_definition(constraints.clone());
                }
                let has_default = !field.default.is_empty() || field.has_default_factory;
                describe_field(key, definition, has_default)
            })
            .collect();

        RecordDescription {
            title: self.title.clone(),
            examples: self.example.clone().map(|example| vec![example]),
            fields,
        }
    }
}

impl RecordAdapter for Vec<AttrsAttribute> {
    fn describe(&self, _prefer_alias: bool) -> RecordDescription {
        let fields = self
            .iter()
            .map(|attribute| {
                let definition =
                    FieldDefinition::from_kwarg(attribute.annotation.clone(), &attribute.name)
                        .with_default(attribute.default.clone());
                describe_field(
                    attribute.name.clone(),
                    definition,
                    !attribute.default.is_empty(),
                )
            })
            .collect();
        RecordDescription {
            fields,
            ..RecordDescription::default()
        }
    }
}

impl RecordAdapter for Vec<StructField> {
    fn describe(&self, _prefer_alias: bool) -> RecordDescription {
        let fields = self
            .iter()
            .map(|field| {
                // the encode name is the wire name, alias preference does not apply
                let key = field.encode_name.clone().unwrap_or_else(|| field.name.clone());
                let definition = FieldDefinition::from_kwarg(field.annotation.clone(), &key)
                    .with_default(field.default.clone());
                let has_default = !field.default.is_empty() || field.has_default_factory;
                describe_field(key, definition, has_default)
            })
            .collect();
        RecordDescription {
            fields,
            ..RecordDescription::default()
        }
    }
}

impl RecordAdapter for Vec<DataClassField> {
    fn describe(&self, _prefer_alias: bool) -> RecordDescription {
        let fields = self
            .iter()
            .map(|field| {
                let definition = FieldDefinition::from_kwarg(field.annotation.clone(), &field.name)
                    .with_default(field.default.clone());
                let has_default = !field.default.is_empty() || field.has_default_factory;
                describe_field(field.name.clone(), definition, has_default)
            })
            .collect();
        RecordDescription {
            fields,
            ..RecordDescription::default()
        }
    }
}

impl RecordAdapter for Vec<TypedMappingKey> {
    fn describe(&self, _prefer_alias: bool) -> RecordDescription {
        let fields = self
            .iter()
            .map(|key| RecordFieldDescription {
                key: key.name.clone(),
                definition: FieldDefinition::from_kwarg(key.annotation.clone(), &key.name),
                required: key.required,
            })
            .collect();
        RecordDescription {
            fields,
            ..RecordDescription::default()
        }
    }
}
