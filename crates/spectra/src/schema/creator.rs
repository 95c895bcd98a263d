//! The schema orchestrator: dispatches a field definition to the resolver for
//! its shape and deduplicates named object schemas through the registry.

use std::{collections::HashSet, mem, sync::Arc};

use indexmap::IndexMap;
use serde_json::Value;
use spectra_core::{Reference, Schema, SchemaRef, SchemaType};
use tracing::{debug, trace};

use super::{
    constrained::{
        create_date_constrained_field_schema, create_numerical_constrained_field_schema,
        create_string_constrained_field_schema,
    },
    enum_schema::create_literal_schema,
    type_table::TypeTable,
    utils::{SchemaPurpose, get_type_schema_name, sort_schemas_and_references},
};
use crate::{
    config::SchemaConfig,
    error::SchemaError,
    examples::ExampleFactory,
    plugin::{OpenApiSchemaPlugin, PluginSchema},
    registry::SchemaRegistry,
    typing::{Annotation, FieldDefinition, KwargDefinition, PaginationKind, RecordKind, RecordType},
};

const CURSOR_DESCRIPTION: &str = "Unique ID, designating the last identifier in the given data set. \
     This value can be used to request the 'next' batch of records.";

/// Compiles field definitions into schemas or component references.
///
/// One creator serves one document build. Named object and array schemas are
/// registered in the borrowed [`SchemaRegistry`] and come back as references.
pub struct SchemaCreator<'a> {
    schemas: &'a mut SchemaRegistry,
    generate_examples: bool,
    prefer_alias: bool,
    plugins: Vec<Arc<dyn OpenApiSchemaPlugin>>,
    type_table: Arc<TypeTable>,
    example_factory: ExampleFactory,
    /// Record titles whose fields are being resolved
    in_progress: HashSet<String>,
    /// Record titles handed out as references before their schema was registered
    placeholders: HashSet<String>,
}

impl<'a> SchemaCreator<'a> {
    pub fn new(schemas: &'a mut SchemaRegistry, config: &SchemaConfig) -> Self {
        Self {
            schemas,
            generate_examples: config.generate_examples,
            prefer_alias: config.prefer_alias,
            plugins: Vec::new(),
            type_table: TypeTable::shared(config.include_model_extensions),
            example_factory: ExampleFactory::new(config.example_seed, config.prefer_alias),
            in_progress: HashSet::new(),
            placeholders: HashSet::new(),
        }
    }

    /// Append a plugin. Plugins are asked in the order they were added.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl OpenApiSchemaPlugin + 'static) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    #[must_use]
    pub fn with_type_table(mut self, type_table: Arc<TypeTable>) -> Self {
        self.type_table = type_table;
        self
    }

    #[must_use]
    pub const fn generate_examples(&self) -> bool {
        self.generate_examples
    }

    #[must_use]
    pub const fn prefer_alias(&self) -> bool {
        self.prefer_alias
    }

    #[must_use]
    pub fn schemas(&self) -> &SchemaRegistry {
        &*self.schemas
    }

    #[must_use]
    pub fn type_table(&self) -> &TypeTable {
        &self.type_table
    }

    /// Run `f` with example generation switched off, then restore the setting.
    pub fn without_examples<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = mem::replace(&mut self.generate_examples, false);
        let result = f(self);
        self.generate_examples = previous;
        result
    }

    /// Schema or component reference for `field`.
    ///
    /// `purpose` only affects the titles of record schemas resolved at this level.
    pub fn for_field_definition(
        &mut self,
        field: &FieldDefinition,
        purpose: Option<SchemaPurpose>,
    ) -> Result<SchemaRef, SchemaError> {
        self.resolve(field, purpose, true)
    }

    fn resolve(
        &mut self,
        field: &FieldDefinition,
        purpose: Option<SchemaPurpose>,
        plugins_enabled: bool,
    ) -> Result<SchemaRef, SchemaError> {
        let annotation = field.annotation();

        let schema = if field.is_optional() {
            trace!(field = field.name(), "optional");
            self.for_optional_field(field)?
        } else if field.is_union() {
            trace!(field = field.name(), "union");
            self.for_union_field(field)?
        } else if let Some(record) = annotation.as_record() {
            trace!(field = field.name(), kind = ?RecordKind::detect(annotation), "record");
            match self.for_record(record, purpose)? {
                SchemaRef::Inline(schema) => *schema,
                reference @ SchemaRef::Ref(_) => return Ok(reference),
            }
        } else if let Some(plugin) = self.plugin_for(annotation, plugins_enabled) {
            trace!(field = field.name(), "plugin");
            match plugin.to_openapi_schema(annotation) {
                PluginSchema::Schema(schema) => schema,
                PluginSchema::DataContainer(contained) => {
                    return self.resolve(&field.derive_with_annotation(contained), None, false);
                }
            }
        } else if field.is_constrained() {
            trace!(field = field.name(), "constrained");
            self.for_constrained_field(field)?
        } else if !field.inner_types().is_empty() && !field.is_generic() {
            trace!(field = field.name(), "object type");
            self.for_object_type(field)?
        } else if field.is_generic() {
            trace!(field = field.name(), "builtin generic");
            self.for_builtin_generics(field)?
        } else {
            self.type_table.create_schema_for_annotation(annotation)
        };

        self.process_schema_result(field, schema)
    }

    fn plugin_for(
        &self,
        annotation: &Annotation,
        plugins_enabled: bool,
    ) -> Option<Arc<dyn OpenApiSchemaPlugin>> {
        if !plugins_enabled {
            return None;
        }
        self.plugins
            .iter()
            .find(|plugin| plugin.is_plugin_supported_type(annotation))
            .cloned()
    }

    /// `oneOf` of the null schema and the resolved non-optional type.
    pub fn for_optional_field(&mut self, field: &FieldDefinition) -> Result<Schema, SchemaError> {
        let non_optional = FieldDefinition::from_kwarg(
            field.annotation().make_non_optional_union(),
            field.name(),
        )
        .with_default(field.default().clone());

        let mut members = vec![SchemaRef::inline(Schema::null())];
        match self.resolve(&non_optional, None, true)? {
            // splice, never nest oneOf in oneOf
            SchemaRef::Inline(mut schema) if schema.one_of.is_some() => {
                members.extend(schema.one_of.take().unwrap_or_default());
            }
            other => members.push(other),
        }
        Ok(Schema::one_of(members))
    }

    pub fn for_union_field(&mut self, field: &FieldDefinition) -> Result<Schema, SchemaError> {
        let members = self.resolve_all(field.inner_types())?;
        Ok(Schema::one_of(sort_schemas_and_references(members)))
    }

    fn resolve_all(&mut self, fields: &[FieldDefinition]) -> Result<Vec<SchemaRef>, SchemaError> {
        fields
            .iter()
            .map(|field| self.resolve(field, None, true))
            .collect()
    }

    /// Object schema of a record, or a placeholder reference while the same
    /// record is still being resolved further up.
    pub fn for_record(
        &mut self,
        record: &RecordType,
        purpose: Option<SchemaPurpose>,
    ) -> Result<SchemaRef, SchemaError> {
        let body = record.body().ok_or_else(|| SchemaError::UndefinedRecord {
            name: record.qualified_name().to_string(),
        })?;
        let description = body.adapter().describe(self.prefer_alias);
        let title = description
            .title
            .clone()
            .unwrap_or_else(|| get_type_schema_name(record.schema_name(), purpose));

        if self.in_progress.contains(&title) {
            debug!(title, "recursive record, referencing its component");
            self.placeholders.insert(title.clone());
            return Ok(SchemaRef::Ref(Reference::schema(&title)));
        }

        self.in_progress.insert(title.clone());
        let properties: Result<IndexMap<String, SchemaRef>, SchemaError> = description
            .fields
            .iter()
            .map(|field| Ok((field.key.clone(), self.resolve(&field.definition, None, true)?)))
            .collect();
        self.in_progress.remove(&title);

        let mut required: Vec<String> = description
            .fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.key.clone())
            .collect();
        required.sort();

        Ok(SchemaRef::inline(Schema {
            title: Some(title),
            properties: Some(properties?),
            required: (!required.is_empty()).then_some(required),
            examples: description.examples,
            ..Schema::object()
        }))
    }

    /// Route a constrained field by its base type: numeric, string or bytes,
    /// temporal, and collection for everything else.
    pub fn for_constrained_field(&mut self, field: &FieldDefinition) -> Result<Schema, SchemaError> {
        let unconstrained = KwargDefinition::default();
        let field_constraints = field
            .kwarg_definition()
            .filter(|kwarg| kwarg.is_constrained());
        let (base, constraints) = match field.annotation() {
            Annotation::Constrained(constrained) => (
                &constrained.base,
                field_constraints.unwrap_or(&constrained.constraints),
            ),
            other => (other, field_constraints.unwrap_or(&unconstrained)),
        };

        let table = &*self.type_table;
        let schema = match base.as_builtin() {
            Some(builtin) if builtin.is_numeric() => {
                create_numerical_constrained_field_schema(table, base, constraints)
            }
            Some(builtin) if builtin.is_string_or_bytes() => {
                create_string_constrained_field_schema(table, base, constraints)
            }
            Some(builtin) if builtin.is_temporal() => {
                create_date_constrained_field_schema(table, base, constraints)
            }
            _ => return self.for_collection_constrained_field(field, base, constraints),
        };
        Ok(schema)
    }

    /// Array schema with item-count bounds; set-like bases are unique.
    pub fn for_collection_constrained_field(
        &mut self,
        field: &FieldDefinition,
        base: &Annotation,
        constraints: &KwargDefinition,
    ) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new(SchemaType::Array);
        if let Some(min_items) = constraints.min_items {
            schema.min_items = Some(min_items);
        }
        if let Some(max_items) = constraints.max_items {
            schema.max_items = Some(max_items);
        }
        if base.container_kind().is_some_and(|kind| kind.is_set_like()) {
            schema.unique_items = Some(true);
        }

        let items = self.without_examples(|this| {
            if !field.inner_types().is_empty() {
                return this.resolve_all(field.inner_types()).map(combine_items);
            }
            match field.annotation() {
                Annotation::Constrained(constrained) => match &constrained.item_type {
                    Some(item_type) => {
                        let item_field = FieldDefinition::from_kwarg(
                            item_type.clone(),
                            format!("{}Field", constrained.name),
                        );
                        this.resolve(&item_field, None, true)
                    }
                    None => Ok(SchemaRef::inline(Schema::default())),
                },
                _ => Ok(SchemaRef::inline(Schema::default())),
            }
        })?;
        schema.items = Some(Box::new(items));
        Ok(schema)
    }

    /// Mappings, sequences and literals with type arguments.
    pub fn for_object_type(&mut self, field: &FieldDefinition) -> Result<Schema, SchemaError> {
        if field.is_mapping() {
            // the key type is not validated
            let additional_properties = match field.inner_types() {
                [_, value] => Some(Box::new(self.resolve(value, None, true)?)),
                _ => None,
            };
            return Ok(Schema {
                additional_properties,
                ..Schema::object()
            });
        }

        if field.is_non_string_sequence() {
            let items = self.resolve_all(field.inner_types())?;
            return Ok(Schema::array(combine_items(items)));
        }

        if let Annotation::Literal(args) = field.annotation() {
            return create_literal_schema(args, &self.type_table);
        }

        Err(SchemaError::UnmappableType {
            name: field.name().to_string(),
            annotation: field.annotation().to_string(),
        })
    }

    /// Fixed object shapes of the pagination wrappers.
    pub fn for_builtin_generics(&mut self, field: &FieldDefinition) -> Result<Schema, SchemaError> {
        let Annotation::Pagination(kind, _) = field.annotation() else {
            return Err(SchemaError::UnmappableType {
                name: field.name().to_string(),
                annotation: field.annotation().to_string(),
            });
        };
        let inner = field.inner_types();

        let properties = match kind {
            PaginationKind::Classic => IndexMap::from([
                ("items".to_string(), self.items_array(inner.first())?),
                ("page_size".to_string(), integer("Number of items per page.")),
                ("current_page".to_string(), integer("Current page number.")),
                ("total_pages".to_string(), integer("Total number of pages.")),
            ]),
            PaginationKind::Offset => IndexMap::from([
                ("items".to_string(), self.items_array(inner.first())?),
                ("limit".to_string(), integer("Maximal number of items to send.")),
                ("offset".to_string(), integer("Offset from the beginning of the query.")),
                ("total".to_string(), integer("Total number of items.")),
            ]),
            PaginationKind::Cursor => {
                let cursor = match inner.first() {
                    Some(cursor) => self.without_examples(|this| this.resolve(cursor, None, true))?,
                    None => SchemaRef::inline(Schema::default()),
                };
                let cursor = match cursor {
                    SchemaRef::Inline(mut schema) => {
                        schema.description = Some(CURSOR_DESCRIPTION.to_string());
                        SchemaRef::Inline(schema)
                    }
                    reference => reference,
                };
                IndexMap::from([
                    ("items".to_string(), self.items_array(inner.get(1))?),
                    ("cursor".to_string(), cursor),
                    ("results_per_page".to_string(), integer("Maximal number of items to send.")),
                ])
            }
        };

        Ok(Schema {
            properties: Some(properties),
            ..Schema::object()
        })
    }

    fn items_array(&mut self, item: Option<&FieldDefinition>) -> Result<SchemaRef, SchemaError> {
        let items = match item {
            Some(item) => self.resolve(item, None, true)?,
            None => SchemaRef::inline(Schema::default()),
        };
        Ok(SchemaRef::inline(Schema::array(items)))
    }

    /// Fold field-level attributes into `schema`, attach examples and register
    /// named object and array schemas.
    pub fn process_schema_result(
        &mut self,
        field: &FieldDefinition,
        mut schema: Schema,
    ) -> Result<SchemaRef, SchemaError> {
        let derived_title = schema.title.clone();
        if let Some(kwarg) = field.kwarg_definition() {
            if kwarg.r#const && schema.const_value.is_none() {
                if let Some(default) = field.default().value() {
                    schema.const_value = Some(default.clone());
                }
            }
            apply_kwarg_definition(&mut schema, kwarg);
        }

        if self.generate_examples && schema.examples.as_ref().is_none_or(Vec::is_empty) {
            let examples = self.example_factory.create_examples_for_field(field);
            if !examples.is_empty() {
                schema.examples = Some(examples);
            }
        }

        if let Some(title) = schema.title.clone() {
            if matches!(
                schema.schema_type,
                Some(SchemaType::Object | SchemaType::Array)
            ) {
                // self references inside point at the title the record had before renaming
                let handed_out = derived_title.filter(|derived| self.placeholders.remove(derived));
                if let Some(derived) = handed_out.filter(|derived| *derived != title) {
                    let alias = Schema {
                        title: Some(derived.clone()),
                        ..schema.clone()
                    };
                    self.schemas.register(&derived, alias)?;
                }
                return self.schemas.register(&title, schema).map(SchemaRef::Ref);
            }
        }
        Ok(SchemaRef::inline(schema))
    }
}

fn integer(description: &str) -> SchemaRef {
    SchemaRef::inline(Schema::integer().with_description(description))
}

/// `items` of an array: the single member, or a sorted `oneOf` of several.
fn combine_items(mut items: Vec<SchemaRef>) -> SchemaRef {
    if items.len() > 1 {
        return SchemaRef::inline(Schema::one_of(sort_schemas_and_references(items)));
    }
    items
        .pop()
        .unwrap_or_else(|| SchemaRef::inline(Schema::default()))
}

fn set_if_some<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

fn non_zero(value: &f64) -> bool {
    *value != 0.0
}

fn non_empty_text(value: &Option<String>) -> Option<String> {
    value.clone().filter(|text| !text.is_empty())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

/// Copy set attributes of `kwarg` onto `schema`. Zero, empty and false values are skipped.
fn apply_kwarg_definition(schema: &mut Schema, kwarg: &KwargDefinition) {
    set_if_some(&mut schema.content_encoding, non_empty_text(&kwarg.content_encoding));
    set_if_some(&mut schema.default, kwarg.default.clone().filter(truthy));
    set_if_some(&mut schema.description, non_empty_text(&kwarg.description));
    set_if_some(
        &mut schema.r#enum,
        kwarg.r#enum.clone().filter(|values| !values.is_empty()),
    );
    set_if_some(
        &mut schema.examples,
        kwarg.examples.clone().filter(|values| !values.is_empty()),
    );
    set_if_some(&mut schema.external_docs, kwarg.external_docs.clone());
    set_if_some(&mut schema.format, non_empty_text(&kwarg.format));
    set_if_some(&mut schema.minimum, kwarg.ge.filter(non_zero));
    set_if_some(&mut schema.exclusive_minimum, kwarg.gt.filter(non_zero));
    set_if_some(&mut schema.maximum, kwarg.le.filter(non_zero));
    set_if_some(&mut schema.exclusive_maximum, kwarg.lt.filter(non_zero));
    set_if_some(&mut schema.max_items, kwarg.max_items.filter(|count| *count > 0));
    set_if_some(&mut schema.max_length, kwarg.max_length.filter(|count| *count > 0));
    set_if_some(&mut schema.min_items, kwarg.min_items.filter(|count| *count > 0));
    set_if_some(&mut schema.min_length, kwarg.min_length.filter(|count| *count > 0));
    set_if_some(&mut schema.multiple_of, kwarg.multiple_of.filter(non_zero));
    set_if_some(&mut schema.pattern, non_empty_text(&kwarg.pattern));
    set_if_some(&mut schema.title, non_empty_text(&kwarg.title));
}

#[cfg(test)]
mod tests {
    use insta::assert_json_snapshot;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::typing::{Builtin, ConstrainedType, ContainerKind, ModelBody, ModelField, RecordBody};

    fn resolve(field: &FieldDefinition) -> (SchemaRef, SchemaRegistry) {
        let mut registry = SchemaRegistry::new();
        let result = SchemaCreator::new(&mut registry, &SchemaConfig::default())
            .for_field_definition(field, None)
            .unwrap();
        (result, registry)
    }

    fn inline(result: &SchemaRef) -> &Schema {
        result.as_schema().unwrap()
    }

    #[rstest]
    #[case(Builtin::Int, SchemaType::Integer)]
    #[case(Builtin::Str, SchemaType::String)]
    #[case(Builtin::Bool, SchemaType::Boolean)]
    #[case(Builtin::Float, SchemaType::Number)]
    fn builtins_come_from_the_type_table(#[case] builtin: Builtin, #[case] expected: SchemaType) {
        let (result, registry) = resolve(&FieldDefinition::from_kwarg(builtin.into(), "value"));
        assert_eq!(inline(&result).schema_type, Some(expected));
        assert!(registry.is_empty());
    }

    #[test]
    fn optional_of_union_is_spliced() {
        let annotation = Annotation::Union(vec![
            Builtin::Int.into(),
            Builtin::Str.into(),
            Annotation::None,
        ]);
        let (result, _) = resolve(&FieldDefinition::from_kwarg(annotation, "value"));
        assert_json_snapshot!(inline(&result), @r#"
        {
          "oneOf": [
            {
              "type": "null"
            },
            {
              "type": "integer"
            },
            {
              "type": "string"
            }
          ]
        }
        "#);
    }

    #[test]
    fn list_items_and_mapping_values() {
        let (list, _) = resolve(&FieldDefinition::from_kwarg(
            Annotation::list(Builtin::Str.into()),
            "tags",
        ));
        assert_eq!(
            inline(&list).items.as_deref(),
            Some(&SchemaRef::inline(Schema::string()))
        );

        let (mapping, _) = resolve(&FieldDefinition::from_kwarg(
            Annotation::dict(Builtin::Str.into(), Builtin::Int.into()),
            "counts",
        ));
        assert_eq!(
            inline(&mapping).additional_properties.as_deref(),
            Some(&SchemaRef::inline(Schema::integer()))
        );
    }

    #[test]
    fn mapping_without_two_arguments_has_no_additional_properties() {
        let annotation = Annotation::Container(ContainerKind::Mapping, vec![Builtin::Str.into()]);
        let (result, _) = resolve(&FieldDefinition::from_kwarg(annotation, "loose"));
        assert_eq!(inline(&result).schema_type, Some(SchemaType::Object));
        assert_eq!(inline(&result).additional_properties, None);
    }

    #[test]
    fn tuple_items_become_sorted_one_of() {
        let annotation = Annotation::Container(
            ContainerKind::Tuple,
            vec![Builtin::Int.into(), Builtin::Str.into()],
        );
        let (result, _) = resolve(&FieldDefinition::from_kwarg(annotation, "pair"));
        let items = inline(&result).items.as_deref().and_then(SchemaRef::as_schema).unwrap();
        assert_eq!(items.one_of.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn kwarg_attributes_skip_falsy_values() {
        let kwarg = KwargDefinition {
            ge: Some(0.0),
            le: Some(10.0),
            description: Some(String::new()),
            title: Some("Count".into()),
            ..Default::default()
        };
        let field = FieldDefinition::from_kwarg(Builtin::Int.into(), "count").with_kwarg_definition(kwarg);
        let (result, _) = resolve(&field);
        let schema = inline(&result);
        // ge=0 still reaches the schema through the constrained resolver
        assert_eq!(schema.minimum, Some(0.0));
        assert_eq!(schema.maximum, Some(10.0));
        assert_eq!(schema.description, None);
        assert_eq!(schema.title.as_deref(), Some("Count"));
    }

    #[test]
    fn const_field_takes_its_default() {
        let kwarg = KwargDefinition {
            r#const: true,
            ..Default::default()
        };
        let field = FieldDefinition::from_kwarg(Builtin::Str.into(), "kind")
            .with_default(json!("circle"))
            .with_kwarg_definition(kwarg);
        let (result, _) = resolve(&field);
        assert_eq!(inline(&result).const_value, Some(json!("circle")));
    }

    #[test]
    fn titled_array_is_registered() {
        let kwarg = KwargDefinition {
            title: Some("Tags".into()),
            ..Default::default()
        };
        let field = FieldDefinition::from_kwarg(Annotation::list(Builtin::Str.into()), "tags")
            .with_kwarg_definition(kwarg);
        let (result, registry) = resolve(&field);
        assert_eq!(result, SchemaRef::Ref(Reference::schema("Tags")));
        assert!(registry.contains("Tags"));
    }

    #[test]
    fn constrained_list_without_arguments_uses_item_type() {
        let annotation = Annotation::constrained(ConstrainedType {
            name: "ConstrainedList".into(),
            base: Annotation::Container(ContainerKind::FrozenSet, Vec::new()),
            item_type: Some(Builtin::Int.into()),
            constraints: KwargDefinition {
                min_items: Some(1),
                max_items: Some(3),
                ..Default::default()
            },
        });
        let (result, _) = resolve(&FieldDefinition::from_kwarg(annotation, "ids"));
        assert_json_snapshot!(inline(&result), @r#"
        {
          "type": "array",
          "items": {
            "type": "integer"
          },
          "minItems": 1,
          "maxItems": 3,
          "uniqueItems": true
        }
        "#);
    }

    #[test]
    fn constrained_collection_without_item_type_is_open() {
        let annotation = Annotation::constrained(ConstrainedType {
            name: "Anything".into(),
            base: Annotation::Container(ContainerKind::List, Vec::new()),
            item_type: None,
            constraints: KwargDefinition {
                max_items: Some(2),
                ..Default::default()
            },
        });
        let (result, _) = resolve(&FieldDefinition::from_kwarg(annotation, "bag"));
        assert_eq!(
            inline(&result).items.as_deref(),
            Some(&SchemaRef::inline(Schema::default()))
        );
    }

    #[test]
    fn string_constraints_on_field_kwarg() {
        let kwarg = KwargDefinition {
            min_length: Some(2),
            pattern: Some("^[a-z]+$".into()),
            lower_case: true,
            ..Default::default()
        };
        let field = FieldDefinition::from_kwarg(Builtin::Str.into(), "slug").with_kwarg_definition(kwarg);
        let (result, _) = resolve(&field);
        let schema = inline(&result);
        assert_eq!(schema.min_length, Some(2));
        assert_eq!(schema.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(schema.description.as_deref(), Some("must be in lower case"));
    }

    #[test]
    fn model_title_override_skips_purpose_suffix() {
        let record = Annotation::record(RecordType::new(
            "Pet",
            RecordBody::Model(ModelBody {
                fields: vec![ModelField::new("name", Builtin::Str.into())],
                title: Some("Animal".into()),
                example: None,
            }),
        ));
        let mut registry = SchemaRegistry::new();
        let result = SchemaCreator::new(&mut registry, &SchemaConfig::default())
            .for_field_definition(
                &FieldDefinition::from_kwarg(record, "pet"),
                Some(SchemaPurpose::RequestBody),
            )
            .unwrap();
        assert_eq!(result, SchemaRef::Ref(Reference::schema("Animal")));
    }

    #[test]
    fn undefined_record_is_an_error() {
        let record = Annotation::record(RecordType::declare("Ghost"));
        let mut registry = SchemaRegistry::new();
        let err = SchemaCreator::new(&mut registry, &SchemaConfig::default())
            .for_field_definition(&FieldDefinition::from_kwarg(record, "ghost"), None)
            .unwrap_err();
        assert!(matches!(err, SchemaError::UndefinedRecord { name } if name == "Ghost"));
    }

    #[test]
    fn without_examples_restores_the_setting() {
        let mut registry = SchemaRegistry::new();
        let config = SchemaConfig {
            generate_examples: true,
            ..SchemaConfig::default()
        };
        let mut creator = SchemaCreator::new(&mut registry, &config);
        let inside = creator.without_examples(|this| this.generate_examples());
        assert!(!inside);
        assert!(creator.generate_examples());
    }

    #[test]
    fn cursor_description_is_fixed_and_example_free() {
        let mut registry = SchemaRegistry::new();
        let config = SchemaConfig {
            generate_examples: true,
            example_seed: Some(3),
            ..SchemaConfig::default()
        };
        let annotation = Annotation::Pagination(
            PaginationKind::Cursor,
            vec![Builtin::Str.into(), Builtin::Int.into()],
        );
        let result = SchemaCreator::new(&mut registry, &config)
            .for_field_definition(&FieldDefinition::from_kwarg(annotation, "page"), None)
            .unwrap();
        let properties = inline(&result).properties.as_ref().unwrap();
        let cursor = properties["cursor"].as_schema().unwrap();
        assert_eq!(cursor.description.as_deref(), Some(CURSOR_DESCRIPTION));
        assert_eq!(cursor.examples, None);
        assert_eq!(
            properties.keys().map(String::as_str).collect::<Vec<_>>(),
            ["items", "cursor", "results_per_page"]
        );
    }
}
