//! End-to-end resolution of field definitions through `SchemaCreator`.

use std::sync::Arc;

use insta::assert_json_snapshot;
use rstest::rstest;
use serde_json::json;
use spectra::{
    Annotation, AttrsAttribute, Builtin, DataClassField, EnumType, FieldDefinition,
    KwargDefinition, ModelBody, ModelField, OpenApiSchemaPlugin, PaginationKind, PluginSchema,
    RecordBody, RecordType, Reference, Schema, SchemaConfig, SchemaCreator, SchemaError,
    SchemaPurpose, SchemaRef, SchemaRegistry, SchemaType, StructField, TypeTable,
    TypedMappingKey, sort_schemas_and_references,
};

fn resolve_with(
    registry: &mut SchemaRegistry,
    config: &SchemaConfig,
    field: &FieldDefinition,
) -> Result<SchemaRef, SchemaError> {
    SchemaCreator::new(registry, config).for_field_definition(field, None)
}

fn resolve(field: &FieldDefinition) -> Schema {
    let mut registry = SchemaRegistry::new();
    match resolve_with(&mut registry, &SchemaConfig::default(), field).unwrap() {
        SchemaRef::Inline(schema) => *schema,
        SchemaRef::Ref(reference) => panic!("expected an inline schema, got {reference:?}"),
    }
}

fn abc_record(kind: &str) -> Annotation {
    let body = match kind {
        "model" => RecordBody::Model(ModelBody {
            fields: vec![
                ModelField::new("a", Builtin::Int.into()),
                ModelField::new("b", Builtin::Str.into()).default_value(json!("x")),
                ModelField::new("c", Annotation::optional(Builtin::Int.into())),
            ],
            ..ModelBody::default()
        }),
        "attrs" => RecordBody::Attrs(vec![
            AttrsAttribute::new("a", Builtin::Int.into()),
            AttrsAttribute::new("b", Builtin::Str.into()).default_value(json!("x")),
            AttrsAttribute::new("c", Annotation::optional(Builtin::Int.into())),
        ]),
        "struct" => RecordBody::Struct(vec![
            StructField::new("a", Builtin::Int.into()),
            StructField::new("b", Builtin::Str.into()).default_value(json!("x")),
            StructField::new("c", Annotation::optional(Builtin::Int.into())),
        ]),
        "dataclass" => RecordBody::DataClass(vec![
            DataClassField::new("a", Builtin::Int.into()),
            DataClassField::new("b", Builtin::Str.into()).default_value(json!("x")),
            DataClassField::new("c", Annotation::optional(Builtin::Int.into())),
        ]),
        _ => RecordBody::TypedMapping(vec![
            TypedMappingKey::required("a", Builtin::Int.into()),
            TypedMappingKey::not_required("b", Builtin::Str.into()),
            TypedMappingKey::not_required("c", Annotation::optional(Builtin::Int.into())),
        ]),
    };
    Annotation::record(RecordType::new("Abc", body))
}

#[rstest]
#[case(Builtin::Int, SchemaType::Integer, None)]
#[case(Builtin::Float, SchemaType::Number, None)]
#[case(Builtin::Bool, SchemaType::Boolean, None)]
#[case(Builtin::Str, SchemaType::String, None)]
#[case(Builtin::Date, SchemaType::String, Some("date"))]
#[case(Builtin::DateTime, SchemaType::String, Some("date-time"))]
#[case(Builtin::Uuid, SchemaType::String, Some("uuid"))]
#[case(Builtin::Ipv4Address, SchemaType::String, Some("ipv4"))]
fn test_type_table_primitives(
    #[case] builtin: Builtin,
    #[case] schema_type: SchemaType,
    #[case] format: Option<&str>,
) {
    let table = TypeTable::new();
    let schema = table.lookup(&builtin.into()).unwrap();
    assert_eq!(schema.schema_type, Some(schema_type));
    assert_eq!(schema.format.as_deref(), format);
}

#[test]
fn test_type_table_lookups_are_fresh_copies() {
    let table = TypeTable::new();
    let mut first = table.lookup(&Builtin::Str.into()).unwrap();
    first.description = Some("mutated".into());
    first.min_length = Some(3);

    let second = table.lookup(&Builtin::Str.into()).unwrap();
    assert_eq!(second, Schema::string());
}

#[test]
fn test_string_enum() {
    let annotation = Annotation::enumeration(EnumType::new(
        "Letter",
        [("A", json!("a")), ("B", json!("b"))],
    ));
    let schema = resolve(&FieldDefinition::from_kwarg(annotation, "letter"));
    assert_json_snapshot!(schema, @r#"
    {
      "type": "string",
      "enum": [
        "a",
        "b"
      ]
    }
    "#);
}

#[test]
fn test_literals() {
    let single = resolve(&FieldDefinition::from_kwarg(Annotation::literal([json!("x")]), "l"));
    assert_json_snapshot!(single, @r#"
    {
      "type": "string",
      "const": "x"
    }
    "#);

    let several = resolve(&FieldDefinition::from_kwarg(
        Annotation::literal([json!("x"), json!("y")]),
        "l",
    ));
    assert_eq!(several.schema_type, Some(SchemaType::String));
    assert_eq!(several.r#enum, Some(vec![json!("x"), json!("y")]));

    let nested = Annotation::Literal(vec![
        spectra::LiteralArg::Literal(vec![json!(1).into(), json!(2).into()]),
        json!(3).into(),
    ]);
    let nested = resolve(&FieldDefinition::from_kwarg(nested, "l"));
    assert_eq!(nested.schema_type, Some(SchemaType::Integer));
    assert_eq!(nested.r#enum, Some(vec![json!(1), json!(2), json!(3)]));
}

#[test]
fn test_optional_wraps_with_null_first() {
    let schema = resolve(&FieldDefinition::from_kwarg(
        Annotation::optional(Builtin::Int.into()),
        "count",
    ));
    assert_eq!(
        schema.one_of,
        Some(vec![
            SchemaRef::inline(Schema::null()),
            SchemaRef::inline(Schema::integer()),
        ])
    );
}

#[test]
fn test_optional_record_keeps_the_reference() {
    let mut registry = SchemaRegistry::new();
    let field = FieldDefinition::from_kwarg(Annotation::optional(abc_record("model")), "abc");
    let result = resolve_with(&mut registry, &SchemaConfig::default(), &field).unwrap();
    let schema = result.as_schema().unwrap();
    assert_eq!(
        schema.one_of,
        Some(vec![
            SchemaRef::inline(Schema::null()),
            SchemaRef::Ref(Reference::schema("Abc")),
        ])
    );
}

#[test]
fn test_same_record_twice_is_one_component() {
    let record = abc_record("model");
    let mut registry = SchemaRegistry::new();
    let mut creator = SchemaCreator::new(&mut registry, &SchemaConfig::default());
    let first = creator
        .for_field_definition(&FieldDefinition::from_kwarg(record.clone(), "first"), None)
        .unwrap();
    let second = creator
        .for_field_definition(&FieldDefinition::from_kwarg(record, "second"), None)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, SchemaRef::Ref(Reference::schema("Abc")));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_different_shapes_under_one_title_collide() {
    let first = Annotation::record(RecordType::new(
        "Pet",
        RecordBody::DataClass(vec![DataClassField::new("name", Builtin::Str.into())]),
    ));
    let second = Annotation::record(
        RecordType::new(
            "Pet",
            RecordBody::DataClass(vec![DataClassField::new("legs", Builtin::Int.into())]),
        )
        .with_qualified_name("zoo.Pet"),
    );

    let mut registry = SchemaRegistry::new();
    let mut creator = SchemaCreator::new(&mut registry, &SchemaConfig::default());
    creator
        .for_field_definition(&FieldDefinition::from_kwarg(first, "pet"), None)
        .unwrap();
    let err = creator
        .for_field_definition(&FieldDefinition::from_kwarg(second, "pet"), None)
        .unwrap_err();

    match err {
        SchemaError::TitleCollision {
            title,
            first,
            second,
        } => {
            assert_eq!(title, "Pet");
            assert!(first.contains("\"name\""));
            assert!(second.contains("\"legs\""));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_numeric_bounds_propagate() {
    let kwarg = KwargDefinition {
        ge: Some(5.0),
        lt: Some(10.0),
        ..Default::default()
    };
    let field = FieldDefinition::from_kwarg(Builtin::Int.into(), "n").with_kwarg_definition(kwarg);
    assert_json_snapshot!(resolve(&field), @r#"
    {
      "type": "integer",
      "minimum": 5,
      "exclusiveMaximum": 10
    }
    "#);
}

#[test]
fn test_schemas_sort_before_references() {
    let schema1 = SchemaRef::inline(Schema::string());
    let reference1 = SchemaRef::Ref(Reference::schema("Pet"));
    let schema2 = SchemaRef::inline(Schema::integer());

    let sorted = sort_schemas_and_references(vec![
        schema1.clone(),
        reference1.clone(),
        schema2.clone(),
    ]);
    assert_eq!(sorted, vec![schema1, schema2, reference1]);
}

#[test]
fn test_union_members_are_ordered() {
    let field = FieldDefinition::from_kwarg(
        Annotation::Union(vec![
            Builtin::Str.into(),
            abc_record("model"),
            Builtin::Int.into(),
        ]),
        "mixed",
    );
    let schema = resolve_detached(&field);
    assert_eq!(
        schema.one_of,
        Some(vec![
            SchemaRef::inline(Schema::string()),
            SchemaRef::inline(Schema::integer()),
            SchemaRef::Ref(Reference::schema("Abc")),
        ])
    );
}

fn resolve_detached(field: &FieldDefinition) -> Schema {
    let mut registry = SchemaRegistry::new();
    resolve_with(&mut registry, &SchemaConfig::default(), field)
        .unwrap()
        .as_schema()
        .cloned()
        .unwrap()
}

#[rstest]
#[case("model")]
#[case("attrs")]
#[case("struct")]
#[case("dataclass")]
#[case("typed_mapping")]
fn test_required_fields_per_convention(#[case] kind: &str) {
    let mut registry = SchemaRegistry::new();
    let field = FieldDefinition::from_kwarg(abc_record(kind), "abc");
    resolve_with(&mut registry, &SchemaConfig::default(), &field).unwrap();

    let schema = registry.get("Abc").unwrap();
    assert_eq!(schema.required, Some(vec!["a".to_string()]));
    let keys: Vec<&str> = schema
        .properties
        .as_ref()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn test_record_component_snapshot() {
    let mut registry = SchemaRegistry::new();
    let field = FieldDefinition::from_kwarg(abc_record("model"), "abc");
    resolve_with(&mut registry, &SchemaConfig::default(), &field).unwrap();
    assert_json_snapshot!(registry.into_components(), @r##"
    {
      "schemas": {
        "Abc": {
          "type": "object",
          "title": "Abc",
          "properties": {
            "a": {
              "type": "integer"
            },
            "b": {
              "type": "string"
            },
            "c": {
              "oneOf": [
                {
                  "type": "null"
                },
                {
                  "type": "integer"
                }
              ]
            }
          },
          "required": [
            "a"
          ]
        }
      }
    }
    "##);
}

#[test]
fn test_purpose_suffix_in_title() {
    let mut registry = SchemaRegistry::new();
    let result = SchemaCreator::new(&mut registry, &SchemaConfig::default())
        .for_field_definition(
            &FieldDefinition::from_kwarg(abc_record("model"), "body"),
            Some(SchemaPurpose::ResponseBody),
        )
        .unwrap();
    assert_eq!(result, SchemaRef::Ref(Reference::schema("AbcResponseBody")));
    assert!(registry.contains("AbcResponseBody"));
}

#[rstest]
#[case(true, "userId")]
#[case(false, "user_id")]
fn test_alias_preference(#[case] prefer_alias: bool, #[case] expected: &str) {
    let record = Annotation::record(RecordType::new(
        "User",
        RecordBody::Model(ModelBody {
            fields: vec![ModelField::new("user_id", Builtin::Int.into()).alias("userId")],
            ..ModelBody::default()
        }),
    ));
    let config = SchemaConfig {
        prefer_alias,
        ..SchemaConfig::default()
    };
    let mut registry = SchemaRegistry::new();
    resolve_with(&mut registry, &config, &FieldDefinition::from_kwarg(record, "user")).unwrap();

    let schema = registry.get("User").unwrap();
    assert!(schema.properties.as_ref().unwrap().contains_key(expected));
    assert_eq!(schema.required, Some(vec![expected.to_string()]));
}

#[test]
fn test_self_referential_record_terminates() {
    let node = Arc::new(RecordType::declare("Node"));
    node.define(RecordBody::DataClass(vec![
        DataClassField::new("value", Builtin::Int.into()),
        DataClassField::new(
            "children",
            Annotation::list(Annotation::Record(Arc::clone(&node))),
        )
        .default_factory(),
    ]))
    .unwrap();

    let mut registry = SchemaRegistry::new();
    let field = FieldDefinition::from_kwarg(Annotation::Record(Arc::clone(&node)), "tree");
    let result = resolve_with(&mut registry, &SchemaConfig::default(), &field).unwrap();
    assert_eq!(result, SchemaRef::Ref(Reference::schema("Node")));

    let schema = registry.get("Node").unwrap();
    let children = schema.properties.as_ref().unwrap()["children"]
        .as_schema()
        .unwrap();
    assert_eq!(
        children.items.as_deref(),
        Some(&SchemaRef::Ref(Reference::schema("Node")))
    );
    assert_eq!(schema.required, Some(vec!["value".to_string()]));
}

#[test]
fn test_renamed_self_referential_record_has_no_dangling_reference() {
    let node = Arc::new(RecordType::declare("Node"));
    node.define(RecordBody::DataClass(vec![
        DataClassField::new("value", Builtin::Int.into()),
        DataClassField::new(
            "children",
            Annotation::list(Annotation::Record(Arc::clone(&node))),
        ),
    ]))
    .unwrap();

    let kwarg = KwargDefinition {
        title: Some("Tree".into()),
        ..Default::default()
    };
    let field = FieldDefinition::from_kwarg(Annotation::Record(Arc::clone(&node)), "tree")
        .with_kwarg_definition(kwarg);
    let mut registry = SchemaRegistry::new();
    let result = resolve_with(&mut registry, &SchemaConfig::default(), &field).unwrap();
    assert_eq!(result, SchemaRef::Ref(Reference::schema("Tree")));

    let tree = registry.get("Tree").unwrap();
    let children = tree.properties.as_ref().unwrap()["children"]
        .as_schema()
        .unwrap();
    let Some(SchemaRef::Ref(inner)) = children.items.as_deref() else {
        panic!("children items should reference a component: {children:?}");
    };
    let target = registry.resolve(inner).unwrap();
    assert_eq!(target.title.as_deref(), Some("Node"));
    assert_eq!(target.properties, tree.properties);
}

#[test]
fn test_unmappable_parameterized_type() {
    let annotation = Annotation::Parameterized {
        name: "Repository".into(),
        args: vec![Builtin::Int.into()],
    };
    let mut registry = SchemaRegistry::new();
    let err = resolve_with(
        &mut registry,
        &SchemaConfig::default(),
        &FieldDefinition::from_kwarg(annotation, "repo"),
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnmappableType { ref name, .. } if name == "repo"));
    assert!(err.to_string().contains("could not be mapped"));
}

#[test]
fn test_unknown_named_type_is_open_schema() {
    let schema = resolve(&FieldDefinition::from_kwarg(Annotation::named("acme.Widget"), "w"));
    assert!(schema.is_empty());
}

#[test]
fn test_model_extension_types() {
    let schema = resolve(&FieldDefinition::from_kwarg(
        Annotation::named("pydantic.EmailStr"),
        "email",
    ));
    assert_eq!(schema.schema_type, Some(SchemaType::String));
    assert_eq!(schema.format.as_deref(), Some("email"));
}

struct MoneyPlugin;

impl OpenApiSchemaPlugin for MoneyPlugin {
    fn is_plugin_supported_type(&self, annotation: &Annotation) -> bool {
        matches!(annotation, Annotation::Named(name) if name == "acme.Money" || name == "acme.Boxed")
    }

    fn to_openapi_schema(&self, annotation: &Annotation) -> PluginSchema {
        match annotation {
            Annotation::Named(name) if name == "acme.Boxed" => {
                PluginSchema::DataContainer(Annotation::list(Builtin::Int.into()))
            }
            _ => PluginSchema::Schema(Schema {
                pattern: Some(r"^\d+\.\d{2}$".into()),
                ..Schema::string()
            }),
        }
    }
}

#[test]
fn test_plugin_schema_and_data_container() {
    let mut registry = SchemaRegistry::new();
    let mut creator =
        SchemaCreator::new(&mut registry, &SchemaConfig::default()).with_plugin(MoneyPlugin);

    let money = creator
        .for_field_definition(&FieldDefinition::from_kwarg(Annotation::named("acme.Money"), "price"), None)
        .unwrap();
    assert_eq!(
        money.as_schema().and_then(|schema| schema.pattern.as_deref()),
        Some(r"^\d+\.\d{2}$")
    );

    let boxed = creator
        .for_field_definition(&FieldDefinition::from_kwarg(Annotation::named("acme.Boxed"), "ids"), None)
        .unwrap();
    assert_eq!(
        boxed.as_schema().cloned(),
        Some(Schema::array(SchemaRef::inline(Schema::integer())))
    );
}

#[test]
fn test_classic_pagination_shape() {
    let field = FieldDefinition::from_kwarg(
        Annotation::Pagination(PaginationKind::Classic, vec![Builtin::Str.into()]),
        "page",
    );
    assert_json_snapshot!(resolve(&field), @r#"
    {
      "type": "object",
      "properties": {
        "items": {
          "type": "array",
          "items": {
            "type": "string"
          }
        },
        "page_size": {
          "type": "integer",
          "description": "Number of items per page."
        },
        "current_page": {
          "type": "integer",
          "description": "Current page number."
        },
        "total_pages": {
          "type": "integer",
          "description": "Total number of pages."
        }
      }
    }
    "#);
}

#[test]
fn test_offset_pagination_of_records() {
    let mut registry = SchemaRegistry::new();
    let field = FieldDefinition::from_kwarg(
        Annotation::Pagination(PaginationKind::Offset, vec![abc_record("attrs")]),
        "page",
    );
    let result = resolve_with(&mut registry, &SchemaConfig::default(), &field).unwrap();
    let properties = result.as_schema().unwrap().properties.clone().unwrap();
    assert_eq!(
        properties["items"],
        SchemaRef::inline(Schema::array(SchemaRef::Ref(Reference::schema("Abc"))))
    );
    assert_eq!(
        properties.keys().map(String::as_str).collect::<Vec<_>>(),
        ["items", "limit", "offset", "total"]
    );
    assert!(registry.contains("Abc"));
}

#[test]
fn test_generated_examples_satisfy_bounds() {
    let config = SchemaConfig {
        generate_examples: true,
        example_seed: Some(11),
        ..SchemaConfig::default()
    };
    let kwarg = KwargDefinition {
        ge: Some(5.0),
        lt: Some(10.0),
        ..Default::default()
    };
    let field = FieldDefinition::from_kwarg(Builtin::Int.into(), "n").with_kwarg_definition(kwarg);
    let mut registry = SchemaRegistry::new();
    let result = resolve_with(&mut registry, &config, &field).unwrap();
    let examples = result.as_schema().unwrap().examples.clone().unwrap();
    let value = examples[0].as_i64().unwrap();
    assert!((5..10).contains(&value), "{value}");
}

#[test]
fn test_same_record_twice_with_generated_examples() {
    let config = SchemaConfig {
        generate_examples: true,
        example_seed: Some(7),
        ..SchemaConfig::default()
    };
    let pet = Annotation::record(RecordType::new(
        "Pet",
        RecordBody::DataClass(vec![
            DataClassField::new("id", Builtin::Int.into()),
            DataClassField::new("name", Builtin::Str.into()).default_value(json!("x")),
        ]),
    ));
    let mut registry = SchemaRegistry::new();
    let mut creator = SchemaCreator::new(&mut registry, &config);
    let first = creator
        .for_field_definition(&FieldDefinition::from_kwarg(pet.clone(), "pet"), None)
        .unwrap();
    let second = creator
        .for_field_definition(&FieldDefinition::from_kwarg(pet, "other"), None)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first, SchemaRef::Ref(Reference::schema("Pet")));
    assert_eq!(registry.len(), 1);
    assert!(registry.get("Pet").unwrap().examples.is_some());
}

#[test]
fn test_declared_examples_are_kept() {
    let config = SchemaConfig {
        generate_examples: true,
        example_seed: Some(1),
        ..SchemaConfig::default()
    };
    let kwarg = KwargDefinition {
        examples: Some(vec![json!("fixed")]),
        ..Default::default()
    };
    let field = FieldDefinition::from_kwarg(Builtin::Str.into(), "s").with_kwarg_definition(kwarg);
    let mut registry = SchemaRegistry::new();
    let result = resolve_with(&mut registry, &config, &field).unwrap();
    assert_eq!(result.as_schema().unwrap().examples, Some(vec![json!("fixed")]));
}

#[test]
fn test_config_from_toml_drives_the_creator() {
    let config = SchemaConfig::from_toml_str("prefer_alias = false\ninclude_model_extensions = false\n")
        .unwrap();
    let mut registry = SchemaRegistry::new();
    let creator = SchemaCreator::new(&mut registry, &config);
    assert!(!creator.prefer_alias());
    assert!(!creator.generate_examples());

    let schema = resolve_with(
        &mut SchemaRegistry::new(),
        &config,
        &FieldDefinition::from_kwarg(Annotation::named("pydantic.EmailStr"), "email"),
    )
    .unwrap();
    assert!(schema.as_schema().unwrap().is_empty());
}
