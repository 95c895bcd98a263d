use spectra_core::SchemaRef;

/// Order `oneOf`/`enum` members: inline schemas first, then references.
///
/// The sort is stable, so each group keeps its input order.
#[must_use]
pub fn sort_schemas_and_references(values: Vec<SchemaRef>) -> Vec<SchemaRef> {
    let (schemas, references): (Vec<_>, Vec<_>) = values
        .into_iter()
        .partition(|value| matches!(value, SchemaRef::Inline(_)));
    schemas.into_iter().chain(references).collect()
}

/// Component purpose of a record schema, reflected in its title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaPurpose {
    RequestBody,
    ResponseBody,
}

impl SchemaPurpose {
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::RequestBody => "RequestBody",
            Self::ResponseBody => "ResponseBody",
        }
    }
}

/// Title of a record schema: its name plus the purpose suffix.
#[must_use]
pub fn get_type_schema_name(name: &str, purpose: Option<SchemaPurpose>) -> String {
    match purpose {
        Some(purpose) => format!("{name}{}", purpose.suffix()),
        None => name.to_string(),
    }
}
