use thiserror::Error;

/// Errors raised while compiling field definitions into schemas.
///
/// All of them are configuration errors: the caller has to change a type or a
/// name, retrying does not help.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(
        "Parameter '{name}' with type '{annotation}' could not be mapped to an OpenAPI type. \
         This can occur if a user-defined generic type is resolved as a parameter. \
         If '{name}' should not be documented as a parameter, declare it as a dependency instead."
    )]
    UnmappableType { name: String, annotation: String },

    #[error(
        "Two different schemas with the title {title} have been defined.\n\n\
         first: {first}\nsecond: {second}\n\n\
         To fix this issue, either rename the types from which these titles are derived \
         or set an explicit title."
    )]
    TitleCollision {
        title: String,
        first: String,
        second: String,
    },

    #[error("literal type declares no values")]
    EmptyLiteral,

    #[error("record type '{name}' was declared but never defined")]
    UndefinedRecord { name: String },

    #[error("invalid schema configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),
}
