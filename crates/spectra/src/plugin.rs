//! Third-party types that bring their own schema.

use spectra_core::Schema;

use crate::typing::Annotation;

/// What a plugin hands back for a supported type
#[derive(Debug, Clone, PartialEq)]
pub enum PluginSchema {
    Schema(Schema),
    /// The type only wraps another one; resolve the contained type instead
    DataContainer(Annotation),
}

/// Schema provider for types the compiler does not know.
///
/// Plugins are consulted in registration order and the first one that supports
/// a type wins.
pub trait OpenApiSchemaPlugin: Send + Sync {
    fn is_plugin_supported_type(&self, annotation: &Annotation) -> bool;

    fn to_openapi_schema(&self, annotation: &Annotation) -> PluginSchema;
}
