//! Field definitions: one typed site (parameter, return value or record field).

use serde_json::{Map, Value};

use super::{annotation::Annotation, kwarg::KwargDefinition};

/// A default value, or the sentinel for "no default"
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DefaultValue {
    #[default]
    Empty,
    Value(Value),
}

impl DefaultValue {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::Empty => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Description of one typed site.
///
/// Immutable once built: unwrapping an optional or a plugin data container
/// derives a new definition instead of changing this one.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    annotation: Annotation,
    name: String,
    default: DefaultValue,
    kwarg_definition: Option<KwargDefinition>,
    extra: Map<String, Value>,
    inner_types: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// Build a definition from a declared type and a name.
    pub fn from_kwarg(annotation: Annotation, name: impl Into<String>) -> Self {
        let name = name.into();
        let inner_types = match annotation {
            // single-value literal arguments would expand into themselves again
            Annotation::Literal(_) => annotation
                .type_args()
                .into_iter()
                .map(|arg| Self::leaf(arg, name.clone()))
                .collect(),
            _ => annotation
                .type_args()
                .into_iter()
                .map(|arg| Self::from_kwarg(arg, name.clone()))
                .collect(),
        };
        Self {
            inner_types,
            ..Self::leaf(annotation, name)
        }
    }

    fn leaf(annotation: Annotation, name: String) -> Self {
        Self {
            annotation,
            name,
            default: DefaultValue::Empty,
            kwarg_definition: None,
            extra: Map::new(),
            inner_types: Vec::new(),
        }
    }

    /// Build an unnamed definition, e.g. for a return annotation.
    #[must_use]
    pub fn from_annotation(annotation: Annotation) -> Self {
        Self::from_kwarg(annotation, "")
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = default.into();
        self
    }

    #[must_use]
    pub fn with_kwarg_definition(mut self, kwarg_definition: KwargDefinition) -> Self {
        self.kwarg_definition = Some(kwarg_definition);
        self
    }

    #[must_use]
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = extra;
        self
    }

    /// Same site, different declared type. Default, constraints and metadata carry over.
    #[must_use]
    pub fn derive_with_annotation(&self, annotation: Annotation) -> Self {
        let mut derived = Self::from_kwarg(annotation, self.name.clone());
        derived.default = self.default.clone();
        derived.kwarg_definition = self.kwarg_definition.clone();
        derived.extra = self.extra.clone();
        derived
    }

    #[must_use]
    pub const fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn default(&self) -> &DefaultValue {
        &self.default
    }

    #[must_use]
    pub const fn has_default(&self) -> bool {
        !self.default.is_empty()
    }

    #[must_use]
    pub const fn kwarg_definition(&self) -> Option<&KwargDefinition> {
        self.kwarg_definition.as_ref()
    }

    #[must_use]
    pub const fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    #[must_use]
    pub fn inner_types(&self) -> &[Self] {
        &self.inner_types
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.annotation.is_optional()
    }

    #[must_use]
    pub const fn is_union(&self) -> bool {
        self.annotation.is_union()
    }

    #[must_use]
    pub const fn is_generic(&self) -> bool {
        self.annotation.is_generic()
    }

    #[must_use]
    pub fn is_mapping(&self) -> bool {
        self.annotation
            .container_kind()
            .is_some_and(|kind| kind.is_mapping())
    }

    /// Sequences, sets, tuples and iterables. Strings are builtins, never containers.
    #[must_use]
    pub fn is_non_string_sequence(&self) -> bool {
        self.annotation
            .container_kind()
            .is_some_and(|kind| !kind.is_mapping())
    }

    #[must_use]
    pub const fn is_literal(&self) -> bool {
        matches!(self.annotation, Annotation::Literal(_))
    }

    /// The field only admits its default value.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.kwarg_definition.as_ref().is_some_and(|kwarg| kwarg.r#const)
    }

    /// Constrained type marker, or validation bounds on the field itself.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        matches!(self.annotation, Annotation::Constrained(_))
            || self
                .kwarg_definition
                .as_ref()
                .is_some_and(KwargDefinition::is_constrained)
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.is_optional() && !self.has_default() && self.annotation != Annotation::Any
    }
}
