//! Declared type identities.
//!
//! An [`Annotation`] is the runtime description of a declared type: a closed set of
//! builtin scalars, generic containers, unions, literal value sets, enumerations,
//! record types and the few wrapper shapes the schema compiler knows about.

use std::{fmt, sync::Arc};

use serde_json::Value;

use super::{kwarg::KwargDefinition, record::RecordType};

/// Scalar and well-known leaf types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Int,
    Float,
    Decimal,
    Bool,
    Str,
    Bytes,
    ByteArray,
    Date,
    DateTime,
    Time,
    TimeDelta,
    Uuid,
    Path,
    Pattern,
    Ipv4Address,
    Ipv4Interface,
    Ipv4Network,
    Ipv6Address,
    Ipv6Interface,
    Ipv6Network,
    UploadFile,
}

impl Builtin {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Decimal => "Decimal",
            Self::Bool => "bool",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::ByteArray => "bytearray",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::TimeDelta => "timedelta",
            Self::Uuid => "UUID",
            Self::Path => "Path",
            Self::Pattern => "Pattern",
            Self::Ipv4Address => "IPv4Address",
            Self::Ipv4Interface => "IPv4Interface",
            Self::Ipv4Network => "IPv4Network",
            Self::Ipv6Address => "IPv6Address",
            Self::Ipv6Interface => "IPv6Interface",
            Self::Ipv6Network => "IPv6Network",
            Self::UploadFile => "UploadFile",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Decimal)
    }

    #[must_use]
    pub const fn is_string_or_bytes(self) -> bool {
        matches!(self, Self::Str | Self::Bytes | Self::ByteArray)
    }

    /// Date and datetime; `time` and `timedelta` are durations, not points in time.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

/// Generic container constructors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Tuple,
    Set,
    FrozenSet,
    Deque,
    Sequence,
    MutableSequence,
    Iterable,
    Dict,
    DefaultDict,
    OrderedDict,
    Mapping,
    MutableMapping,
}

impl ContainerKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Set => "set",
            Self::FrozenSet => "frozenset",
            Self::Deque => "deque",
            Self::Sequence => "Sequence",
            Self::MutableSequence => "MutableSequence",
            Self::Iterable => "Iterable",
            Self::Dict => "dict",
            Self::DefaultDict => "defaultdict",
            Self::OrderedDict => "OrderedDict",
            Self::Mapping => "Mapping",
            Self::MutableMapping => "MutableMapping",
        }
    }

    #[must_use]
    pub const fn is_mapping(self) -> bool {
        matches!(
            self,
            Self::Dict | Self::DefaultDict | Self::OrderedDict | Self::Mapping | Self::MutableMapping
        )
    }

    #[must_use]
    pub const fn is_set_like(self) -> bool {
        matches!(self, Self::Set | Self::FrozenSet)
    }
}

/// The pagination wrappers that get a fixed object schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginationKind {
    /// `items`, `page_size`, `current_page`, `total_pages`
    Classic,
    /// `items`, `limit`, `offset`, `total`
    Offset,
    /// `items`, `cursor`, `results_per_page`; first type argument is the cursor type
    Cursor,
}

impl PaginationKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Classic => "ClassicPagination",
            Self::Offset => "OffsetPagination",
            Self::Cursor => "CursorPagination",
        }
    }
}

/// One argument of a literal type: a value or a nested literal
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralArg {
    Value(Value),
    Literal(Vec<LiteralArg>),
}

impl From<Value> for LiteralArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// An enumeration and its members in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<(String, Value)>,
}

impl EnumType {
    pub fn new<N, I, M>(name: N, members: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (M, Value)>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(member, value)| (member.into(), value))
                .collect(),
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.members.iter().map(|(_, value)| value)
    }
}

/// A type carrying its own validation bounds (`conint()`, `constr()`, `conlist()`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedType {
    pub name: String,
    /// Type being constrained: a builtin scalar or a container
    pub base: Annotation,
    /// Element type for constrained collections declared without type arguments
    pub item_type: Option<Annotation>,
    pub constraints: KwargDefinition,
}

/// A declared type
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Any,
    None,
    Builtin(Builtin),
    Container(ContainerKind, Vec<Annotation>),
    /// Union of members; a union containing [`Annotation::None`] is an optional
    Union(Vec<Annotation>),
    Literal(Vec<LiteralArg>),
    Enum(Arc<EnumType>),
    Record(Arc<RecordType>),
    Pagination(PaginationKind, Vec<Annotation>),
    Constrained(Arc<ConstrainedType>),
    /// Library extension or plugin-provided type, identified by its qualified name
    Named(String),
    /// A parameterized type that is neither a container nor a known generic wrapper
    Parameterized { name: String, args: Vec<Annotation> },
}

impl Annotation {
    #[must_use]
    pub const fn builtin(builtin: Builtin) -> Self {
        Self::Builtin(builtin)
    }

    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![inner, Self::None])
    }

    #[must_use]
    pub fn list(item: Self) -> Self {
        Self::Container(ContainerKind::List, vec![item])
    }

    #[must_use]
    pub fn set(item: Self) -> Self {
        Self::Container(ContainerKind::Set, vec![item])
    }

    #[must_use]
    pub fn dict(key: Self, value: Self) -> Self {
        Self::Container(ContainerKind::Dict, vec![key, value])
    }

    pub fn literal<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<LiteralArg>,
    {
        Self::Literal(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn enumeration(enum_type: EnumType) -> Self {
        Self::Enum(Arc::new(enum_type))
    }

    #[must_use]
    pub fn record(record: RecordType) -> Self {
        Self::Record(Arc::new(record))
    }

    #[must_use]
    pub fn constrained(constrained: ConstrainedType) -> Self {
        Self::Constrained(Arc::new(constrained))
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Union(members) if members.contains(&Self::None))
    }

    #[must_use]
    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    /// Generic wrappers whose type arguments parameterize a fixed shape
    #[must_use]
    pub const fn is_generic(&self) -> bool {
        matches!(self, Self::Pagination(..))
    }

    /// The union without its `None` members, collapsed when a single member remains.
    #[must_use]
    pub fn make_non_optional_union(&self) -> Self {
        match self {
            Self::Union(members) => {
                let mut rest: Vec<Self> = members
                    .iter()
                    .filter(|member| **member != Self::None)
                    .cloned()
                    .collect();
                match rest.len() {
                    0 => Self::None,
                    1 => rest.remove(0),
                    _ => Self::Union(rest),
                }
            }
            other => other.clone(),
        }
    }

    /// Ordered type arguments. Literal arguments become single-value literals.
    #[must_use]
    pub fn type_args(&self) -> Vec<Self> {
        match self {
            Self::Container(_, args)
            | Self::Union(args)
            | Self::Pagination(_, args)
            | Self::Parameterized { args, .. } => args.clone(),
            Self::Literal(args) => args
                .iter()
                .map(|arg| Self::Literal(vec![arg.clone()]))
                .collect(),
            Self::Constrained(constrained) => constrained.base.type_args(),
            Self::Any
            | Self::None
            | Self::Builtin(_)
            | Self::Enum(_)
            | Self::Record(_)
            | Self::Named(_) => Vec::new(),
        }
    }

    #[must_use]
    pub const fn as_builtin(&self) -> Option<Builtin> {
        match self {
            Self::Builtin(builtin) => Some(*builtin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Container(kind, _) => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Arc<RecordType>> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl From<Builtin> for Annotation {
    fn from(builtin: Builtin) -> Self {
        Self::Builtin(builtin)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Annotation]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("[")?;
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    f.write_str("]")
}

fn write_literal_args(f: &mut fmt::Formatter<'_>, args: &[LiteralArg]) -> fmt::Result {
    f.write_str("Literal[")?;
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        match arg {
            LiteralArg::Value(value) => write!(f, "{value}")?,
            LiteralArg::Literal(nested) => write_literal_args(f, nested)?,
        }
    }
    f.write_str("]")
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::None => f.write_str("None"),
            Self::Builtin(builtin) => f.write_str(builtin.name()),
            Self::Container(kind, args) => {
                f.write_str(kind.name())?;
                write_args(f, args)
            }
            Self::Union(members) => {
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Self::Literal(args) => write_literal_args(f, args),
            Self::Enum(enum_type) => f.write_str(&enum_type.name),
            Self::Record(record) => f.write_str(record.name()),
            Self::Pagination(kind, args) => {
                f.write_str(kind.name())?;
                write_args(f, args)
            }
            Self::Constrained(constrained) => f.write_str(&constrained.name),
            Self::Named(name) => f.write_str(name),
            Self::Parameterized { name, args } => {
                f.write_str(name)?;
                write_args(f, args)
            }
        }
    }
}
