//! Randomized example values that satisfy a field's declared constraints.
//!
//! Values are drawn from a seedable generator, so a fixed seed reproduces the
//! same examples. A type the factory cannot produce a value for yields no example
//! instead of an invalid one.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use regex::Regex;
use regex_syntax::hir::{Class, Hir, HirKind};
use serde_json::{Map, Number, Value, json};
use tracing::trace;

use crate::{
    schema::enum_schema::flatten_literal_args,
    typing::{
        Annotation, Builtin, ContainerKind, FieldDefinition, KwargDefinition, PaginationKind,
        RecordType,
    },
};

/// Records nest at most this deep before optional fields are left out
const MAX_RECORD_DEPTH: usize = 3;
const PATTERN_ATTEMPTS: usize = 10;
/// Extra repetitions drawn for unbounded pattern quantifiers
const REPETITION_SPAN: u32 = 3;
const NUMBER_SPAN: f64 = 100.0;
/// 2020-01-01T00:00:00Z
const TIMESTAMP_ORIGIN: f64 = 1_577_836_800.0;
const TIMESTAMP_SPAN: f64 = 5.0 * 365.0 * 86_400.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
/// Longest string and largest collection the factory will build
const MAX_GENERATED_LENGTH: usize = 1024;
const MAX_GENERATED_ITEMS: usize = 64;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const MIXED: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Closed or open interval derived from `ge`/`gt`/`le`/`lt`
#[derive(Debug, Clone, Copy)]
struct Bounds {
    low: f64,
    low_exclusive: bool,
    high: f64,
    high_exclusive: bool,
}

impl Bounds {
    /// Missing ends extend `span` away from the present one, or cover
    /// `origin..=origin + span` when both are missing.
    fn from_kwarg(kwarg: &KwargDefinition, origin: f64, span: f64) -> Self {
        let lower = match (kwarg.ge, kwarg.gt) {
            (Some(ge), Some(gt)) if gt >= ge => Some((gt, true)),
            (Some(ge), _) => Some((ge, false)),
            (None, Some(gt)) => Some((gt, true)),
            (None, None) => None,
        };
        let upper = match (kwarg.le, kwarg.lt) {
            (Some(le), Some(lt)) if lt <= le => Some((lt, true)),
            (Some(le), _) => Some((le, false)),
            (None, Some(lt)) => Some((lt, true)),
            (None, None) => None,
        };
        let ((low, low_exclusive), (high, high_exclusive)) = match (lower, upper) {
            (Some(lower), Some(upper)) => (lower, upper),
            (Some(lower), None) => (lower, (lower.0 + span, false)),
            (None, Some(upper)) => ((upper.0 - span, false), upper),
            (None, None) => ((origin, false), (origin + span, false)),
        };
        Self {
            low,
            low_exclusive,
            high,
            high_exclusive,
        }
    }
}

/// Produces example values for field definitions
#[derive(Debug, Clone)]
pub struct ExampleFactory {
    rng: StdRng,
    prefer_alias: bool,
}

impl ExampleFactory {
    /// `seed` makes the generated values reproducible.
    #[must_use]
    pub fn new(seed: Option<u64>, prefer_alias: bool) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, prefer_alias }
    }

    /// Example values for `field`: one value, or none when nothing valid can be produced.
    pub fn create_examples_for_field(&mut self, field: &FieldDefinition) -> Vec<Value> {
        let value = self.create_value(field.annotation(), field.kwarg_definition(), 0);
        if value.is_none() {
            trace!(field = field.name(), annotation = %field.annotation(), "no example value");
        }
        value.into_iter().collect()
    }

    fn create_value(
        &mut self,
        annotation: &Annotation,
        constraints: Option<&KwargDefinition>,
        depth: usize,
    ) -> Option<Value> {
        if let Some(choices) = constraints
            .and_then(|kwarg| kwarg.r#enum.as_ref())
            .filter(|choices| !choices.is_empty())
        {
            return choices.choose(&mut self.rng).cloned();
        }

        match annotation {
            Annotation::None => Some(Value::Null),
            Annotation::Builtin(builtin) => self.builtin_value(*builtin, constraints),
            Annotation::Container(kind, args) => {
                self.container_value(*kind, args, constraints, depth)
            }
            Annotation::Union(members) => {
                let candidates: Vec<&Annotation> = members
                    .iter()
                    .filter(|member| **member != Annotation::None)
                    .collect();
                let value = candidates
                    .choose(&mut self.rng)
                    .and_then(|member| self.create_value(member, constraints, depth));
                match value {
                    None if annotation.is_optional() => Some(Value::Null),
                    value => value,
                }
            }
            Annotation::Literal(args) => {
                let mut values = Vec::new();
                flatten_literal_args(args, &mut values);
                values.choose(&mut self.rng).copied().cloned()
            }
            Annotation::Enum(enum_type) => {
                let values: Vec<&Value> = enum_type.values().collect();
                values.choose(&mut self.rng).copied().cloned()
            }
            Annotation::Record(record) => self.record_value(record, depth),
            Annotation::Pagination(kind, args) => self.pagination_value(*kind, args, depth),
            Annotation::Constrained(constrained) => {
                // field-level bounds replace the ones the type carries
                let constraints = constraints
                    .filter(|kwarg| kwarg.is_constrained())
                    .unwrap_or(&constrained.constraints);
                match (&constrained.base, &constrained.item_type) {
                    (Annotation::Container(kind, args), Some(item)) if args.is_empty() => self
                        .container_value(*kind, std::slice::from_ref(item), Some(constraints), depth),
                    (base, _) => self.create_value(base, Some(constraints), depth),
                }
            }
            Annotation::Any | Annotation::Named(_) | Annotation::Parameterized { .. } => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn builtin_value(
        &mut self,
        builtin: Builtin,
        constraints: Option<&KwargDefinition>,
    ) -> Option<Value> {
        let unconstrained = KwargDefinition::default();
        let kwarg = constraints.unwrap_or(&unconstrained);

        let value = match builtin {
            Builtin::Int => Value::from(self.integer_value(kwarg)?),
            Builtin::Float | Builtin::Decimal => {
                Value::Number(Number::from_f64(self.float_value(kwarg)?)?)
            }
            Builtin::Bool => Value::Bool(self.rng.gen_bool(0.5)),
            Builtin::Str | Builtin::Bytes | Builtin::ByteArray => {
                Value::String(self.string_value(kwarg)?)
            }
            Builtin::Date => {
                let bounds = Bounds::from_kwarg(kwarg, TIMESTAMP_ORIGIN, TIMESTAMP_SPAN);
                let timestamp = self.pick_multiple(&bounds, SECONDS_PER_DAY)?;
                let date = DateTime::<Utc>::from_timestamp(timestamp as i64, 0)?.date_naive();
                Value::String(date.format("%Y-%m-%d").to_string())
            }
            Builtin::DateTime => {
                let bounds = Bounds::from_kwarg(kwarg, TIMESTAMP_ORIGIN, TIMESTAMP_SPAN);
                let timestamp = self.pick_multiple(&bounds, 1.0)?;
                let datetime = DateTime::<Utc>::from_timestamp(timestamp as i64, 0)?;
                Value::String(datetime.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Builtin::Time => Value::String(format!(
                "{:02}:{:02}:{:02}",
                self.rng.gen_range(0..24),
                self.rng.gen_range(0..60),
                self.rng.gen_range(0..60)
            )),
            Builtin::TimeDelta => Value::String(format!("PT{}S", self.rng.gen_range(1..86_400))),
            Builtin::Uuid => {
                let mut bytes = [0u8; 16];
                self.rng.fill(&mut bytes);
                Value::String(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
            }
            Builtin::Path => Value::String(format!("/srv/data/{}", self.random_text(8, LOWER))),
            Builtin::Pattern => Value::String("^[a-z]+$".to_string()),
            Builtin::Ipv4Address => Value::String(format!(
                "10.{}.{}.{}",
                self.rng.gen_range(0..=255),
                self.rng.gen_range(0..=255),
                self.rng.gen_range(1..255)
            )),
            Builtin::Ipv4Interface => Value::String(format!(
                "10.{}.{}.{}/24",
                self.rng.gen_range(0..=255),
                self.rng.gen_range(0..=255),
                self.rng.gen_range(1..255)
            )),
            Builtin::Ipv4Network => Value::String(format!(
                "10.{}.{}.0/24",
                self.rng.gen_range(0..=255),
                self.rng.gen_range(0..=255)
            )),
            Builtin::Ipv6Address => {
                Value::String(format!("2001:db8::{:x}", self.rng.gen_range(1..=u16::MAX)))
            }
            Builtin::Ipv6Interface => {
                Value::String(format!("2001:db8::{:x}/64", self.rng.gen_range(1..=u16::MAX)))
            }
            Builtin::Ipv6Network => {
                Value::String(format!("2001:db8:{:x}::/48", self.rng.gen_range(1..=u16::MAX)))
            }
            Builtin::UploadFile => return None,
        };
        Some(value)
    }

    /// A multiple of `step` inside `bounds`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn pick_multiple(&mut self, bounds: &Bounds, step: f64) -> Option<f64> {
        if step <= 0.0 || !step.is_finite() {
            return None;
        }
        let mut first = (bounds.low / step).ceil();
        if bounds.low_exclusive && first * step <= bounds.low {
            first += 1.0;
        }
        let mut last = (bounds.high / step).floor();
        if bounds.high_exclusive && last * step >= bounds.high {
            last -= 1.0;
        }
        if !first.is_finite() || !last.is_finite() || first > last {
            return None;
        }
        let factor = self.rng.gen_range(first as i64..=last as i64);
        Some(factor as f64 * step)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn integer_value(&mut self, kwarg: &KwargDefinition) -> Option<i64> {
        let bounds = Bounds::from_kwarg(kwarg, 1.0, NUMBER_SPAN);
        let step = kwarg.multiple_of.unwrap_or(1.0);
        if step.fract() != 0.0 {
            return None;
        }
        self.pick_multiple(&bounds, step).map(|value| value as i64)
    }

    fn float_value(&mut self, kwarg: &KwargDefinition) -> Option<f64> {
        let bounds = Bounds::from_kwarg(kwarg, 0.0, NUMBER_SPAN);
        if let Some(multiple_of) = kwarg.multiple_of {
            return self.pick_multiple(&bounds, multiple_of);
        }
        if bounds.low < bounds.high {
            let fraction = self.rng.gen_range(0.05..0.95);
            return Some(bounds.low + (bounds.high - bounds.low) * fraction);
        }
        (bounds.low == bounds.high && !bounds.low_exclusive && !bounds.high_exclusive)
            .then_some(bounds.low)
    }

    fn random_text(&mut self, length: usize, alphabet: &[u8]) -> String {
        (0..length)
            .map(|_| char::from(alphabet[self.rng.gen_range(0..alphabet.len())]))
            .collect()
    }

    fn string_value(&mut self, kwarg: &KwargDefinition) -> Option<String> {
        let min = kwarg.min_length.unwrap_or(0);
        let max = kwarg.max_length.unwrap_or(min.saturating_add(12));
        if min > max || min > MAX_GENERATED_LENGTH {
            return None;
        }

        let fits = |text: &str| {
            let length = text.chars().count();
            length >= min
                && length <= max
                && (!kwarg.lower_case || text == text.to_lowercase())
                && (!kwarg.upper_case || text == text.to_uppercase())
        };

        if let Some(pattern) = &kwarg.pattern {
            return self.pattern_value(pattern, fits);
        }

        let alphabet = match (kwarg.lower_case, kwarg.upper_case) {
            (true, _) => LOWER,
            (false, true) => UPPER,
            (false, false) => MIXED,
        };
        let max = max.min(MAX_GENERATED_LENGTH);
        let length = self.rng.gen_range(min.max(4).min(max)..=max);
        Some(self.random_text(length, alphabet))
    }

    fn pattern_value(&mut self, pattern: &str, fits: impl Fn(&str) -> bool) -> Option<String> {
        let hir = regex_syntax::Parser::new().parse(pattern).ok()?;
        let regex = Regex::new(pattern).ok()?;
        for _ in 0..PATTERN_ATTEMPTS {
            let mut text = String::new();
            if sample_hir(&hir, &mut self.rng, &mut text).is_some()
                && regex.is_match(&text)
                && fits(&text)
            {
                return Some(text);
            }
        }
        trace!(pattern, "no matching example within the attempt limit");
        None
    }

    fn container_value(
        &mut self,
        kind: ContainerKind,
        args: &[Annotation],
        constraints: Option<&KwargDefinition>,
        depth: usize,
    ) -> Option<Value> {
        if kind.is_mapping() {
            let mut object = Map::new();
            if let Some(value_type) = args.get(1) {
                let key = match args.first().and_then(|key| self.create_value(key, None, depth)) {
                    Some(Value::String(key)) => key,
                    Some(other) => other.to_string(),
                    None => "key".to_string(),
                };
                if let Some(value) = self.create_value(value_type, None, depth) {
                    object.insert(key, value);
                }
            }
            return Some(Value::Object(object));
        }

        if kind == ContainerKind::Tuple && !args.is_empty() {
            return args
                .iter()
                .map(|arg| self.create_value(arg, None, depth))
                .collect::<Option<Vec<_>>>()
                .map(Value::Array);
        }

        let min = constraints.and_then(|kwarg| kwarg.min_items).unwrap_or(0);
        let max = constraints
            .and_then(|kwarg| kwarg.max_items)
            .unwrap_or(min.max(1).saturating_add(2));
        if min > max || min > MAX_GENERATED_ITEMS {
            return None;
        }
        if args.is_empty() {
            return (min == 0).then(|| Value::Array(Vec::new()));
        }

        let max = max.min(MAX_GENERATED_ITEMS);
        let count = self.rng.gen_range(min.max(1).min(max)..=max);
        let mut items: Vec<Value> = Vec::with_capacity(count);
        for _ in 0..count {
            let item_type = args.choose(&mut self.rng)?;
            let item = self.create_value(item_type, None, depth)?;
            if !kind.is_set_like() || !items.contains(&item) {
                items.push(item);
            }
        }
        (items.len() >= min).then_some(Value::Array(items))
    }

    fn record_value(&mut self, record: &RecordType, depth: usize) -> Option<Value> {
        if depth >= MAX_RECORD_DEPTH {
            return None;
        }
        let description = record.body()?.adapter().describe(self.prefer_alias);
        if let Some(example) = description
            .examples
            .and_then(|examples| examples.into_iter().next())
        {
            return Some(example);
        }

        let mut object = Map::new();
        for field in &description.fields {
            let definition = &field.definition;
            match self.create_value(
                definition.annotation(),
                definition.kwarg_definition(),
                depth + 1,
            ) {
                Some(value) => {
                    object.insert(field.key.clone(), value);
                }
                None if field.required => return None,
                None => {}
            }
        }
        Some(Value::Object(object))
    }

    fn pagination_value(
        &mut self,
        kind: PaginationKind,
        args: &[Annotation],
        depth: usize,
    ) -> Option<Value> {
        let item_index = match kind {
            PaginationKind::Cursor => 1,
            PaginationKind::Classic | PaginationKind::Offset => 0,
        };
        let items: Vec<Value> = args
            .get(item_index)
            .and_then(|item| self.create_value(item, None, depth))
            .into_iter()
            .collect();
        let total = items.len();

        let value = match kind {
            PaginationKind::Classic => json!({
                "items": items,
                "page_size": 10,
                "current_page": 1,
                "total_pages": 1,
            }),
            PaginationKind::Offset => json!({
                "items": items,
                "limit": 10,
                "offset": 0,
                "total": total,
            }),
            PaginationKind::Cursor => {
                let cursor = args
                    .first()
                    .and_then(|cursor| self.create_value(cursor, None, depth))
                    .unwrap_or(Value::Null);
                json!({
                    "items": items,
                    "results_per_page": 10,
                    "cursor": cursor,
                })
            }
        };
        Some(value)
    }
}

/// Append one string matched by `hir` to `out`; `None` when a class has no usable character.
fn sample_hir<R: Rng>(hir: &Hir, rng: &mut R, out: &mut String) -> Option<()> {
    match hir.kind() {
        HirKind::Empty | HirKind::Look(_) => {}
        HirKind::Literal(literal) => out.push_str(std::str::from_utf8(&literal.0).ok()?),
        HirKind::Class(Class::Unicode(class)) => {
            let ranges: Vec<(u32, u32)> = class
                .ranges()
                .iter()
                .map(|range| (u32::from(range.start()), u32::from(range.end())))
                .collect();
            out.push(pick_printable(&ranges, rng)?);
        }
        HirKind::Class(Class::Bytes(class)) => {
            let ranges: Vec<(u32, u32)> = class
                .ranges()
                .iter()
                .filter(|range| range.start().is_ascii())
                .map(|range| {
                    (
                        u32::from(range.start()),
                        u32::from(range.end().min(0x7f)),
                    )
                })
                .collect();
            out.push(pick_printable(&ranges, rng)?);
        }
        HirKind::Repetition(repetition) => {
            let most = repetition
                .max
                .unwrap_or(u32::MAX)
                .min(repetition.min.saturating_add(REPETITION_SPAN));
            for _ in 0..rng.gen_range(repetition.min..=most) {
                if out.len() > MAX_GENERATED_LENGTH {
                    return None;
                }
                sample_hir(&repetition.sub, rng, out)?;
            }
        }
        HirKind::Capture(capture) => sample_hir(&capture.sub, rng, out)?,
        HirKind::Concat(parts) => {
            for part in parts {
                sample_hir(part, rng, out)?;
            }
        }
        HirKind::Alternation(branches) => sample_hir(branches.choose(rng)?, rng, out)?,
    }
    Some(())
}

/// A character from `ranges`, visible ASCII when the class has any.
fn pick_printable<R: Rng>(ranges: &[(u32, u32)], rng: &mut R) -> Option<char> {
    let printable: Vec<(u32, u32)> = ranges
        .iter()
        .filter_map(|&(start, end)| {
            let (start, end) = (start.max(0x21), end.min(0x7e));
            (start <= end).then_some((start, end))
        })
        .collect();
    let &(start, end) = printable.choose(rng).or_else(|| ranges.choose(rng))?;
    char::from_u32(rng.gen_range(start..=end)).or_else(|| char::from_u32(start))
}
