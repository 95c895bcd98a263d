//! Declarative validation bounds and documentation overrides attached to a field.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde_json::Value;
use spectra_core::ExternalDocumentation;

/// Constraint specification of a parameter or body field.
///
/// Numeric bounds use the `ge`/`gt`/`le`/`lt` vocabulary; they map onto
/// `minimum`/`exclusiveMinimum`/`maximum`/`exclusiveMaximum`. Date and datetime
/// bounds are stored as Unix timestamps, see [`date_bound`] and [`datetime_bound`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KwargDefinition {
    pub ge: Option<f64>,
    pub gt: Option<f64>,
    pub le: Option<f64>,
    pub lt: Option<f64>,
    pub multiple_of: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub pattern: Option<String>,
    pub lower_case: bool,
    pub upper_case: bool,
    /// The field only admits its default value
    pub r#const: bool,
    pub content_encoding: Option<String>,
    pub default: Option<Value>,
    pub description: Option<String>,
    pub r#enum: Option<Vec<Value>>,
    pub examples: Option<Vec<Value>>,
    pub external_docs: Option<ExternalDocumentation>,
    pub format: Option<String>,
    pub title: Option<String>,
}

impl KwargDefinition {
    /// Whether any validation bound is declared.
    ///
    /// Documentation-only attributes (title, description, examples, ...) do not count.
    #[must_use]
    pub fn is_constrained(&self) -> bool {
        self.ge.is_some()
            || self.gt.is_some()
            || self.le.is_some()
            || self.lt.is_some()
            || self.multiple_of.is_some()
            || self.min_length.is_some()
            || self.max_length.is_some()
            || self.min_items.is_some()
            || self.max_items.is_some()
            || self.pattern.is_some()
            || self.lower_case
            || self.upper_case
    }
}

/// Midnight UTC of `date`, as a timestamp bound.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn date_bound(date: NaiveDate) -> f64 {
    date.and_hms_opt(0, 0, 0)
        .map_or(0.0, |midnight| midnight.and_utc().timestamp() as f64)
}

/// `datetime` as a (possibly fractional) timestamp bound.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn datetime_bound<Tz: TimeZone>(datetime: &DateTime<Tz>) -> f64 {
    datetime.timestamp_millis() as f64 / 1000.0
}
