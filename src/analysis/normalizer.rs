//! Record normalization.
//!
//! Documents from the store and rows from uploaded files carry arbitrary
//! field casings. Everything passes through [`normalize`] before it is
//! aggregated; the normalizer is the only place aliases are reconciled.

use crate::error::{StatsError, StatsResult};
use crate::models::{CategoryValues, Record};
use crate::schema::CategorySchema;
use serde_json::{Map, Value};

/// Field names probed for the year, in order.
const YEAR_PROBES: &[&str] = &["year", "YEAR", "Year"];

/// Convert a raw document into a [`Record`] conforming to `schema`.
///
/// Never fails: missing or non-numeric values become `0`, and an unparseable
/// year becomes `None`.
pub fn normalize(raw: &Map<String, Value>, schema: &CategorySchema) -> Record {
    let values = schema
        .categories
        .iter()
        .map(|category| {
            let value = lookup(raw, category.probes()).map_or(0.0, coerce_number);
            (category.key.clone(), value)
        })
        .collect();

    Record {
        id: raw.get("id").and_then(coerce_id),
        year: coerce_year(lookup(raw, YEAR_PROBES.iter().copied())),
        values: CategoryValues::new(values),
    }
}

/// Normalize a batch, preserving input order.
pub fn normalize_all(raws: &[Map<String, Value>], schema: &CategorySchema) -> Vec<Record> {
    raws.iter().map(|raw| normalize(raw, schema)).collect()
}

/// Build a record from `KEY=VALUE` pairs typed by an operator.
///
/// Keys may be any spelling the normalizer would accept, but a key matching no
/// category is an error rather than a silently dropped value.
pub fn record_from_assignments(
    schema: &CategorySchema,
    year: i32,
    assignments: &[(String, String)],
) -> StatsResult<Record> {
    let mut raw = Map::new();
    raw.insert("year".to_string(), Value::from(year));

    for (key, value) in assignments {
        let folded = fold_key(key);
        let known = schema
            .categories
            .iter()
            .any(|c| c.probes().any(|probe| probe == key || fold_key(probe) == folded));
        if !known {
            return Err(StatsError::UnknownCategory {
                dataset: schema.name.clone(),
                category: key.clone(),
            });
        }
        raw.insert(key.clone(), Value::String(value.clone()));
    }

    Ok(normalize(&raw, schema))
}

/// First defined, non-null value among the probes.
///
/// Exact field names are tried first, in probe order. Only when none of them
/// is present are field names compared after [`fold_key`].
fn lookup<'a, 'p>(
    raw: &'a Map<String, Value>,
    probes: impl Iterator<Item = &'p str> + Clone,
) -> Option<&'a Value> {
    let exact = probes
        .clone()
        .filter_map(|probe| raw.get(probe))
        .find(|value| !value.is_null());
    if exact.is_some() {
        return exact;
    }

    probes.map(fold_key).find_map(|folded| {
        raw.iter()
            .find(|(field, value)| !value.is_null() && fold_key(field) == folded)
            .map(|(_, value)| value)
    })
}

/// Lowercase alphanumerics only: `"Not Reported"`, `"not_reported"` and
/// `"notReported"` all fold to `"notreported"`.
pub fn fold_key(field: &str) -> String {
    field
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Numeric coercion used for every category value.
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Integral year, or `None` for anything else.
pub fn coerce_year(value: Option<&Value>) -> Option<i32> {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        _ => None,
    }?;

    if number.is_finite()
        && number.fract() == 0.0
        && number >= i32::MIN as f64
        && number <= i32::MAX as f64
    {
        Some(number as i32)
    } else {
        None
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Document id as text; numeric ids from legacy imports become strings.
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
