//! Data models for the emigration statistics engine.
//!
//! This module contains the records, query parameters and derived views that
//! flow between the store, the aggregation engine and the report generator.

use crate::geo::ChoroplethCell;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Category values in schema order, serialized as a flat `{key: value}` map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryValues(Vec<(String, f64)>);

impl CategoryValues {
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self(entries)
    }

    /// All-zero values for the given keys.
    pub fn zeroed<'a>(keys: impl Iterator<Item = &'a str>) -> Self {
        Self(keys.map(|k| (k.to_string(), 0.0)).collect())
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Value at a schema position.
    pub fn at(&self, index: usize) -> f64 {
        self.0.get(index).map(|(_, v)| *v).unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum across every category.
    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, v)| v).sum()
    }

    /// Add another value set position by position.
    pub fn accumulate(&mut self, other: &CategoryValues) {
        for ((_, total), (_, value)) in self.0.iter_mut().zip(other.0.iter()) {
            *total += value;
        }
    }
}

impl Serialize for CategoryValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, &number_value(*value))?;
        }
        map.end()
    }
}

/// JSON number for a category value, integral values without a fraction.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        Value::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::from(0))
    }
}

/// One normalized yearly observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Store identifier, present once persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Temporal key; `None` when the source year was unparseable.
    pub year: Option<i32>,
    /// One value per schema category, in schema order.
    #[serde(flatten)]
    pub values: CategoryValues,
}

impl Record {
    /// Canonical document form: `id`, `year`, then every category.
    pub fn to_raw(&self) -> Map<String, Value> {
        let mut raw = Map::new();
        if let Some(ref id) = self.id {
            raw.insert("id".to_string(), Value::String(id.clone()));
        }
        raw.insert(
            "year".to_string(),
            self.year.map(Value::from).unwrap_or(Value::Null),
        );
        for (key, value) in self.values.iter() {
            raw.insert(key.to_string(), number_value(value));
        }
        raw
    }

    /// Sum of every category in this record.
    pub fn total(&self) -> f64 {
        self.values.sum()
    }
}

/// Closed interval of years, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Self {
        Self { from, to }
    }

    /// Records without a year never fall inside a range.
    pub fn contains(&self, year: Option<i32>) -> bool {
        matches!(year, Some(y) if self.from <= y && y <= self.to)
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Which records feed a totals/ranking query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selector {
    /// Every record of the subset.
    #[default]
    Total,
    /// The record for one year.
    Year(i32),
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("total") || s.eq_ignore_ascii_case("all") {
            return Ok(Selector::Total);
        }
        s.parse::<i32>()
            .map(Selector::Year)
            .map_err(|_| format!("expected 'total' or a year, got '{}'", s))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Total => write!(f, "total"),
            Selector::Year(year) => write!(f, "{}", year),
        }
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selector::Total => serializer.serialize_str("total"),
            Selector::Year(year) => serializer.serialize_i32(*year),
        }
    }
}

/// One paginated slice of the year-filtered table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePage {
    pub rows: Vec<Record>,
    /// 1-based, clamped into `[1, total_pages]`.
    pub current_page: usize,
    /// Never below 1.
    pub total_pages: usize,
    /// Rows that passed the year filter.
    pub total_rows: usize,
    pub page_size: usize,
}

/// One ranked category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankEntry {
    pub key: String,
    pub label: String,
    pub value: f64,
}

/// Sum of the categories sharing one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub group: String,
    pub value: f64,
    /// Categories in the group.
    pub categories: usize,
}

/// One row of an all-category series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub year: i32,
    #[serde(flatten)]
    pub values: CategoryValues,
}

/// One point of a single-category series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// Per-year values for charting, ascending by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Series {
    All {
        rows: Vec<SeriesRow>,
    },
    Single {
        category: String,
        label: String,
        points: Vec<SeriesPoint>,
    },
}

impl Series {
    /// Number of rows or points.
    pub fn len(&self) -> usize {
        match self {
            Series::All { rows } => rows.len(),
            Series::Single { points, .. } => points.len(),
        }
    }
}

/// Sum of every category for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
}

/// Everything a dashboard derives from one dataset query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    pub dataset: String,
    pub selector: Selector,
    pub range: YearRange,
    pub totals: CategoryValues,
    pub ranking: Vec<RankEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_totals: Vec<GroupTotal>,
    pub series: Series,
    pub yearly_totals: Vec<YearTotal>,
    pub table: TablePage,
}

/// Header written on top of every report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Dataset name.
    pub dataset: String,
    /// Store collection or source file the records came from.
    pub source: String,
    /// Records loaded before filtering.
    pub records_loaded: usize,
    /// Records dropped from every view for lacking a year.
    pub records_without_year: usize,
    pub generated_at: DateTime<Utc>,
}

/// Headline numbers of one dataset across every year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub dataset: String,
    pub collection: String,
    pub records_loaded: usize,
    pub records_without_year: usize,
    /// Sum of every category over every dated record.
    pub total: f64,
    pub totals: CategoryValues,
}

/// Landing view over every dataset in the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub generated_at: DateTime<Utc>,
    pub datasets: Vec<DatasetOverview>,
}

/// The view a report renders.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    Table {
        range: YearRange,
        page: TablePage,
    },
    Ranking {
        selector: Selector,
        range: YearRange,
        entries: Vec<RankEntry>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        groups: Vec<GroupTotal>,
    },
    Series {
        range: YearRange,
        series: Series,
        yearly_totals: Vec<YearTotal>,
    },
    Summary(AggregationResult),
    Map {
        selector: Selector,
        range: YearRange,
        cells: Vec<ChoroplethCell>,
    },
}

/// Complete report for one query.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub view: View,
}
