//! A normalized dataset and the queries dashboards run against it.

use super::{aggregator, normalizer, series, table};
use crate::error::StatsResult;
use crate::models::{
    AggregationResult, CategoryValues, DatasetOverview, RankEntry, Record, Selector, Series,
    TablePage, YearRange, YearTotal,
};
use crate::schema::CategorySchema;
use serde_json::{Map, Value};
use tracing::debug;

/// Parameters of a full dashboard query.
#[derive(Debug, Clone)]
pub struct Query {
    pub range: YearRange,
    pub selector: Selector,
    pub category: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

/// Immutable records of one dataset.
///
/// Every query is recomputed from the records; nothing is cached, so a
/// dataset is rebuilt after each store mutation.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: CategorySchema,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(schema: CategorySchema, records: Vec<Record>) -> Self {
        Self { schema, records }
    }

    /// Normalize raw documents into a dataset.
    pub fn from_raw(schema: CategorySchema, raws: &[Map<String, Value>]) -> Self {
        let records = normalizer::normalize_all(raws, &schema);
        let dataset = Self::new(schema, records);
        debug!(
            "Normalized {} records for '{}' ({} without a year)",
            dataset.records.len(),
            dataset.schema.name,
            dataset.records_without_year()
        );
        dataset
    }

    pub fn schema(&self) -> &CategorySchema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records excluded from every view for lacking a year.
    pub fn records_without_year(&self) -> usize {
        self.records.iter().filter(|r| r.year.is_none()).count()
    }

    /// Smallest and largest observed year.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let years = self.records.iter().filter_map(|r| r.year);
        let min = years.clone().min()?;
        let max = years.max()?;
        Some((min, max))
    }

    /// Range from optional bounds, falling back to the observed years.
    pub fn range_or_observed(&self, from: Option<i32>, to: Option<i32>) -> YearRange {
        let (min, max) = self.year_bounds().unwrap_or((i32::MIN, i32::MAX));
        YearRange::new(from.unwrap_or(min), to.unwrap_or(max))
    }

    /// Records inside `range`, or all of them.
    fn subset(&self, range: Option<YearRange>) -> Vec<Record> {
        match range {
            Some(range) => table::filter_by_range(&self.records, range),
            None => self.records.clone(),
        }
    }

    pub fn table(&self, range: YearRange, page: usize, page_size: usize) -> TablePage {
        table::paginate(&self.records, range, page, page_size)
    }

    pub fn totals(&self, range: Option<YearRange>, selector: Selector) -> CategoryValues {
        aggregator::totals(&self.subset(range), &self.schema, selector)
    }

    pub fn ranking(&self, range: Option<YearRange>, selector: Selector) -> Vec<RankEntry> {
        aggregator::ranking(&self.totals(range, selector), &self.schema)
    }

    pub fn series(&self, range: Option<YearRange>, category: Option<&str>) -> StatsResult<Series> {
        series::project(&self.subset(range), &self.schema, category)
    }

    pub fn yearly_totals(&self, range: Option<YearRange>) -> Vec<YearTotal> {
        series::yearly_totals(&self.subset(range))
    }

    /// Record counts and all-year totals.
    pub fn overview(&self) -> DatasetOverview {
        let totals = self.totals(None, Selector::Total);
        DatasetOverview {
            dataset: self.schema.name.clone(),
            collection: self.schema.collection.clone(),
            records_loaded: self.records.len(),
            records_without_year: self.records_without_year(),
            total: totals.sum(),
            totals,
        }
    }

    /// Run every view of a dashboard for one query.
    pub fn summary(&self, query: &Query) -> StatsResult<AggregationResult> {
        let subset = self.subset(Some(query.range));
        let totals = aggregator::totals(&subset, &self.schema, query.selector);
        let ranking = aggregator::ranking(&totals, &self.schema);
        let group_totals = aggregator::group_totals(&totals, &self.schema);
        let series = series::project(&subset, &self.schema, query.category.as_deref())?;

        Ok(AggregationResult {
            dataset: self.schema.name.clone(),
            selector: query.selector,
            range: query.range,
            totals,
            ranking,
            group_totals,
            series,
            yearly_totals: series::yearly_totals(&subset),
            table: self.table(query.range, query.page, query.page_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Category;
    use serde_json::json;

    fn dataset() -> Dataset {
        let schema = CategorySchema::new(
            "civil-status",
            "civilStatus",
            vec![
                Category::new("single", "Single"),
                Category::new("married", "Married"),
            ],
        )
        .unwrap();

        let raws: Vec<Map<String, Value>> = [
            json!({"id": "a", "year": 2019, "single": 10, "married": 5}),
            json!({"id": "b", "year": "2020", "single": "20", "married": 15}),
            json!({"id": "c", "year": "unknown", "single": 99}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();

        Dataset::from_raw(schema, &raws)
    }

    #[test]
    fn test_from_raw_counts() {
        let dataset = dataset();
        assert_eq!(dataset.records().len(), 3);
        assert_eq!(dataset.records_without_year(), 1);
        assert_eq!(dataset.year_bounds(), Some((2019, 2020)));
    }

    #[test]
    fn test_range_or_observed() {
        let dataset = dataset();
        assert_eq!(dataset.range_or_observed(None, None), YearRange::new(2019, 2020));
        assert_eq!(
            dataset.range_or_observed(Some(1981), None),
            YearRange::new(1981, 2020)
        );
    }

    #[test]
    fn test_range_limits_totals() {
        let dataset = dataset();
        let totals = dataset.totals(Some(YearRange::new(2020, 2020)), Selector::Total);
        assert_eq!(totals.get("single"), Some(20.0));

        let all = dataset.totals(None, Selector::Total);
        assert_eq!(all.get("single"), Some(30.0));
    }

    #[test]
    fn test_summary() {
        let dataset = dataset();
        let result = dataset
            .summary(&Query {
                range: YearRange::new(2019, 2020),
                selector: Selector::Total,
                category: Some("married".to_string()),
                page: 1,
                page_size: 10,
            })
            .unwrap();

        assert_eq!(result.totals.get("married"), Some(20.0));
        assert_eq!(result.ranking[0].key, "single");
        assert_eq!(result.series.len(), 2);
        assert_eq!(result.yearly_totals.len(), 2);
        assert_eq!(result.table.total_rows, 2);
        assert_eq!(result.table.rows[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_summary_unknown_category() {
        let dataset = dataset();
        let query = Query {
            range: YearRange::new(2019, 2020),
            selector: Selector::Total,
            category: Some("widower".to_string()),
            page: 1,
            page_size: 10,
        };
        assert!(dataset.summary(&query).is_err());
    }

    #[test]
    fn test_overview_skips_undated_records() {
        let overview = dataset().overview();
        assert_eq!(overview.dataset, "civil-status");
        assert_eq!(overview.records_loaded, 3);
        assert_eq!(overview.records_without_year, 1);
        assert_eq!(overview.totals.get("single"), Some(30.0));
        assert_eq!(overview.total, 50.0);
    }

    #[test]
    fn test_emigrant_population_sheet_series() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join("emigrant_population.xlsx");
        let raws = crate::ingest::parse_file(&path).unwrap();
        let catalog = crate::schema::Catalog::builtin().unwrap();
        let schema = catalog.get("emigrant-population").unwrap().clone();
        let dataset = Dataset::from_raw(schema, &raws);

        let series = dataset.series(None, Some("emigrants")).unwrap();
        match series {
            Series::Single { points, label, .. } => {
                assert_eq!(label, "Emigrants");
                let values: Vec<(i32, f64)> = points.iter().map(|p| (p.year, p.value)).collect();
                assert_eq!(values, vec![(1981, 48867.0), (1982, 0.0), (1983, 51500.5)]);
            }
            other => panic!("unexpected series: {:?}", other),
        }
        assert_eq!(dataset.overview().total, 100367.5);
    }

    #[test]
    fn test_empty_dataset_bounds() {
        let schema = dataset().schema().clone();
        let empty = Dataset::new(schema, Vec::new());
        assert_eq!(empty.year_bounds(), None);
        assert_eq!(empty.table(empty.range_or_observed(None, None), 1, 10).total_pages, 1);
    }
}
