//! Time-series projection for trend charts.

use crate::error::StatsResult;
use crate::models::{Record, Series, SeriesPoint, SeriesRow, YearTotal};
use crate::schema::CategorySchema;

/// Records with a year, stably sorted ascending.
///
/// Duplicate years stay in input order; corrected rows coexist with the
/// originals until someone deletes one.
fn chronological(records: &[Record]) -> Vec<(i32, &Record)> {
    let mut dated: Vec<(i32, &Record)> = records
        .iter()
        .filter_map(|r| r.year.map(|year| (year, r)))
        .collect();
    dated.sort_by_key(|(year, _)| *year);
    dated
}

/// Project records into a chart series.
///
/// With `category` the series holds `{year, value}` points for that category,
/// otherwise one row per record carrying every category. Years missing from
/// the input are not filled in.
pub fn project(
    records: &[Record],
    schema: &CategorySchema,
    category: Option<&str>,
) -> StatsResult<Series> {
    let dated = chronological(records);

    match category {
        Some(key) => {
            let index = schema.require(key)?;
            let points = dated
                .into_iter()
                .map(|(year, record)| SeriesPoint {
                    year,
                    value: record.values.at(index),
                })
                .collect();

            Ok(Series::Single {
                category: key.to_string(),
                label: schema.label(key).to_string(),
                points,
            })
        }
        None => {
            let rows = dated
                .into_iter()
                .map(|(year, record)| SeriesRow {
                    year,
                    values: record.values.clone(),
                })
                .collect();

            Ok(Series::All { rows })
        }
    }
}

/// Sum of all categories per record, in chronological order.
pub fn yearly_totals(records: &[Record]) -> Vec<YearTotal> {
    chronological(records)
        .into_iter()
        .map(|(year, record)| YearTotal {
            year,
            total: record.total(),
        })
        .collect()
}
