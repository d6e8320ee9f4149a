//! Markdown report generation.
//!
//! This module renders reports for the query commands as Markdown tables,
//! or as JSON for other tools.

use crate::analysis::shares;
use crate::geo::ChoroplethCell;
use crate::models::{
    AggregationResult, GroupTotal, Overview, RankEntry, Record, Report, ReportMetadata, Series,
    TablePage, View, YearTotal,
};
use crate::schema::{Catalog, CategorySchema};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, schema: &CategorySchema) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# Emigration Statistics: {}\n\n", report.metadata.dataset));

    output.push_str(&generate_metadata_section(&report.metadata));

    match &report.view {
        View::Table { range, page } => {
            output.push_str(&format!("## Records ({})\n\n", range));
            output.push_str(&generate_table_section(page, schema));
        }
        View::Ranking {
            selector,
            range,
            entries,
            groups,
        } => {
            output.push_str(&format!("## Ranking ({}, {})\n\n", selector, range));
            output.push_str(&generate_ranking_section(entries));
            output.push_str(&generate_groups_section(groups));
        }
        View::Series {
            range,
            series,
            yearly_totals,
        } => {
            output.push_str(&format!("## Trend ({})\n\n", range));
            output.push_str(&generate_series_section(series, schema));
            output.push_str(&generate_yearly_totals_section(yearly_totals));
        }
        View::Summary(result) => {
            output.push_str(&generate_summary_section(result, schema));
        }
        View::Map {
            selector,
            range,
            cells,
        } => {
            output.push_str(&format!("## Map ({}, {})\n\n", selector, range));
            output.push_str(&generate_map_section(cells));
        }
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** {}\n", metadata.dataset));
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records Loaded:** {}\n",
        metadata.records_loaded
    ));
    if metadata.records_without_year > 0 {
        section.push_str(&format!(
            "- **Records Without Year:** {} (excluded)\n",
            metadata.records_without_year
        ));
    }
    section.push('\n');

    section
}

/// Generate the paginated records table.
fn generate_table_section(page: &TablePage, schema: &CategorySchema) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "*Page {} of {} | {} rows | {} per page*\n\n",
        page.current_page, page.total_pages, page.total_rows, page.page_size
    ));

    if page.rows.is_empty() {
        section.push_str("No records in this range.\n\n");
        return section;
    }

    section.push_str(&table_header(schema, &["ID"]));
    for record in &page.rows {
        section.push_str(&record_row(record));
    }
    section.push('\n');

    section
}

fn table_header(schema: &CategorySchema, extra: &[&str]) -> String {
    let mut header = String::from("| Year |");
    let mut rule = String::from("|:---:|");
    for category in &schema.categories {
        header.push_str(&format!(" {} |", category.label));
        rule.push_str("---:|");
    }
    for column in extra {
        header.push_str(&format!(" {} |", column));
        rule.push_str(":---|");
    }
    format!("{}\n{}\n", header, rule)
}

fn record_row(record: &Record) -> String {
    let mut row = format!(
        "| {} |",
        record.year.map_or_else(|| "-".to_string(), |y| y.to_string())
    );
    for (_, value) in record.values.iter() {
        row.push_str(&format!(" {} |", format_count(value)));
    }
    row.push_str(&format!(" `{}` |\n", record.id.as_deref().unwrap_or("-")));
    row
}

/// Generate the ranking table.
fn generate_ranking_section(entries: &[RankEntry]) -> String {
    let mut section = String::new();

    if entries.iter().all(|e| e.value == 0.0) {
        section.push_str("No data for this selection.\n\n");
        return section;
    }

    section.push_str("| # | Category | Emigrants | Share |\n");
    section.push_str("|:---:|:---|---:|---:|\n");

    let shares = shares(entries);
    for (i, (entry, (_, share))) in entries.iter().zip(shares).enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} | {:.1}% |\n",
            i + 1,
            entry.label,
            format_count(entry.value),
            share
        ));
    }
    section.push('\n');

    section
}

/// Generate group subtotals; empty when the schema has no groups.
fn generate_groups_section(groups: &[GroupTotal]) -> String {
    let mut section = String::new();

    if groups.is_empty() {
        return section;
    }

    section.push_str("### By Group\n\n");
    section.push_str("| Group | Categories | Emigrants |\n");
    section.push_str("|:---|---:|---:|\n");
    for group in groups {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            group.group,
            group.categories,
            format_count(group.value)
        ));
    }
    section.push('\n');

    section
}

/// Generate the trend table.
fn generate_series_section(series: &Series, schema: &CategorySchema) -> String {
    let mut section = String::new();

    if series.len() == 0 {
        section.push_str("No dated records in this range.\n\n");
        return section;
    }

    match series {
        Series::Single { label, points, .. } => {
            section.push_str(&format!("| Year | {} |\n", label));
            section.push_str("|:---:|---:|\n");
            for point in points {
                section.push_str(&format!(
                    "| {} | {} |\n",
                    point.year,
                    format_count(point.value)
                ));
            }
        }
        Series::All { rows } => {
            section.push_str(&table_header(schema, &[]));
            for row in rows {
                section.push_str(&format!("| {} |", row.year));
                for (_, value) in row.values.iter() {
                    section.push_str(&format!(" {} |", format_count(value)));
                }
                section.push('\n');
            }
        }
    }
    section.push('\n');

    section
}

/// Generate the yearly totals table.
fn generate_yearly_totals_section(totals: &[YearTotal]) -> String {
    if totals.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("### Yearly Totals\n\n");
    section.push_str("| Year | Total |\n");
    section.push_str("|:---:|---:|\n");
    for total in totals {
        section.push_str(&format!(
            "| {} | {} |\n",
            total.year,
            format_count(total.total)
        ));
    }
    section.push('\n');

    section
}

/// Generate every dashboard view of a summary.
fn generate_summary_section(result: &AggregationResult, schema: &CategorySchema) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Summary ({}, {})\n\n",
        result.selector, result.range
    ));
    section.push_str(&format!(
        "**Total emigrants:** {}\n\n",
        format_count(result.totals.sum())
    ));

    section.push_str("### Ranking\n\n");
    section.push_str(&generate_ranking_section(&result.ranking));
    section.push_str(&generate_groups_section(&result.group_totals));

    section.push_str("### Trend\n\n");
    section.push_str(&generate_series_section(&result.series, schema));
    section.push_str(&generate_yearly_totals_section(&result.yearly_totals));

    section.push_str("### Records\n\n");
    section.push_str(&generate_table_section(&result.table, schema));

    section
}

/// Generate the choropleth table.
fn generate_map_section(cells: &[ChoroplethCell]) -> String {
    let mut section = String::new();

    section.push_str("| Geography | Category | Emigrants | Color |\n");
    section.push_str("|:---|:---|---:|:---:|\n");
    for cell in cells {
        let geography = if cell.mapped {
            cell.geography.clone()
        } else {
            format!("{} *(unmapped)*", cell.geography)
        };
        section.push_str(&format!(
            "| {} | {} | {} | `{}` |\n",
            geography,
            cell.key.as_deref().unwrap_or("-"),
            cell.value.map_or_else(|| "-".to_string(), format_count),
            cell.color
        ));
    }
    section.push('\n');

    let unmapped = cells.iter().filter(|c| !c.mapped).count();
    if unmapped > 0 {
        section.push_str(&format!(
            "> {} geographies could not be mapped and use the neutral color.\n\n",
            unmapped
        ));
    }

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by emistat v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate the dataset catalog listing.
pub fn generate_catalog_markdown(catalog: &Catalog) -> String {
    let mut output = String::new();

    output.push_str("# Datasets\n\n");
    output.push_str("| Dataset | Collection | Categories | Map |\n");
    output.push_str("|:---|:---|---:|:---|\n");
    for schema in catalog.iter() {
        let map = match schema.geography {
            Some(kind) => format!("{:?}", kind),
            None => "-".to_string(),
        };
        output.push_str(&format!(
            "| {} | `{}` | {} | {} |\n",
            schema.name,
            schema.collection,
            schema.len(),
            map
        ));
    }
    output.push('\n');

    output
}

/// Generate the cross-dataset overview.
///
/// Datasets with no records are listed in the headline table only.
pub fn generate_overview_markdown(overview: &Overview, catalog: &Catalog) -> String {
    let mut output = String::new();

    output.push_str("# Emigration Overview\n\n");
    output.push_str(&format!(
        "*Generated {}*\n\n",
        overview.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("| Dataset | Records | Without Year | Total Emigrants |\n");
    output.push_str("|:---|---:|---:|---:|\n");
    for entry in &overview.datasets {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            entry.dataset,
            entry.records_loaded,
            entry.records_without_year,
            format_count(entry.total)
        ));
    }
    output.push('\n');

    for entry in overview.datasets.iter().filter(|e| e.records_loaded > 0) {
        output.push_str(&format!("## {}\n\n", entry.dataset));
        output.push_str("| Category | Total |\n");
        output.push_str("|:---|---:|\n");
        for (key, value) in entry.totals.iter() {
            let label = catalog
                .get(&entry.dataset)
                .map(|schema| schema.label(key))
                .unwrap_or(key);
            output.push_str(&format!("| {} | {} |\n", label, format_count(value)));
        }
        output.push('\n');
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the overview as JSON.
pub fn generate_overview_json(overview: &Overview) -> Result<String> {
    serde_json::to_string_pretty(overview).map_err(Into::into)
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate the dataset catalog as JSON.
pub fn generate_catalog_json(catalog: &Catalog) -> Result<String> {
    let schemas: Vec<&CategorySchema> = catalog.iter().collect();
    serde_json::to_string_pretty(&schemas).map_err(Into::into)
}

/// Integral counts with thousands separators, other values with two decimals.
pub fn format_count(value: f64) -> String {
    if value.fract() != 0.0 {
        return format!("{:.2}", value);
    }

    let digits = format!("{}", value.abs() as i64);
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Dataset;
    use crate::models::{Selector, YearRange};
    use crate::schema::Category;
    use chrono::Utc;
    use serde_json::json;

    fn dataset() -> Dataset {
        let schema = CategorySchema::new(
            "sex",
            "sex",
            vec![Category::new("male", "Male"), Category::new("female", "Female")],
        )
        .unwrap();
        let raws: Vec<_> = [
            json!({"id": "a", "year": 2019, "male": 1200, "female": 800}),
            json!({"id": "b", "year": 2020, "male": 900, "female": 1100}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect();
        Dataset::from_raw(schema, &raws)
    }

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            dataset: "sex".to_string(),
            source: "emistat-data/sex.json".to_string(),
            records_loaded: 2,
            records_without_year: 1,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(1234567.0), "1,234,567");
        assert_eq!(format_count(-4500.0), "-4,500");
        assert_eq!(format_count(2.5), "2.50");
    }

    #[test]
    fn test_generate_metadata_section() {
        let section = generate_metadata_section(&metadata());
        assert!(section.contains("emistat-data/sex.json"));
        assert!(section.contains("Records Without Year:** 1"));
    }

    #[test]
    fn test_generate_ranking_report() {
        let dataset = dataset();
        let report = Report {
            metadata: metadata(),
            view: View::Ranking {
                selector: Selector::Total,
                range: YearRange::new(2019, 2020),
                entries: dataset.ranking(None, Selector::Total),
                groups: Vec::new(),
            },
        };

        let markdown = generate_markdown_report(&report, dataset.schema());
        assert!(markdown.contains("# Emigration Statistics: sex"));
        assert!(markdown.contains("## Ranking (total, 2019-2020)"));
        assert!(markdown.contains("| 1 | Male | 2,100 | 52.5% |"));
        assert!(markdown.contains("| 2 | Female | 1,900 | 47.5% |"));
        assert!(!markdown.contains("### By Group"));
    }

    #[test]
    fn test_generate_ranking_by_group() {
        let schema = CategorySchema::new(
            "all-countries",
            "allCountries",
            vec![
                Category::new("CANADA", "CANADA").in_group("Americas"),
                Category::new("JAPAN", "JAPAN").in_group("Asia & Middle East"),
                Category::new("MEXICO", "MEXICO").in_group("Americas"),
            ],
        )
        .unwrap();
        let raws: Vec<_> = [json!({"year": 2020, "CANADA": 3000, "JAPAN": 500, "MEXICO": 20})]
            .into_iter()
            .filter_map(|v| v.as_object().cloned())
            .collect();
        let dataset = Dataset::from_raw(schema, &raws);
        let totals = dataset.totals(None, Selector::Total);
        let report = Report {
            metadata: metadata(),
            view: View::Ranking {
                selector: Selector::Total,
                range: YearRange::new(2020, 2020),
                entries: dataset.ranking(None, Selector::Total),
                groups: crate::analysis::group_totals(&totals, dataset.schema()),
            },
        };

        let markdown = generate_markdown_report(&report, dataset.schema());
        assert!(markdown.contains("### By Group"));
        assert!(markdown.contains("| Americas | 2 | 3,020 |"));
        assert!(markdown.contains("| Asia & Middle East | 1 | 500 |"));

        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"groups\""));
    }

    #[test]
    fn test_generate_table_report() {
        let dataset = dataset();
        let range = YearRange::new(2019, 2020);
        let report = Report {
            metadata: metadata(),
            view: View::Table {
                range,
                page: dataset.table(range, 1, 10),
            },
        };

        let markdown = generate_markdown_report(&report, dataset.schema());
        assert!(markdown.contains("| Year | Male | Female | ID |"));
        assert!(markdown.contains("| 2019 | 1,200 | 800 | `a` |"));
        assert!(markdown.contains("*Page 1 of 1 | 2 rows | 10 per page*"));
    }

    #[test]
    fn test_empty_ranking_message() {
        let entries = vec![RankEntry {
            key: "male".to_string(),
            label: "Male".to_string(),
            value: 0.0,
        }];
        assert!(generate_ranking_section(&entries).contains("No data"));
    }

    #[test]
    fn test_map_section_marks_unmapped() {
        let cells = vec![
            ChoroplethCell {
                geography: "United States of America".to_string(),
                key: Some("USA".to_string()),
                value: Some(10.0),
                mapped: true,
                color: "#056976".to_string(),
            },
            ChoroplethCell {
                geography: "Others".to_string(),
                key: Some("OTHERS".to_string()),
                value: Some(3.0),
                mapped: false,
                color: "#eeeeee".to_string(),
            },
        ];
        let section = generate_map_section(&cells);
        assert!(section.contains("Others *(unmapped)*"));
        assert!(section.contains("1 geographies could not be mapped"));
    }

    #[test]
    fn test_generate_json_report() {
        let dataset = dataset();
        let report = Report {
            metadata: metadata(),
            view: View::Series {
                range: YearRange::new(2019, 2020),
                series: dataset.series(None, Some("female")).unwrap(),
                yearly_totals: dataset.yearly_totals(None),
            },
        };

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["view"], "series");
        assert_eq!(value["metadata"]["dataset"], "sex");
        assert_eq!(value["series"]["kind"], "single");
        assert_eq!(value["series"]["points"][1]["value"], 1100.0);
        assert_eq!(value["yearly_totals"][0]["total"], 2000.0);
    }

    #[test]
    fn test_generate_overview() {
        let catalog = Catalog::builtin().unwrap();
        let empty = Dataset::new(catalog.get("age").unwrap().clone(), Vec::new());
        let overview = Overview {
            generated_at: Utc::now(),
            datasets: vec![dataset().overview(), empty.overview()],
        };

        let markdown = generate_overview_markdown(&overview, &catalog);
        assert!(markdown.contains("| sex | 2 | 0 | 4,000 |"));
        assert!(markdown.contains("| age | 0 | 0 | 0 |"));
        assert!(markdown.contains("## sex"));
        assert!(markdown.contains("| Female | 1,900 |"));
        assert!(!markdown.contains("## age"));

        let json: serde_json::Value =
            serde_json::from_str(&generate_overview_json(&overview).unwrap()).unwrap();
        assert_eq!(json["datasets"][0]["records_loaded"], 2);
        assert_eq!(json["datasets"][0]["totals"]["male"], 2100);
        assert_eq!(json["datasets"][1]["collection"], "age_data");
    }

    #[test]
    fn test_generate_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let markdown = generate_catalog_markdown(&catalog);
        assert!(markdown.contains("| civil-status | `civilStatus` | 6 |"));
        assert!(markdown.contains("all-countries"));

        let json = generate_catalog_json(&catalog).unwrap();
        assert!(json.contains("\"majorCountries\""));
    }
}
