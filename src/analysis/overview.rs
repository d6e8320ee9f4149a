//! Landing view across every dataset in the catalog.

use super::Dataset;
use crate::error::StatsResult;
use crate::models::Overview;
use crate::schema::Catalog;
use crate::store::Store;
use chrono::Utc;
use tracing::debug;

/// Read every catalog collection and summarize it, in catalog order.
pub async fn overview<S: Store>(store: &S, catalog: &Catalog) -> StatsResult<Overview> {
    let mut datasets = Vec::new();

    for schema in catalog.iter() {
        let raws = store.fetch_all(&schema.collection).await?;
        let dataset = Dataset::from_raw(schema.clone(), &raws);
        let summary = dataset.overview();
        debug!(
            "'{}': {} records, total {}",
            summary.dataset, summary.records_loaded, summary.total
        );
        datasets.push(summary);
    }

    Ok(Overview {
        generated_at: Utc::now(),
        datasets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalizer::record_from_assignments;
    use crate::store::JsonStore;
    use tempfile::TempDir;

    fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_overview_reads_every_collection() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let catalog = Catalog::builtin().unwrap();

        let sex = catalog.get("sex").unwrap();
        for (year, male, female) in [(2019, "100", "150"), (2020, "80", "120")] {
            let record =
                record_from_assignments(sex, year, &assignments(&[("male", male), ("female", female)]))
                    .unwrap();
            store.create(&sex.collection, &record).await.unwrap();
        }
        std::fs::write(
            dir.path().join("civilStatus.json"),
            r#"[{"year": 2020, "single": 7, "married": 3}, {"year": "n/a", "single": 50}]"#,
        )
        .unwrap();

        let overview = overview(&store, &catalog).await.unwrap();
        assert_eq!(overview.datasets.len(), catalog.iter().count());

        let sex = overview.datasets.iter().find(|d| d.dataset == "sex").unwrap();
        assert_eq!(sex.records_loaded, 2);
        assert_eq!(sex.total, 450.0);
        assert_eq!(sex.totals.get("female"), Some(270.0));

        let civil = &overview.datasets[0];
        assert_eq!(civil.dataset, "civil-status");
        assert_eq!(civil.records_loaded, 2);
        assert_eq!(civil.records_without_year, 1);
        assert_eq!(civil.total, 10.0);

        let age = overview.datasets.iter().find(|d| d.dataset == "age").unwrap();
        assert_eq!(age.records_loaded, 0);
        assert_eq!(age.total, 0.0);
    }

    #[tokio::test]
    async fn test_overview_reports_corrupt_collection() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("education.json"), "[{").unwrap();
        let store = JsonStore::new(dir.path());

        let result = overview(&store, &Catalog::builtin().unwrap()).await;
        assert!(result.is_err());
    }
}
