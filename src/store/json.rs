//! JSON-file backed store: one `<collection>.json` array per collection.

use super::Store;
use crate::analysis::normalizer::coerce_id;
use crate::error::{StatsError, StatsResult};
use crate::ingest::RawRecord;
use crate::models::Record;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Store rooted at a data directory.
///
/// Every write replaces the whole collection file atomically, so a failed
/// write leaves the previous contents intact.
#[derive(Debug)]
pub struct JsonStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: &str) -> StatsResult<PathBuf> {
        if collection.is_empty()
            || collection.contains(['/', '\\'])
            || collection.starts_with('.')
        {
            return Err(StatsError::CorruptCollection {
                collection: collection.to_string(),
                reason: "invalid collection name".to_string(),
            });
        }
        Ok(self.data_dir.join(format!("{}.json", collection)))
    }

    async fn read(&self, collection: &str) -> StatsResult<Vec<RawRecord>> {
        let path = self.collection_path(collection)?;
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No file for '{}', treating as empty", collection);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&text).map_err(|e| StatsError::CorruptCollection {
            collection: collection.to_string(),
            reason: e.to_string(),
        })
    }

    async fn write(&self, collection: &str, documents: &[RawRecord]) -> StatsResult<()> {
        let path = self.collection_path(collection)?;
        let bytes = serde_json::to_vec_pretty(documents)?;
        tokio::fs::create_dir_all(&self.data_dir).await?;

        let dir = self.data_dir.clone();
        tokio::task::spawn_blocking(move || -> StatsResult<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StatsError::Io(std::io::Error::other(e)))??;

        debug!("Wrote {} documents to '{}'", documents.len(), collection);
        Ok(())
    }

    fn document(id: String, record: &Record) -> RawRecord {
        let mut doc = record.to_raw();
        doc.insert("id".to_string(), Value::String(id));
        doc
    }

    fn position(documents: &[RawRecord], collection: &str, id: &str) -> StatsResult<usize> {
        documents
            .iter()
            .position(|doc| doc.get("id").and_then(coerce_id).as_deref() == Some(id))
            .ok_or_else(|| StatsError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }
}

impl Store for JsonStore {
    async fn fetch_all(&self, collection: &str) -> StatsResult<Vec<RawRecord>> {
        let documents = self.read(collection).await?;
        debug!("Fetched {} documents from '{}'", documents.len(), collection);
        Ok(documents)
    }

    async fn create(&self, collection: &str, record: &Record) -> StatsResult<String> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read(collection).await?;

        let id = Uuid::new_v4().to_string();
        documents.push(Self::document(id.clone(), record));
        self.write(collection, &documents).await?;

        info!("Created document {} in '{}'", id, collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, record: &Record) -> StatsResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read(collection).await?;

        let index = Self::position(&documents, collection, id)?;
        documents[index] = Self::document(id.to_string(), record);
        self.write(collection, &documents).await?;

        info!("Updated document {} in '{}'", id, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StatsResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read(collection).await?;

        let index = Self::position(&documents, collection, id)?;
        documents.remove(index);
        self.write(collection, &documents).await?;

        info!("Deleted document {} from '{}'", id, collection);
        Ok(())
    }

    async fn commit_chunk(&self, collection: &str, records: &[Record]) -> StatsResult<usize> {
        let _guard = self.write_lock.lock().await;
        let mut documents = self.read(collection).await?;

        documents.extend(
            records
                .iter()
                .map(|record| Self::document(Uuid::new_v4().to_string(), record)),
        );
        self.write(collection, &documents).await?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryValues;
    use crate::store::UploadOptions;
    use tempfile::TempDir;

    fn record(year: i32, male: f64, female: f64) -> Record {
        Record {
            id: None,
            year: Some(year),
            values: CategoryValues::new(vec![
                ("male".to_string(), male),
                ("female".to_string(), female),
            ]),
        }
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(store.fetch_all("sex").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("data"));

        let id = store.create("sex", &record(2020, 1.0, 2.0)).await.unwrap();
        let docs = store.fetch_all("sex").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], id.as_str());
        assert_eq!(docs[0]["year"], 2020);
        assert_eq!(docs[0]["female"], 2);

        store.update("sex", &id, &record(2021, 5.0, 6.0)).await.unwrap();
        let docs = store.fetch_all("sex").await.unwrap();
        assert_eq!(docs[0]["year"], 2021);
        assert_eq!(docs[0]["male"], 5);
        assert_eq!(docs[0]["id"], id.as_str());

        store.delete("sex", &id).await.unwrap();
        assert!(store.fetch_all("sex").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_not_found() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        store.create("sex", &record(2020, 1.0, 2.0)).await.unwrap();

        let err = store.delete("sex", "missing").await.unwrap_err();
        assert!(matches!(err, StatsError::NotFound { .. }));
        let err = store
            .update("sex", "missing", &record(2020, 0.0, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, StatsError::NotFound { .. }));
        assert_eq!(store.fetch_all("sex").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_numeric_ids_match_displayed_text() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sex.json"),
            r#"[{"id": 17, "year": 1990, "male": 1, "female": 2}, {"id": "abc", "year": 1991}]"#,
        )
        .unwrap();
        let store = JsonStore::new(dir.path());

        store.update("sex", "17", &record(1990, 3.0, 4.0)).await.unwrap();
        let docs = store.fetch_all("sex").await.unwrap();
        assert_eq!(docs[0]["id"], "17");
        assert_eq!(docs[0]["male"], 3);

        store.delete("sex", "17").await.unwrap();
        let docs = store.fetch_all("sex").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], "abc");
    }

    #[tokio::test]
    async fn test_duplicate_uploads_duplicate_rows() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let records: Vec<Record> = (0..5).map(|i| record(2000 + i, 1.0, 1.0)).collect();
        let options = UploadOptions {
            batch_size: 2,
            show_progress: false,
        };

        let report = store.bulk_create("sex", &records, &options).await.unwrap();
        assert_eq!(report.chunks, 3);
        store.bulk_create("sex", &records, &options).await.unwrap();

        let docs = store.fetch_all("sex").await.unwrap();
        assert_eq!(docs.len(), 10);
        let mut ids: Vec<&str> = docs.iter().filter_map(|d| d["id"].as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[tokio::test]
    async fn test_corrupt_collection() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sex.json"), "{not json").unwrap();
        let store = JsonStore::new(dir.path());

        let err = store.fetch_all("sex").await.unwrap_err();
        assert!(matches!(err, StatsError::CorruptCollection { .. }));
    }

    #[tokio::test]
    async fn test_invalid_collection_name() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        assert!(store.fetch_all("../escape").await.is_err());
    }
}
