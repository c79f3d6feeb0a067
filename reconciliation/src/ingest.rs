//! Sales export ingestion
//!
//! Loads the day's CSV export from the store and type-normalizes each row
//! into a [`SalesRecord`]. Output order matches row order, but nothing
//! downstream depends on it; record identity is carried by `id`.

use crate::{store::ObjectStore, types::SalesRecord, Error, Result};
use tracing::info;

/// Store key for a day's export
pub fn export_key(date: &str) -> String {
    format!("sales/{date}.csv")
}

/// Load and parse the sales export for `date`.
///
/// Fails with [`Error::SourceNotFound`] when the export does not exist and
/// [`Error::DataFormat`] on the first malformed row (missing column or
/// unparsable integer field).
pub async fn load_sales_export(store: &dyn ObjectStore, date: &str) -> Result<Vec<SalesRecord>> {
    let key = export_key(date);
    let content = store.get(&key).await?;

    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<SalesRecord>().enumerate() {
        // +2: header line plus 1-indexing
        let record =
            row.map_err(|e| Error::DataFormat(format!("{} line {}: {}", key, index + 2, e)))?;
        records.push(record);
    }

    info!(key, record_count = records.len(), "loaded sales export");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FsObjectStore;

    const HEADER: &str = "id,customer_name,product,amount,quantity,region,category,timestamp";

    async fn store_with_export(body: &str) -> (tempfile::TempDir, FsObjectStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store.put("sales/2025-01-15.csv", body).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_loads_typed_records() {
        let body = format!(
            "{HEADER}\n\
             00001,Acme K1,Hair dryer,45000,2,Tokyo,beauty,2025-01-15T00:00:00\n\
             00002,Acme K2,Salon equipment set,2500000,1,Osaka,equipment,2025-01-15T00:00:08\n"
        );
        let (_dir, store) = store_with_export(&body).await;

        let records = load_sales_export(&store, "2025-01-15").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "00001");
        assert_eq!(records[0].amount, 45_000);
        assert_eq!(records[0].quantity, 2);
        assert_eq!(records[1].amount, 2_500_000);
    }

    #[tokio::test]
    async fn test_unparsable_amount_is_data_format_error() {
        let body = format!(
            "{HEADER}\n\
             00001,Acme K1,Hair dryer,not-a-number,2,Tokyo,beauty,2025-01-15T00:00:00\n"
        );
        let (_dir, store) = store_with_export(&body).await;

        let result = load_sales_export(&store, "2025-01-15").await;
        match result {
            Err(Error::DataFormat(detail)) => assert!(detail.contains("line 2")),
            other => panic!("expected DataFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_column_is_data_format_error() {
        let body = format!("{HEADER}\n00001,Acme K1,Hair dryer,45000,2,Tokyo,beauty\n");
        let (_dir, store) = store_with_export(&body).await;

        let result = load_sales_export(&store, "2025-01-15").await;
        assert!(matches!(result, Err(Error::DataFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_export_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());

        let result = load_sales_export(&store, "2025-01-16").await;
        assert!(matches!(result, Err(Error::SourceNotFound(_))));
    }
}
