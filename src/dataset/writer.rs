use std::sync::Arc;
use bytes::Bytes;
use object_store::{path::Path, ObjectStore};
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::properties::WriterProperties,
};
use tracing::{info, warn};
use crate::{Error, Result, Table};

const MAX_WRITE_RETRIES: u32 = 3;

pub fn table_to_parquet(table: &Table) -> Result<Vec<u8>> {
    let batch = table.to_record_batch()?;

    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
    }
    Ok(buffer)
}

pub fn table_to_csv(table: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    table.write_csv(&mut buffer)?;
    Ok(buffer)
}

pub async fn put_with_retry(store: &Arc<dyn ObjectStore>, path: &Path, buffer: Vec<u8>) -> Result<()> {
    let payload = Bytes::from(buffer);
    let mut retries = 0;
    loop {
        match store.put(path, payload.clone().into()).await {
            Ok(_) => return Ok(()),
            Err(e) if retries < MAX_WRITE_RETRIES - 1 => {
                retries += 1;
                let delay = std::time::Duration::from_secs(2u64.pow(retries));
                warn!(
                    "Write attempt {} failed for path {}: {}. Retrying in {} seconds...",
                    retries, path, e, delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(Error::from(e)),
        }
    }
}

/// Writes the table as parquet or CSV, chosen by the path extension.
pub async fn write_table(store: &Arc<dyn ObjectStore>, path: &Path, table: &Table) -> Result<()> {
    let buffer = match path.extension() {
        Some("parquet") => table_to_parquet(table)?,
        Some("csv") => table_to_csv(table)?,
        other => {
            return Err(Error::InvalidInput(format!(
                "Unsupported table output extension: {:?}",
                other
            )))
        }
    };

    put_with_retry(store, path, buffer).await?;
    info!("Wrote {} rows to {}", table.len(), path);
    Ok(())
}
