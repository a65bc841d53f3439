use std::sync::Arc;
use object_store::{path::Path, ObjectStore};
use tracing::info;
use crate::{
    column_descriptions, zillow_column_descriptions, Error, Result, Table,
    CENSUS_GEOGRAPHY_FIELDS, CENSUS_KEY_FIELDS,
};

// Geography columns stay text under both their raw and relabelled names
fn text_columns() -> Vec<&'static str> {
    CENSUS_GEOGRAPHY_FIELDS
        .iter()
        .chain(CENSUS_KEY_FIELDS.iter())
        .copied()
        .collect()
}

/// Loads a census JSON response or a CSV export, chosen by the path extension.
pub async fn read_table(store: &Arc<dyn ObjectStore>, path: &Path) -> Result<Table> {
    let bytes = store.get(path).await?.bytes().await?;

    let table = match path.extension() {
        Some("json") => Table::from_census_json(&bytes)?,
        Some("csv") => Table::from_csv(bytes.as_ref(), &text_columns())?,
        other => {
            return Err(Error::InvalidInput(format!(
                "Unsupported table input extension: {:?}",
                other
            )))
        }
    };

    info!("Loaded {} rows from {}", table.len(), path);
    Ok(table)
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeSource {
    /// One census survey year, raw codes or already relabelled
    Census { year: u16, path: Path },
    /// Zillow median home value export keyed by the census key columns
    Zillow { path: Path },
}

/// Reads a merge input and relabels its columns for joining.
pub async fn read_labelled(store: &Arc<dyn ObjectStore>, source: &MergeSource) -> Result<Table> {
    match source {
        MergeSource::Census { year, path } => {
            let mut table = read_table(store, path).await?;
            table.rename_columns(&column_descriptions(*year));
            Ok(table)
        }
        MergeSource::Zillow { path } => {
            let mut table = read_table(store, path).await?;
            table.rename_columns(&zillow_column_descriptions());
            Ok(table)
        }
    }
}
