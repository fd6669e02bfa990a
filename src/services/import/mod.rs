//! People import pipeline
//!
//! parse upload → fetch duplicate snapshot once → validate / check / insert
//! each row in file order → aggregated [`ImportResult`].
//!
//! Row failures are recorded and never abort the batch. Only problems that
//! happen before the row loop starts surface as [`ImportError`].

pub mod duplicates;
pub mod format;
pub mod validate;

use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::store::PersonStore;
use crate::types::{ImportOptions, ImportResult, ImportRow, SourceRow};

pub use duplicates::DuplicateSnapshot;
pub use format::{parse_upload, FormatError};
pub use validate::validate_row;

/// Request-level import failure
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Failed to load existing people: {0}")]
    Snapshot(anyhow::Error),
}

/// Parse an uploaded file and import its rows for `owner_id`
pub async fn import_file(
    store: &dyn PersonStore,
    owner_id: Uuid,
    file_name: &str,
    bytes: &[u8],
    options: ImportOptions,
) -> Result<ImportResult, ImportError> {
    let rows = parse_upload(file_name, bytes)?;
    info!(
        "Importing {} rows from '{}' for user {} (skip duplicates: {})",
        rows.len(),
        file_name,
        owner_id,
        options.skip_duplicates
    );
    import_rows(store, owner_id, &rows, options).await
}

/// Import already parsed rows for `owner_id`
pub async fn import_rows(
    store: &dyn PersonStore,
    owner_id: Uuid,
    rows: &[SourceRow],
    options: ImportOptions,
) -> Result<ImportResult, ImportError> {
    let start_time = Instant::now();

    let existing = store
        .snapshot(owner_id)
        .await
        .map_err(ImportError::Snapshot)?;
    debug!("Duplicate snapshot: {} existing people ({})", existing.len(), store.name());
    let snapshot = DuplicateSnapshot::new(existing);

    let mut result = ImportResult::default();

    for row in rows {
        process_row(store, owner_id, &snapshot, row, options, &mut result).await;
    }

    info!(
        "Import for user {} finished in {}ms: {} imported, {} failed, {} duplicates",
        owner_id,
        start_time.elapsed().as_millis(),
        result.success,
        result.failed,
        result.duplicates
    );

    Ok(result)
}

async fn process_row(
    store: &dyn PersonStore,
    owner_id: Uuid,
    snapshot: &DuplicateSnapshot,
    row: &SourceRow,
    options: ImportOptions,
    result: &mut ImportResult,
) {
    let row_number = row.number;
    let candidate = match validate_row(&ImportRow::from_raw(&row.fields), row_number) {
        Ok(candidate) => candidate,
        Err(e) => {
            warn!("Skipping invalid row: {}", e);
            result.record_failure(e.to_string());
            return;
        }
    };

    if let Some((existing, signal)) = snapshot.find(&candidate) {
        debug!(
            "Row {} ('{}') matches existing '{}' by {:?}",
            row_number, candidate.name, existing.name, signal
        );
        result.record_duplicate(row_number, &candidate.name);
        if options.skip_duplicates {
            return;
        }
    }

    match store.insert(owner_id, &candidate).await {
        Ok(person) => {
            debug!("Row {} imported as {}", row_number, person.id);
            result.record_success();
        }
        Err(e) => {
            warn!("Row {} ({}) insert failed: {}", row_number, candidate.name, e);
            result.record_failure(format!("Row {} ({}): {}", row_number, candidate.name, e));
        }
    }
}
