//! Batch orchestration: CSV input → sequential pipeline runs →
//! per-table and consolidated output documents.

use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use sapscout_gemini::TextGenerator;
use sapscout_shared::{BatchResult, Result, RunConfig, SapScoutError, TableResult};

use crate::persist::save_json;
use crate::pipeline::process_url;

/// File name of the consolidated document inside the output directory.
const CONSOLIDATED_FILE: &str = "consolidated.json";

/// Header column holding the table name in the batch input CSV.
const TABLE_NAME_COLUMN: &str = "table_name";

/// One row of the batch input CSV.
#[derive(Debug, Deserialize)]
struct TableRow {
    table_name: String,
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for batch runs.
pub trait BatchProgress: Send + Sync {
    /// Called before each table's pipeline run.
    fn table_started(&self, name: &str, current: usize, total: usize);
    /// Called after the consolidated document has been written.
    fn done(&self, results: &[TableResult]);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl BatchProgress for SilentProgress {
    fn table_started(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _results: &[TableResult]) {}
}

// ---------------------------------------------------------------------------
// Batch loop
// ---------------------------------------------------------------------------

/// Run the single-table pipeline for every row of `csv_path`, strictly in
/// input order, one table at a time.
///
/// Row-level failures keep their slot in the returned sequence as
/// [`TableResult::Error`] and never abort later rows. An unreadable
/// input file, a header without `table_name`, or an undecodable row
/// aborts the whole batch before any page is fetched or file written.
#[instrument(skip_all, fields(csv = %csv_path.display()))]
pub async fn process_batch(
    client: &Client,
    generator: &dyn TextGenerator,
    config: &RunConfig,
    csv_path: &Path,
    progress: &dyn BatchProgress,
) -> Result<Vec<TableResult>> {
    let rows = read_rows(csv_path)?;
    info!(tables = rows.len(), "starting batch run");

    let total = rows.len();
    let mut results: Vec<TableResult> = Vec::with_capacity(total);

    for (i, row) in rows.iter().enumerate() {
        progress.table_started(&row.table_name, i + 1, total);
        info!(table = %row.table_name, "processing table");

        let url = config.page_url(&row.table_name);
        let table_path = per_table_path(&config.output_dir, &row.table_name);

        let result = process_url(client, generator, &url, &table_path).await;
        if result.is_error() {
            // Failed rows still get their per-table document.
            save_json(&result, &table_path);
        }
        results.push(result);
    }

    let batch = BatchResult {
        processed_at: Utc::now(),
        tables: results,
    };
    save_json(&batch, &config.output_dir.join(CONSOLIDATED_FILE));

    progress.done(&batch.tables);
    info!(
        tables = batch.tables.len(),
        failures = batch.tables.iter().filter(|r| r.is_error()).count(),
        "batch run complete"
    );

    Ok(batch.tables)
}

/// Per-table output path inside the batch output directory.
fn per_table_path(output_dir: &Path, table_name: &str) -> PathBuf {
    output_dir.join(format!("{}.json", table_name.to_lowercase()))
}

/// Read and validate all rows up front so a malformed source aborts the
/// batch before any network or file activity.
fn read_rows(csv_path: &Path) -> Result<Vec<TableRow>> {
    let mut reader = csv::Reader::from_path(csv_path).map_err(|e| {
        SapScoutError::batch_source(format!("cannot open {}: {e}", csv_path.display()))
    })?;

    let has_column = reader
        .headers()
        .map_err(|e| {
            SapScoutError::batch_source(format!("cannot read header of {}: {e}", csv_path.display()))
        })?
        .iter()
        .any(|h| h == TABLE_NAME_COLUMN);
    if !has_column {
        return Err(SapScoutError::batch_source(format!(
            "missing required column '{TABLE_NAME_COLUMN}' in {}",
            csv_path.display()
        )));
    }

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: TableRow = record.map_err(|e| {
            SapScoutError::batch_source(format!("invalid row in {}: {e}", csv_path.display()))
        })?;
        rows.push(row);
    }
    Ok(rows)
}
