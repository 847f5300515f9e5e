//! Batch plumbing shared by the subcommands.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use wms_ingest::{
    IngestReport, IngestStatus, Ingestor, RowFailure, SalesRecord, collect_sales_files,
    mapped_output_path, write_mapped_csv,
};
use wms_inventory::{ApplyOutcome, ProductStore, apply_deltas};
use wms_reporting::{SalesSummary, StockReport};

/// A file that could not be ingested at all.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct Batch {
    pub ingested: Vec<(PathBuf, IngestReport)>,
    pub failures: Vec<FileFailure>,
}

/// Per-file view for JSON output.
#[derive(Debug, Serialize)]
pub struct FileSummary<'a> {
    pub path: &'a Path,
    pub batch_id: String,
    pub platform: String,
    pub status: IngestStatus,
    pub total_rows: usize,
    pub accepted: usize,
    pub errors: &'a [RowFailure],
}

impl Batch {
    pub fn records(&self) -> impl Iterator<Item = &SalesRecord> {
        self.ingested.iter().flat_map(|(_, report)| report.records.iter())
    }

    pub fn files(&self) -> Vec<FileSummary<'_>> {
        self.ingested
            .iter()
            .map(|(path, report)| FileSummary {
                path,
                batch_id: report.batch_id.to_string(),
                platform: report.platform.to_string(),
                status: report.status(),
                total_rows: report.total_rows,
                accepted: report.records.len(),
                errors: &report.errors,
            })
            .collect()
    }

    pub fn summarise(&self) -> SalesSummary {
        SalesSummary::from_records(self.records())
    }
}

/// Expand directories into the sales files they contain; plain files pass through.
pub fn expand_paths(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = collect_sales_files(path)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Ingest every file. A file-level failure is recorded and the batch moves on.
pub fn ingest_all(ingestor: &Ingestor, files: &[PathBuf]) -> Batch {
    let mut batch = Batch::default();
    for path in files {
        match ingestor.ingest_path(path) {
            Ok(report) => batch.ingested.push((path.clone(), report)),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "file rejected");
                batch.failures.push(FileFailure {
                    path: path.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    batch
}

/// Write one mapped CSV per ingested file into `out_dir`.
pub fn write_mapped_files(batch: &Batch, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::new();
    for (path, report) in &batch.ingested {
        let target = mapped_output_path(path, out_dir);
        let file = File::create(&target)
            .with_context(|| format!("failed to create {}", target.display()))?;
        write_mapped_csv(&report.records, file)
            .with_context(|| format!("failed to write {}", target.display()))?;
        tracing::info!(target = %target.display(), "mapped file written");
        written.push(target);
    }
    Ok(written)
}

/// Push the projection's outgoing quantities into `store`.
pub fn apply_projection<S>(store: &S, report: &StockReport, reference: &str) -> ApplyOutcome
where
    S: ProductStore + ?Sized,
{
    apply_deltas(store, &report.deltas(), reference)
}
