//! `wms` command-line front end.
//!
//! Each subcommand loads the master catalog, runs the pipeline and returns a
//! JSON value; `main` only prints it.

pub mod config;
pub mod pipeline;

use std::sync::Arc;

use anyhow::Context;
use serde_json::{Value, json};
use uuid::Uuid;

use wms_catalog::Catalog;
use wms_infra::SqliteProductStore;
use wms_ingest::Ingestor;
use wms_inventory::{InMemoryProductStore, ProductStore};
use wms_mapping::SkuResolver;
use wms_reporting::{SalesSummary, StockReport};

pub use config::{Cli, Command};

pub fn run(cli: &Cli) -> anyhow::Result<Value> {
    let catalog = Arc::new(
        Catalog::open(&cli.catalog)
            .with_context(|| format!("failed to load catalog {}", cli.catalog.display()))?,
    );
    let resolver = SkuResolver::new(catalog.clone());

    match &cli.command {
        Command::Resolve { platform, sku, qty } => {
            let resolution = resolver
                .resolve_detailed(*platform, sku, *qty)
                .with_context(|| format!("cannot resolve {sku:?} on {platform}"))?;
            Ok(serde_json::to_value(resolution)?)
        }
        Command::Ingest {
            paths,
            apply,
            mapped_dir,
        } => {
            let files = pipeline::expand_paths(paths)?;
            let batch = pipeline::ingest_all(&Ingestor::new(resolver), &files);

            let mapped = match mapped_dir {
                Some(dir) => pipeline::write_mapped_files(&batch, dir)?,
                None => Vec::new(),
            };

            let applied = if *apply {
                let summary = batch.summarise();
                let report = StockReport::project(&catalog, &summary);
                let store = open_store(cli, &catalog)?;
                let reference = format!("ingest-{}", Uuid::now_v7());
                let outcome = pipeline::apply_projection(store.as_ref(), &report, &reference);
                Some(serde_json::to_value(outcome)?)
            } else {
                None
            };

            Ok(json!({
                "files": batch.files(),
                "failures": batch.failures,
                "mapped_files": mapped,
                "applied": applied,
            }))
        }
        Command::Report { paths, top } => {
            let (summary, stock, failures) = summarise(&resolver, &catalog, paths)?;
            let top_sellers = stock.top_sellers(*top);
            let warnings: Vec<_> = stock.warnings().collect();
            Ok(json!({
                "summary": summary,
                "stock": stock.stock_rows(),
                "rows": stock.rows(),
                "top_sellers": top_sellers,
                "warnings": warnings,
                "insights": wms_ai::insights(&summary, &stock),
                "failures": failures,
            }))
        }
        Command::Ask { question, paths } => {
            let (summary, stock, _) = summarise(&resolver, &catalog, paths)?;
            let answer = wms_ai::answer(question, &summary, &stock)?;
            Ok(serde_json::to_value(answer)?)
        }
    }
}

fn summarise(
    resolver: &SkuResolver,
    catalog: &Catalog,
    paths: &[std::path::PathBuf],
) -> anyhow::Result<(SalesSummary, StockReport, Vec<pipeline::FileFailure>)> {
    let files = pipeline::expand_paths(paths)?;
    let batch = pipeline::ingest_all(&Ingestor::new(resolver.clone()), &files);
    let summary = batch.summarise();
    let stock = StockReport::project(catalog, &summary);
    Ok((summary, stock, batch.failures))
}

/// SQLite store when a database is configured, otherwise an in-memory copy
/// of the catalog (a dry run).
fn open_store(cli: &Cli, catalog: &Catalog) -> anyhow::Result<Box<dyn ProductStore>> {
    match &cli.database {
        Some(url) => {
            let store = SqliteProductStore::open(url)?;
            store
                .seed_from_catalog(catalog)
                .context("failed to seed product store")?;
            Ok(Box::new(store))
        }
        None => {
            tracing::warn!("no database configured; stock changes are not persisted");
            Ok(Box::new(InMemoryProductStore::from_catalog(catalog)))
        }
    }
}
