//! SQLite-backed product store.
//!
//! Stock levels live in `products`; every applied delta appends a row to
//! `inventory_movements`. The adapter exposes the synchronous
//! [`ProductStore`] API and drives sqlx on a private current-thread runtime,
//! so it must not be called from inside another async runtime.

use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::runtime::Runtime;

use wms_catalog::Catalog;
use wms_core::Msku;
use wms_inventory::store::checked_new_stock;
use wms_inventory::{ProductStore, StockMovement, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        msku_key     TEXT PRIMARY KEY,
        msku         TEXT NOT NULL,
        description  TEXT NOT NULL DEFAULT '',
        location     TEXT NOT NULL DEFAULT '',
        stock        INTEGER NOT NULL CHECK (stock >= 0),
        updated_at   TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory_movements (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        msku_key      TEXT NOT NULL REFERENCES products (msku_key),
        delta         INTEGER NOT NULL,
        stock_before  INTEGER NOT NULL,
        stock_after   INTEGER NOT NULL,
        reference     TEXT NOT NULL,
        recorded_at   TEXT NOT NULL
    )
    "#,
];

pub struct SqliteProductStore {
    pool: SqlitePool,
    runtime: Runtime,
}

impl std::fmt::Debug for SqliteProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteProductStore").finish_non_exhaustive()
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl SqliteProductStore {
    /// Open (creating if needed) the database at `url`, e.g.
    /// `sqlite://wms.db` or `sqlite::memory:`.
    pub fn open(url: &str) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to build runtime for SQLite store")?;

        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid SQLite url {url:?}"))?
            .create_if_missing(true);

        // One long-lived connection: an in-memory database exists only as long
        // as its connection does.
        let pool = runtime
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options),
            )
            .with_context(|| format!("failed to open SQLite database at {url:?}"))?;

        runtime.block_on(async {
            for statement in SCHEMA {
                sqlx::query(statement).execute(&pool).await?;
            }
            Ok::<_, sqlx::Error>(())
        })
        .context("failed to create product store schema")?;

        tracing::info!(url, "sqlite product store ready");
        Ok(Self { pool, runtime })
    }

    /// Upsert every catalog product. Existing rows keep their stock; new rows
    /// start at the catalog's stock level. Returns the number of products seen.
    pub fn seed_from_catalog(&self, catalog: &Catalog) -> Result<usize, StoreError> {
        let now = Utc::now().to_rfc3339();
        let count = self.runtime.block_on(async {
            let mut tx = self.pool.begin().await?;
            let mut count = 0usize;
            for product in catalog.products() {
                sqlx::query(
                    r#"
                    INSERT INTO products (msku_key, msku, description, location, stock, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT (msku_key) DO UPDATE SET
                        msku = excluded.msku,
                        description = excluded.description,
                        location = excluded.location
                    "#,
                )
                .bind(product.msku.key())
                .bind(product.msku.as_str())
                .bind(&product.description)
                .bind(&product.location)
                .bind(product.stock)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
                count += 1;
            }
            tx.commit().await?;
            Ok::<_, sqlx::Error>(count)
        })
        .map_err(backend)?;

        tracing::info!(products = count, "product store seeded from catalog");
        Ok(count)
    }

    /// Movement log, oldest first, optionally for a single MSKU.
    pub fn movements(&self, msku: Option<&Msku>) -> Result<Vec<StockMovement>, StoreError> {
        let rows = self
            .runtime
            .block_on(
                sqlx::query(
                    r#"
                    SELECT p.msku, m.delta, m.stock_before, m.stock_after, m.reference, m.recorded_at
                    FROM inventory_movements m
                    JOIN products p ON p.msku_key = m.msku_key
                    WHERE ?1 IS NULL OR m.msku_key = ?1
                    ORDER BY m.id
                    "#,
                )
                .bind(msku.map(|m| m.key()))
                .fetch_all(&self.pool),
            )
            .map_err(backend)?;

        rows.iter()
            .map(|row| -> Result<StockMovement, StoreError> {
                let msku: String = row.try_get("msku").map_err(backend)?;
                let recorded_at: String = row.try_get("recorded_at").map_err(backend)?;
                Ok(StockMovement {
                    msku: Msku::new(msku).map_err(|e| StoreError::Backend(e.to_string()))?,
                    delta: row.try_get("delta").map_err(backend)?,
                    stock_before: row.try_get("stock_before").map_err(backend)?,
                    stock_after: row.try_get("stock_after").map_err(backend)?,
                    reference: row.try_get("reference").map_err(backend)?,
                    recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| StoreError::Backend(format!("invalid recorded_at: {e}")))?,
                })
            })
            .collect()
    }
}

impl ProductStore for SqliteProductStore {
    fn get_stock(&self, msku: &Msku) -> Result<i64, StoreError> {
        let stock: Option<i64> = self
            .runtime
            .block_on(
                sqlx::query_scalar("SELECT stock FROM products WHERE msku_key = ?1")
                    .bind(msku.key())
                    .fetch_optional(&self.pool),
            )
            .map_err(backend)?;
        stock.ok_or_else(|| StoreError::UnknownProduct(msku.clone()))
    }

    fn apply_delta(
        &self,
        msku: &Msku,
        delta: i64,
        reference: &str,
    ) -> Result<StockMovement, StoreError> {
        if delta == 0 {
            return Err(StoreError::ZeroDelta);
        }

        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await.map_err(backend)?;

            let before: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE msku_key = ?1")
                    .bind(msku.key())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(backend)?;
            let before = before.ok_or_else(|| StoreError::UnknownProduct(msku.clone()))?;
            let after = checked_new_stock(msku, before, delta)?;
            let recorded_at = Utc::now();
            let stamp = recorded_at.to_rfc3339();

            sqlx::query("UPDATE products SET stock = ?1, updated_at = ?2 WHERE msku_key = ?3")
                .bind(after)
                .bind(&stamp)
                .bind(msku.key())
                .execute(&mut *tx)
                .await
                .map_err(backend)?;

            sqlx::query(
                r#"
                INSERT INTO inventory_movements
                    (msku_key, delta, stock_before, stock_after, reference, recorded_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(msku.key())
            .bind(delta)
            .bind(before)
            .bind(after)
            .bind(reference)
            .bind(&stamp)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

            tx.commit().await.map_err(backend)?;

            tracing::debug!(%msku, delta, before, after, reference, "stock movement recorded");
            Ok::<_, StoreError>(StockMovement {
                msku: msku.clone(),
                delta,
                stock_before: before,
                stock_after: after,
                reference: reference.to_string(),
                recorded_at,
            })
        })
    }
}
