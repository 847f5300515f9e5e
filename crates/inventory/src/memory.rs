use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;

use wms_catalog::Catalog;
use wms_core::Msku;

use crate::store::{ProductStore, StockMovement, StoreError, checked_new_stock};

/// In-memory store for tests, dry runs and single-session use.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    stock: RwLock<BTreeMap<Msku, i64>>,
    movements: RwLock<Vec<StockMovement>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stock levels from the catalog's inventory sheet.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let stock = catalog
            .products()
            .map(|p| (p.msku.clone(), p.stock))
            .collect::<BTreeMap<_, _>>();
        Self {
            stock: RwLock::new(stock),
            movements: RwLock::default(),
        }
    }

    pub fn insert(&self, msku: Msku, stock: i64) -> Result<(), StoreError> {
        self.stock.write().map_err(|_| poisoned("stock"))?.insert(msku, stock);
        Ok(())
    }

    /// Movement log, oldest first.
    pub fn movements(&self) -> Result<Vec<StockMovement>, StoreError> {
        Ok(self.movements.read().map_err(|_| poisoned("movement"))?.clone())
    }
}

fn poisoned(lock: &str) -> StoreError {
    StoreError::Backend(format!("{lock} lock poisoned"))
}

impl ProductStore for InMemoryProductStore {
    fn get_stock(&self, msku: &Msku) -> Result<i64, StoreError> {
        let map = self
            .stock
            .read()
            .map_err(|_| poisoned("stock"))?;
        map.get(msku)
            .copied()
            .ok_or_else(|| StoreError::UnknownProduct(msku.clone()))
    }

    fn apply_delta(
        &self,
        msku: &Msku,
        delta: i64,
        reference: &str,
    ) -> Result<StockMovement, StoreError> {
        let mut map = self.stock.write().map_err(|_| poisoned("stock"))?;
        let mut log = self.movements.write().map_err(|_| poisoned("movement"))?;
        let current = map
            .get_mut(msku)
            .ok_or_else(|| StoreError::UnknownProduct(msku.clone()))?;

        let before = *current;
        let after = checked_new_stock(msku, before, delta)?;
        *current = after;

        let movement = StockMovement {
            msku: msku.clone(),
            delta,
            stock_before: before,
            stock_after: after,
            reference: reference.to_string(),
            recorded_at: Utc::now(),
        };
        log.push(movement.clone());
        Ok(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msku(s: &str) -> Msku {
        Msku::new(s).unwrap()
    }

    #[test]
    fn apply_delta_updates_stock_and_logs_movement() {
        let store = InMemoryProductStore::new();
        store.insert(msku("M1"), 10).unwrap();

        let movement = store.apply_delta(&msku("m1"), -4, "batch-1").unwrap();
        assert_eq!(movement.stock_before, 10);
        assert_eq!(movement.stock_after, 6);
        assert_eq!(store.get_stock(&msku("M1")).unwrap(), 6);
        assert_eq!(store.movements().unwrap().len(), 1);
        assert_eq!(store.movements().unwrap()[0].reference, "batch-1");
    }

    #[test]
    fn rejects_zero_unknown_and_overdraw_without_changing_stock() {
        let store = InMemoryProductStore::new();
        store.insert(msku("M1"), 2).unwrap();

        assert_eq!(store.apply_delta(&msku("M1"), 0, "r"), Err(StoreError::ZeroDelta));
        assert_eq!(
            store.apply_delta(&msku("NOPE"), -1, "r"),
            Err(StoreError::UnknownProduct(msku("NOPE")))
        );
        assert!(matches!(
            store.apply_delta(&msku("M1"), -3, "r"),
            Err(StoreError::InsufficientStock { stock: 2, delta: -3, .. })
        ));
        assert_eq!(store.get_stock(&msku("M1")).unwrap(), 2);
        assert!(store.movements().unwrap().is_empty());
    }

    #[test]
    fn poisoned_movement_log_leaves_stock_untouched() {
        let store = std::sync::Arc::new(InMemoryProductStore::new());
        store.insert(msku("M1"), 5).unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.movements.write().unwrap();
            panic!("poison");
        })
        .join();

        assert!(matches!(
            store.apply_delta(&msku("M1"), -2, "r"),
            Err(StoreError::Backend(_))
        ));
        assert_eq!(store.get_stock(&msku("M1")).unwrap(), 5);
        assert!(matches!(store.movements(), Err(StoreError::Backend(_))));
    }

    #[test]
    fn poisoned_stock_lock_is_reported_by_insert() {
        let store = std::sync::Arc::new(InMemoryProductStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.stock.write().unwrap();
            panic!("poison");
        })
        .join();

        assert!(matches!(store.insert(msku("M1"), 1), Err(StoreError::Backend(_))));
    }

    #[test]
    fn stock_may_reach_exactly_zero() {
        let store = InMemoryProductStore::new();
        store.insert(msku("M1"), 3).unwrap();
        let movement = store.apply_delta(&msku("M1"), -3, "r").unwrap();
        assert_eq!(movement.stock_after, 0);
    }
}
