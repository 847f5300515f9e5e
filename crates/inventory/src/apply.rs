use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use wms_core::Msku;

use crate::store::{ProductStore, StockMovement, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyFailure {
    pub msku: Msku,
    pub delta: i64,
    #[serde(serialize_with = "serialize_error")]
    pub error: StoreError,
}

/// Result of pushing a batch of deltas into a store.
///
/// Deltas are applied in MSKU order. Application stops at the first failure;
/// everything in `applied` has already been committed by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyOutcome {
    pub applied: Vec<StockMovement>,
    pub failed: Option<ApplyFailure>,
    /// MSKUs never attempted because an earlier one failed.
    pub skipped: Vec<Msku>,
}

impl ApplyOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

fn serialize_error<S: serde::Serializer>(err: &StoreError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&err.to_string())
}

/// Apply per-MSKU deltas (negative for outgoing stock) against `store`.
///
/// Zero deltas are skipped rather than sent, since stores reject them.
pub fn apply_deltas<S>(store: &S, deltas: &BTreeMap<Msku, i64>, reference: &str) -> ApplyOutcome
where
    S: ProductStore + ?Sized,
{
    let mut outcome = ApplyOutcome::default();
    let mut pending = deltas.iter().filter(|(_, delta)| **delta != 0);

    for (msku, &delta) in pending.by_ref() {
        match store.apply_delta(msku, delta, reference) {
            Ok(movement) => outcome.applied.push(movement),
            Err(error) => {
                warn!(%msku, delta, %error, reference, "stock update rejected");
                outcome.failed = Some(ApplyFailure {
                    msku: msku.clone(),
                    delta,
                    error,
                });
                break;
            }
        }
    }
    outcome.skipped = pending.map(|(msku, _)| msku.clone()).collect();

    info!(
        reference,
        applied = outcome.applied.len(),
        skipped = outcome.skipped.len(),
        failed = outcome.failed.is_some(),
        "stock deltas applied"
    );
    outcome
}
