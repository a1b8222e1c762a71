use anyhow::{Context, Result};
use tracing::info;

use crate::store::Store;
use crate::workflow::employees;

/// Opens the record store and repairs records left in both the live and
/// pending employee collections.
pub fn init_store(path: &str) -> Result<Store> {
    let store = Store::open(path).with_context(|| format!("Failed to open record store at {path}"))?;

    let dropped = employees::reconcile(&store).context("Failed to reconcile pending employees")?;
    info!(path, dropped, "Record store ready");

    Ok(store)
}
