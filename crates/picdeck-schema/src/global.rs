//! The process-wide schema store.
//!
//! Populated once, never invalidated. Builds that do not pass an explicit
//! validator read the store installed here. [`reset_global`] exists for
//! test isolation only.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use picdeck_core::RenderError;

use crate::error::SchemaError;
use crate::store::SchemaStore;

static GLOBAL: RwLock<Option<Arc<SchemaStore>>> = RwLock::new(None);

/// Install `store` as the process-wide store.
///
/// Fails with [`SchemaError::AlreadyInstalled`] if a store is present;
/// the installed store is never replaced.
pub fn install(store: SchemaStore) -> Result<Arc<SchemaStore>, SchemaError> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(SchemaError::AlreadyInstalled);
    }
    let store = Arc::new(store);
    *slot = Some(Arc::clone(&store));
    tracing::debug!(schemas = store.len(), "global schema store installed");
    Ok(store)
}

/// The installed process-wide store.
pub fn global() -> Result<Arc<SchemaStore>, RenderError> {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| RenderError::Unresolved {
            reason: "no schema store installed; call picdeck_schema::install or \
                     load_global_once before building"
                .to_string(),
        })
}

/// Return the installed store, loading it from `dir` first if none is
/// installed yet.
///
/// The write lock is held across the load so a second caller never
/// populates the store twice.
pub fn load_global_once(dir: impl AsRef<Path>) -> Result<Arc<SchemaStore>, SchemaError> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(store) = slot.as_ref() {
        return Ok(Arc::clone(store));
    }
    let store = Arc::new(SchemaStore::load_dir(dir)?);
    *slot = Some(Arc::clone(&store));
    Ok(store)
}

/// Remove the installed store. Test hook.
pub fn reset_global() {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}
