use crate::{
    dataset::{Dataset, DatasetLoader},
    error::GrowforgeError,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Single-slot memo of a full dataset load.
///
/// The first `get` runs the loader and keeps the result until `invalidate`.
/// The slot lock is held for the whole load, so callers arriving during a
/// cold load wait for it instead of loading again. Failed loads leave the
/// slot empty.
#[derive(Debug)]
pub struct DatasetCache {
    loader: DatasetLoader,
    slot: Mutex<Option<Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            slot: Mutex::new(None),
        }
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    pub fn get(&self) -> Result<Arc<Dataset>, GrowforgeError> {
        let mut slot = self.lock();
        if let Some(dataset) = slot.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        debug!("Dataset cache empty, loading from '{}'", self.loader.root().display());
        let dataset = Arc::new(self.loader.load()?);
        *slot = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    // A panic during a load cannot leave a half-written slot behind, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Option<Arc<Dataset>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn failed_load_is_not_cached() {
        let tmp = TempDir::new().unwrap();
        let cache = DatasetCache::new(DatasetLoader::new().with_root(tmp.path()));

        assert!(matches!(cache.get(), Err(GrowforgeError::DataDirNotFound(_))));
        assert!(!cache.is_loaded());
    }
}
