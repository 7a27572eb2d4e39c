/// Progress persistence
///
/// Saves and loads in-progress wizard state so a reload resumes where
/// the user left off. The engine only needs save/load round-tripping
/// and clear-makes-load-none; the backing mechanism is opaque to it.

use crate::error::StoreError;
use crate::wizard::state::WizardState;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Key-value persistence for partial wizard progress, keyed by flow id.
pub trait ProgressStore {
    fn save(&self, flow_id: &str, state: &WizardState) -> Result<(), StoreError>;
    fn load(&self, flow_id: &str) -> Result<Option<WizardState>, StoreError>;
    fn clear(&self, flow_id: &str) -> Result<(), StoreError>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn save(&self, flow_id: &str, state: &WizardState) -> Result<(), StoreError> {
        (**self).save(flow_id, state)
    }

    fn load(&self, flow_id: &str) -> Result<Option<WizardState>, StoreError> {
        (**self).load(flow_id)
    }

    fn clear(&self, flow_id: &str) -> Result<(), StoreError> {
        (**self).clear(flow_id)
    }
}

/// On-disk store: one pretty-printed JSON file per flow under the
/// platform config directory.
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Store under the platform-specific config directory.
    pub fn new() -> Result<Self, StoreError> {
        let base_dir = dirs::config_dir()
            .ok_or(StoreError::Unavailable)?
            .join("RideFlow");
        Ok(Self { base_dir })
    }

    /// Store under an explicit directory.
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn file_path(&self, flow_id: &str) -> PathBuf {
        self.base_dir.join(format!("{flow_id}.json"))
    }
}

impl ProgressStore for JsonFileStore {
    fn save(&self, flow_id: &str, state: &WizardState) -> Result<(), StoreError> {
        let path = self.file_path(flow_id);
        let wrap = |source: Box<dyn std::error::Error + Send + Sync>| StoreError::SaveFailed {
            flow_id: flow_id.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.base_dir).map_err(|e| wrap(e.into()))?;
        let json = serde_json::to_string_pretty(state).map_err(|e| wrap(e.into()))?;
        std::fs::write(&path, json).map_err(|e| wrap(e.into()))?;

        debug!(flow = flow_id, path = %path.display(), "Saved wizard progress");
        Ok(())
    }

    fn load(&self, flow_id: &str) -> Result<Option<WizardState>, StoreError> {
        let path = self.file_path(flow_id);
        if !path.exists() {
            return Ok(None);
        }

        let wrap = |source: Box<dyn std::error::Error + Send + Sync>| StoreError::LoadFailed {
            flow_id: flow_id.to_string(),
            source,
        };
        let json = std::fs::read_to_string(&path).map_err(|e| wrap(e.into()))?;
        let state = serde_json::from_str(&json).map_err(|e| wrap(e.into()))?;

        debug!(flow = flow_id, path = %path.display(), "Loaded wizard progress");
        Ok(Some(state))
    }

    fn clear(&self, flow_id: &str) -> Result<(), StoreError> {
        let path = self.file_path(flow_id);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| StoreError::ClearFailed {
                flow_id: flow_id.to_string(),
                source: e.into(),
            })?;
            debug!(flow = flow_id, "Cleared wizard progress");
        }
        Ok(())
    }
}

/// In-memory store. Clones share the same map, which lets tests and the
/// demo hand one store to several engines.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, WizardState>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn save(&self, flow_id: &str, state: &WizardState) -> Result<(), StoreError> {
        self.entries
            .lock()
            .insert(flow_id.to_string(), state.clone());
        Ok(())
    }

    fn load(&self, flow_id: &str) -> Result<Option<WizardState>, StoreError> {
        Ok(self.entries.lock().get(flow_id).cloned())
    }

    fn clear(&self, flow_id: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(flow_id);
        Ok(())
    }
}
