use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("preferences io: {0}")]
    Io(#[from] std::io::Error),
    #[error("preferences json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Small persisted key-value store for UI preferences.
/// Loaded once at startup, written on every change.
pub struct PreferenceStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, Value>>,
}

impl PreferenceStore {
    /// A missing or unreadable file starts from empty preferences
    pub fn load(path: &Path) -> Self {
        let values = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt preferences {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };

        Self {
            path: path.to_path_buf(),
            values: RwLock::new(values),
        }
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.read().get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    pub fn set(&self, key: &str, value: Value) -> Result<(), PrefsError> {
        let snapshot = {
            let mut values = self.values.write();
            if values.get(key) == Some(&value) {
                return Ok(());
            }
            values.insert(key.to_string(), value);
            values.clone()
        };
        self.save(&snapshot)
    }

    fn save(&self, values: &BTreeMap<String, Value>) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(values)?)?;
        tracing::debug!("💾 Preferences saved -> {}", self.path.display());
        Ok(())
    }

    /// Dark mode defaults to on
    pub fn dark_mode(&self) -> bool {
        self.get_bool(DARK_MODE_KEY, true)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), PrefsError> {
        self.set(DARK_MODE_KEY, Value::Bool(enabled))
    }
}
