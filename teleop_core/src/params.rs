//! Runtime parameter store
//!
//! Flat key/value configuration loaded from YAML. Keys are dotted
//! (`arbiter.scale_counts`, `servo.kp`) and each config struct reads its
//! own prefix, falling back to its defaults for missing keys.

use crate::error::{TeleopError, TeleopResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Shared runtime parameter store
#[derive(Debug, Clone, Default)]
pub struct RuntimeParams {
    /// BTreeMap keeps keys sorted when saved back to disk
    params: Arc<RwLock<BTreeMap<String, Value>>>,
    persist_path: Option<PathBuf>,
}

impl RuntimeParams {
    /// Create an empty store; every config falls back to its defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load parameters from a YAML mapping file
    pub fn from_file(path: &Path) -> TeleopResult<Self> {
        let yaml_str = std::fs::read_to_string(path).map_err(|e| {
            TeleopError::config(format!("cannot read params file {}: {}", path.display(), e))
        })?;
        let mut params = Self::from_yaml_str(&yaml_str)?;
        params.persist_path = Some(path.to_path_buf());
        Ok(params)
    }

    /// Parse parameters from a YAML mapping
    pub fn from_yaml_str(yaml: &str) -> TeleopResult<Self> {
        let loaded: Option<BTreeMap<String, Value>> = serde_yaml::from_str(yaml)?;
        Ok(Self {
            params: Arc::new(RwLock::new(loaded.unwrap_or_default())),
            persist_path: None,
        })
    }

    /// Get a parameter value, `None` if missing or of the wrong type
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.try_get(key).ok().flatten()
    }

    /// Get a parameter value, failing if it is present but has the wrong type
    pub fn try_get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> TeleopResult<Option<T>> {
        let params = self.params.read()?;
        match params.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                TeleopError::config(format!("parameter '{}' has invalid value {}: {}", key, value, e))
            }),
        }
    }

    /// Get a typed parameter, falling back to `default` only when the key is missing
    pub fn require_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> TeleopResult<T> {
        Ok(self.try_get(key)?.unwrap_or(default))
    }

    pub fn get_or<T: for<'de> Deserialize<'de>>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get_or(key, default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get_or(key, default)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: T) -> TeleopResult<()> {
        let json_value = serde_json::to_value(value)?;
        let mut params = self.params.write()?;
        params.insert(key.to_string(), json_value);
        Ok(())
    }

    pub fn has(&self, key: &str) -> bool {
        self.params
            .read()
            .map(|p| p.contains_key(key))
            .unwrap_or(false)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.params.write().ok()?.remove(key)
    }

    pub fn list_keys(&self) -> Vec<String> {
        self.params
            .read()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Write all parameters back as YAML, to `path` or the file they came from
    pub fn save_to_disk(&self, path: Option<&Path>) -> TeleopResult<()> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| self.persist_path.clone())
            .ok_or_else(|| TeleopError::config("no path to save parameters to"))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let params = self.params.read()?;
        let yaml = serde_yaml::to_string(&*params)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
