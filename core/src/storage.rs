use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Skalarverdi i nøkkel/verdi-lageret.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i32),
    Long(i64),
    Float(f32),
}

/// Nøkkel/verdi-lager for `Save()` og gjenoppretting ved oppstart.
/// `put` er bufret til `commit` for implementasjoner som skriver til disk.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<StoredValue>;
    fn put(&mut self, key: &str, value: StoredValue);
    fn commit(&mut self) -> Result<()>;

    fn get_float(&self, key: &str, default: f32) -> f32 {
        match self.get(key) {
            Some(StoredValue::Float(v)) => v,
            Some(StoredValue::Int(v)) => v as f32,
            Some(StoredValue::Long(v)) => v as f32,
            None => default,
        }
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        match self.get(key) {
            Some(StoredValue::Int(v)) => v,
            Some(StoredValue::Long(v)) => i32::try_from(v).unwrap_or(default),
            _ => default,
        }
    }

    fn get_long(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(StoredValue::Long(v)) => v,
            Some(StoredValue::Int(v)) => v as i64,
            _ => default,
        }
    }
}

/// Delt lager i minnet. Klonen peker på samme data, så en ny komponent
/// kan gjenopprettes fra "samme lager" i tester og i en og samme prosess.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<Mutex<BTreeMap<String, StoredValue>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredValue>> {
        // en forgiftet mutex betyr bare at en annen tråd paniket midt i put
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.lock().get(key).copied()
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.lock().insert(key.to_string(), value);
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// JSON-fil per preferanse-navn (`<dir>/<name>.json`), pretty-print.
/// Mangler filen, starter lageret tomt.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    data: BTreeMap<String, StoredValue>,
}

impl JsonFileStore {
    pub fn open(dir: impl AsRef<Path>, prefs_name: &str) -> Result<Self> {
        let path = dir.as_ref().join(format!("{prefs_name}.json"));
        let data = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            let data: BTreeMap<String, StoredValue> = serde_json::from_str(&contents)?;
            log::info!("prefs loaded from {} ({} keys)", path.display(), data.len());
            data
        } else {
            log::info!("no prefs at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.data.get(key).copied()
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        self.data.insert(key.to_string(), value);
    }

    fn commit(&mut self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, json)?;
        log::info!("prefs saved to {}", self.path.display());
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Option<StoredValue> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: StoredValue) {
        (**self).put(key, value)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }
}
