use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::collections::CollectionsStore;
use crate::error::PersistError;
use crate::journal::JournalStore;
use crate::team::TeamStore;

pub const TEAM_KEY: &str = "kalosdex-team";
pub const CAUGHT_KEY: &str = "kalosdex-caught-pokemon";
pub const LIKED_KEY: &str = "kalosdex-liked-pokemon";
pub const HUNTING_KEY: &str = "kalosdex-hunting-list";
pub const JOURNAL_KEY: &str = "kalosdex-journal-entries";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// One JSON file per key inside a data directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
            .collect();
        self.root.join(format!("{file}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-process store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut values = self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub fn read_json<T: DeserializeOwned>(
    port: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistError> {
    let Some(raw) = port.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| PersistError::Decode {
            key: key.to_string(),
            source,
        })
}

pub fn write_json<T: Serialize>(
    port: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(value).map_err(|source| PersistError::Encode {
        key: key.to_string(),
        source,
    })?;
    port.set(key, &raw)
}

/// A store snapshot living under one key.
pub trait Persisted: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;

    fn load(port: &dyn KeyValueStore) -> Self {
        match read_json::<Self>(port, Self::KEY) {
            Ok(Some(value)) => {
                debug!(key = Self::KEY, "loaded snapshot");
                value
            }
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(key = Self::KEY, error = %err, "failed to load snapshot, starting empty");
                Self::default()
            }
        }
    }

    fn save(&self, port: &dyn KeyValueStore) {
        if let Err(err) = write_json(port, Self::KEY, self) {
            error!(key = Self::KEY, error = %err, "failed to save snapshot");
        }
    }
}

impl Persisted for TeamStore {
    const KEY: &'static str = TEAM_KEY;
}

/// Collections keep one key per map, so each map can be read independently.
impl Persisted for CollectionsStore {
    const KEY: &'static str = CAUGHT_KEY;

    fn load(port: &dyn KeyValueStore) -> Self {
        Self {
            caught: load_or_default(port, CAUGHT_KEY),
            liked: load_or_default(port, LIKED_KEY),
            hunting_list: load_or_default(port, HUNTING_KEY),
        }
    }

    fn save(&self, port: &dyn KeyValueStore) {
        for (key, result) in [
            (CAUGHT_KEY, write_json(port, CAUGHT_KEY, &self.caught)),
            (LIKED_KEY, write_json(port, LIKED_KEY, &self.liked)),
            (HUNTING_KEY, write_json(port, HUNTING_KEY, &self.hunting_list)),
        ] {
            if let Err(err) = result {
                error!(key, error = %err, "failed to save snapshot");
            }
        }
    }
}

fn load_or_default<T: DeserializeOwned + Default>(port: &dyn KeyValueStore, key: &str) -> T {
    match read_json::<T>(port, key) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            warn!(key, error = %err, "failed to load snapshot, starting empty");
            T::default()
        }
    }
}

impl Persisted for JournalStore {
    const KEY: &'static str = JOURNAL_KEY;

    fn load(port: &dyn KeyValueStore) -> Self {
        let mut journal = match read_json::<Self>(port, Self::KEY) {
            Ok(value) => value.unwrap_or_default(),
            Err(err) => {
                warn!(key = Self::KEY, error = %err, "failed to load journal, starting empty");
                Self::default()
            }
        };
        journal.sort();
        journal
    }
}

/// Every persisted store, loaded once at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stores {
    pub team: TeamStore,
    pub collections: CollectionsStore,
    pub journal: JournalStore,
}

impl Stores {
    pub fn load(port: &dyn KeyValueStore) -> Self {
        Self {
            team: TeamStore::load(port),
            collections: CollectionsStore::load(port),
            journal: JournalStore::load(port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::AddTeamMember;

    #[test]
    fn file_store_round_trips_and_reports_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        assert_eq!(store.get(TEAM_KEY).unwrap(), None);
        store.set(TEAM_KEY, "[]").unwrap();
        assert_eq!(store.get(TEAM_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data").join("kalosdex-team.json").exists());
    }

    #[test]
    fn corrupted_snapshot_loads_as_empty() {
        let port = MemoryStore::new();
        port.set(TEAM_KEY, "{not json").unwrap();
        assert!(TeamStore::load(&port).is_empty());
    }

    #[test]
    fn stores_load_what_was_saved() {
        let port = MemoryStore::new();
        let mut team = TeamStore::default();
        team.add(AddTeamMember {
            species: "Froakie".into(),
            level: 5,
            pokemon_id: Some(656),
            types: vec!["Water".into()],
            ..Default::default()
        })
        .unwrap();
        team.save(&port);

        let mut collections = CollectionsStore::default();
        collections.toggle_caught(656);
        collections.save(&port);

        let loaded = Stores::load(&port);
        assert_eq!(loaded.team, team);
        assert!(loaded.collections.is_caught(656));
        assert!(loaded.journal.is_empty());
        assert_eq!(port.get(CAUGHT_KEY).unwrap().as_deref(), Some(r#"{"656":true}"#));
    }

    #[test]
    fn one_corrupted_collection_map_leaves_the_others() {
        let port = MemoryStore::new();
        port.set(LIKED_KEY, r#"{"25":true}"#).unwrap();
        port.set(HUNTING_KEY, "[").unwrap();
        let collections = CollectionsStore::load(&port);
        assert!(collections.is_liked(25));
        assert!(collections.hunting_list.is_empty());
    }
}
