use anyhow::{Context, Result, anyhow};
use std::{
    fmt::Debug,
    fs,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::model::Location;

/// Persisted list of recently viewed locations, most recent first.
pub trait RecentStore: Send + Sync + Debug {
    fn load(&self) -> Result<Vec<Location>>;

    /// Record a visit. Ordering and deduplication are up to the store.
    fn add(&self, location: &Location) -> Result<()>;
}

/// Recent locations kept as a JSON array in a single file.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader sees either the old or the new list. Writers are serialized, and
/// clones share the same lock.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    limit: usize,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf, limit: usize) -> Self {
        Self {
            path,
            limit,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Drop every stored location.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock()?;
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| anyhow!("Recent locations lock poisoned"))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecentStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Location>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read recent locations: {}", self.path.display()))?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse recent locations: {}", self.path.display()))
    }

    fn add(&self, location: &Location) -> Result<()> {
        let _guard = self.lock()?;
        let mut locations = self.load()?;
        locations.retain(|l| !l.same_place(location));
        locations.insert(0, location.clone());
        locations.truncate(self.limit);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let json = serde_json::to_string_pretty(&locations)
            .context("Failed to serialize recent locations")?;

        let temp = self.temp_path();
        fs::write(&temp, json)
            .with_context(|| format!("Failed to write recent locations: {}", temp.display()))?;
        fs::rename(&temp, &self.path).with_context(|| {
            format!("Failed to replace recent locations: {}", self.path.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_store(limit: usize) -> JsonFileStore {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "weather-store-{}-{nanos}",
            std::process::id()
        ));
        JsonFileStore::new(dir.join("recent.json"), limit)
    }

    fn place(name: &str, lat: f64) -> Location {
        Location {
            name: name.into(),
            admin1: None,
            country: Some("Chile".into()),
            latitude: lat,
            longitude: -70.0,
        }
    }

    fn names(store: &JsonFileStore) -> Vec<String> {
        store.load().unwrap().into_iter().map(|l| l.name).collect()
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let store = temp_store(5);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_puts_newest_first_and_dedups_by_coordinates() {
        let store = temp_store(5);
        store.add(&place("Arica", -18.0)).unwrap();
        store.add(&place("Iquique", -20.0)).unwrap();
        store.add(&place("Arica again", -18.0)).unwrap();

        assert_eq!(names(&store), vec!["Arica again", "Iquique"]);

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_respects_limit() {
        let store = temp_store(2);
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            store.add(&place(name, i as f64)).unwrap();
        }

        assert_eq!(names(&store), vec!["c", "b"]);
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let store = temp_store(2);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse recent locations"));
        store.clear().unwrap();
    }

    #[test]
    fn readers_never_see_a_half_written_file() {
        let store = temp_store(30);
        for i in 0..30 {
            store.add(&place("seed", f64::from(i))).unwrap();
        }

        let writer = store.clone();
        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..300 {
                    writer.add(&place("visit", f64::from(i % 40))).unwrap();
                }
            });
            for _ in 0..2000 {
                assert_eq!(store.load().unwrap().len(), 30);
            }
        });
        assert!(!store.temp_path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn overlapping_adds_keep_every_entry() {
        let store = temp_store(100);
        thread::scope(|s| {
            for t in 0..4 {
                let store = store.clone();
                s.spawn(move || {
                    for i in 0..10 {
                        store.add(&place("visit", f64::from(t * 10 + i))).unwrap();
                    }
                });
            }
        });

        assert_eq!(store.load().unwrap().len(), 40);
        store.clear().unwrap();
    }
}
