use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

pub(crate) use backend::PlatformStore;

/// Campaign progress as it is written to disk or browser storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Progress {
    /// Levels opened up by finishing the one before. The first level is
    /// always playable and need not be listed.
    pub(crate) unlocked: BTreeSet<String>,
    pub(crate) game_completed: bool,
}

/// Where campaign progress lives between runs.
pub(crate) trait ProgressStore {
    /// Nothing saved yet reads as fresh progress. Data that exists but cannot
    /// be understood is an error.
    fn load(&self) -> Result<Progress, LoadError>;

    /// Write failures are logged, never fatal.
    fn save(&mut self, progress: &Progress);
}

macro_rules! warn_err {
    ($expr:expr, $($arg:tt)+) => {
        $expr.map_err(|e| log::warn!($($arg)+, e)).ok()
    };
}

fn decode(json: &str) -> Result<Progress, LoadError> {
    Ok(serde_json::from_str(json)?)
}

fn encode(progress: &Progress) -> Option<String> {
    warn_err!(serde_json::to_string(progress), "Failed to encode progress: {}")
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use super::*;

    const STORAGE_KEY: &str = "blastgrid_progress";

    /// Browser local storage.
    #[derive(Debug, Default)]
    pub(crate) struct PlatformStore;

    impl PlatformStore {
        pub(crate) fn new() -> Self {
            Self
        }
    }

    impl ProgressStore for PlatformStore {
        fn load(&self) -> Result<Progress, LoadError> {
            let Some(storage) = warn_err!(quad_storage::STORAGE.lock(), "Storage unavailable: {}")
            else {
                return Ok(Progress::default());
            };
            match storage.get(STORAGE_KEY) {
                Some(json) => decode(&json),
                None => Ok(Progress::default()),
            }
        }

        fn save(&mut self, progress: &Progress) {
            let Some(json) = encode(progress) else {
                return;
            };
            if let Some(mut storage) =
                warn_err!(quad_storage::STORAGE.lock(), "Storage unavailable: {}")
            {
                storage.set(STORAGE_KEY, &json);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use super::*;
    use std::fs::{create_dir_all, read_to_string, write};
    use std::io::ErrorKind;
    use std::path::PathBuf;

    /// JSON file in the platform data directory.
    #[derive(Debug)]
    pub(crate) struct PlatformStore {
        path: Option<PathBuf>,
    }

    impl PlatformStore {
        pub(crate) fn new() -> Self {
            let path = directories::ProjectDirs::from("", "blastgrid", "BlastGrid")
                .map(|dirs| dirs.data_dir().join("progress.json"));
            if path.is_none() {
                log::warn!("No data directory; progress will not be saved");
            }
            Self { path }
        }
    }

    impl ProgressStore for PlatformStore {
        fn load(&self) -> Result<Progress, LoadError> {
            let Some(path) = &self.path else {
                return Ok(Progress::default());
            };
            match read_to_string(path) {
                Ok(json) => decode(&json),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(Progress::default()),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&mut self, progress: &Progress) {
            let (Some(path), Some(json)) = (&self.path, encode(progress)) else {
                return;
            };
            if let Some(parent) = path.parent() {
                warn_err!(
                    create_dir_all(parent),
                    "Failed to create {}: {}",
                    parent.display()
                );
            }
            warn_err!(write(path, json), "Failed to write {}: {}", path.display());
        }
    }
}

/// Keeps the serialized progress in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub(crate) json: Option<String>,
    pub(crate) saves: usize,
}

#[cfg(test)]
impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Progress, LoadError> {
        match &self.json {
            Some(json) => decode(json),
            None => Ok(Progress::default()),
        }
    }

    fn save(&mut self, progress: &Progress) {
        self.json = encode(progress);
        self.saves += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_loads_fresh_progress() {
        let store = MemoryStore::default();
        assert_eq!(store.load().unwrap(), Progress::default());
    }

    #[test]
    fn saved_progress_reads_back() {
        let mut store = MemoryStore::default();
        let progress = Progress {
            unlocked: BTreeSet::from(["level_2".to_string()]),
            game_completed: false,
        };
        store.save(&progress);
        assert_eq!(store.load().unwrap(), progress);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let store = MemoryStore {
            json: Some(r#"{ "game_completed": true }"#.to_string()),
            saves: 0,
        };
        let progress = store.load().unwrap();
        assert!(progress.game_completed);
        assert!(progress.unlocked.is_empty());
    }

    #[test]
    fn garbage_is_a_load_error() {
        let store = MemoryStore {
            json: Some("not json".to_string()),
            saves: 0,
        };
        assert!(matches!(store.load(), Err(LoadError::Json(_))));
    }
}
