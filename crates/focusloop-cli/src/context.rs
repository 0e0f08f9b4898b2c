//! Opening the pieces every command needs from config.toml.

use std::sync::Arc;

use focusloop_core::error::Result;
use focusloop_core::storage::{StorageBackend, UnavailableStore};
use focusloop_core::{Catalog, Config, Database, KeyValueStore, MemoryStore, SettingsStore};

pub type CliResult<T = ()> = std::result::Result<T, Box<dyn std::error::Error>>;

pub struct Context {
    pub config: Config,
    pub catalog: Arc<Catalog>,
}

impl Context {
    /// Load config and catalog. A malformed config or catalog file is an
    /// error; a missing one means defaults.
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let catalog = match &config.catalog.path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin(),
        };
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
        })
    }

    /// Open the configured storage. If the database cannot be opened the
    /// store runs in memory and reports the problem once.
    pub fn open_store(&self) -> SettingsStore {
        SettingsStore::open(self.backend(), Arc::clone(&self.catalog))
    }

    fn backend(&self) -> Box<dyn KeyValueStore> {
        match self.config.storage.backend {
            StorageBackend::Memory => Box::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                let opened = self
                    .config
                    .database_path()
                    .and_then(|path| Database::open(&path));
                match opened {
                    Ok(db) => Box::new(db),
                    Err(e) => Box::new(UnavailableStore::new(e.to_string())),
                }
            }
        }
    }
}
