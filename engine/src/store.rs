//! Rank persistence.
//!
//! The only state that outlives a session is the tier index. [`FileRankStore`]
//! keeps it as `{"tier": N}` next to the config; [`MemoryRankStore`] keeps it
//! in memory for tests and for sessions without a usable data directory.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use seenit_utils::{atomic_write, recover_bak_file};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage for the player's tier index.
pub trait RankStore: Send {
    /// `None` when nothing has been stored yet.
    fn get_tier(&self) -> Result<Option<usize>, StoreError>;
    fn set_tier(&mut self, tier: usize) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgressFile {
    tier: usize,
}

#[derive(Debug, Clone)]
pub struct FileRankStore {
    path: PathBuf,
}

impl FileRankStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RankStore for FileRankStore {
    fn get_tier(&self) -> Result<Option<usize>, StoreError> {
        recover_bak_file(&self.path);

        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let file: ProgressFile =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(file.tier))
    }

    fn set_tier(&mut self, tier: usize) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_vec(&ProgressFile { tier }).map_err(|source| {
            StoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        atomic_write(&self.path, &json).map_err(io_err)?;
        tracing::debug!(path = %self.path.display(), tier, "Saved tier");
        Ok(())
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryRankStore {
    tier: Arc<Mutex<Option<usize>>>,
}

impl MemoryRankStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tier(tier: usize) -> Self {
        Self {
            tier: Arc::new(Mutex::new(Some(tier))),
        }
    }

    /// Current contents, for assertions.
    #[must_use]
    pub fn stored(&self) -> Option<usize> {
        *self.tier.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RankStore for MemoryRankStore {
    fn get_tier(&self) -> Result<Option<usize>, StoreError> {
        Ok(self.stored())
    }

    fn set_tier(&mut self, tier: usize) -> Result<(), StoreError> {
        *self.tier.lock().unwrap_or_else(PoisonError::into_inner) = Some(tier);
        Ok(())
    }
}
