//! The per-user data directory (`~/.seenit`).

use std::path::{Path, PathBuf};

const DIR_NAME: &str = ".seenit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataDirSource {
    /// Under the user's home directory.
    System,
    /// Relative to the working directory, used when there is no home directory.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct DataDir {
    path: PathBuf,
    source: DataDirSource,
}

impl DataDir {
    /// `~/.seenit`, or `./.seenit` when the home directory is unknown.
    #[must_use]
    pub fn resolve() -> Self {
        match dirs::home_dir() {
            Some(home) => Self {
                path: home.join(DIR_NAME),
                source: DataDirSource::System,
            },
            None => Self::fallback(),
        }
    }

    #[must_use]
    pub fn fallback() -> Self {
        Self {
            path: PathBuf::from(DIR_NAME),
            source: DataDirSource::Fallback,
        }
    }

    /// A data directory rooted somewhere specific (tests, portable installs).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: DataDirSource::System,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn source(&self) -> DataDirSource {
        self.source
    }

    #[must_use]
    pub fn join(&self, child: &str) -> PathBuf {
        self.path.join(child)
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.join("config.toml")
    }

    #[must_use]
    pub fn progress_path(&self) -> PathBuf {
        self.join("progress.json")
    }

    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.join("logs").join("seenit.log")
    }

    /// Create the directory, tightening permissions to owner-only on Unix
    /// when we own it.
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(&self.path)?;
            let mode = metadata.permissions().mode() & 0o777;
            if mode & 0o077 != 0
                && let Err(e) =
                    std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o700))
            {
                tracing::debug!(path = %self.path.display(), "Could not restrict data dir: {e}");
            }
        }
        Ok(())
    }
}
