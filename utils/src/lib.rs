//! Shared infrastructure utilities for Seen It.
//!
//! Cross-cutting helpers that the engine and the binary both need but that
//! don't belong in the IO-free `seenit-types` crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)
//! - **`data_dir`**: Location of config, progress and logs

pub mod atomic_write;
pub mod data_dir;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, atomic_write, atomic_write_with_options, recover_bak_file,
};
pub use data_dir::{DataDir, DataDirSource};
