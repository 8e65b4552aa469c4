//! # Filesystem-backed storage
//!
//! [`FileBackend`] is a [`StorageBackend`] implementation that persists each
//! key as one file under a base directory, so a namespace written in one
//! process run is still there after a restart.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <namespace>        # JSON text of the stored object
//! ```
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS | `~/Library/Application Support/<app>/` |
//! | Linux | `~/.local/share/<app>/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\<app>\` |

use std::io;
use std::path::PathBuf;

use crate::error::BackendError;
use crate::store::StorageBackend;

/// Filesystem-backed StorageBackend, one file per key.
#[derive(Clone, Debug)]
pub struct FileBackend {
    base: PathBuf,
}

impl FileBackend {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base.join(key)
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }
}
