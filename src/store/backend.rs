//! Durable storage backends for wizard state.
//!
//! The store talks to a `StateBackend` so the same core runs against a file
//! on disk (desktop shell), a browser localStorage shim, or an in-memory
//! backend in tests. Backends are dumb byte stores; migration and
//! serialization stay in the store.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("state storage io: {0}")]
    Io(#[from] std::io::Error),
    /// Raised by capped stores (browser localStorage shims) when the payload
    /// no longer fits.
    #[error("state storage quota exceeded")]
    QuotaExceeded,
}

pub trait StateBackend {
    /// Read the persisted payload, `None` if nothing was ever saved.
    fn read(&self) -> Result<Option<String>, BackendError>;
    fn write(&self, payload: &str) -> Result<(), BackendError>;
    fn clear(&self) -> Result<(), BackendError>;
}

/// File-backed storage, one JSON document per wizard session.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional location inside a state directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("wizard.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, BackendError> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn write(&self, payload: &str) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, payload)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryBackend {
    cell: RefCell<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with a pre-existing payload, as if a prior session
    /// had saved it.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            cell: RefCell::new(Some(payload.into())),
        }
    }
}

impl StateBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, BackendError> {
        Ok(self.cell.borrow().clone())
    }

    fn write(&self, payload: &str) -> Result<(), BackendError> {
        *self.cell.borrow_mut() = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), BackendError> {
        *self.cell.borrow_mut() = None;
        Ok(())
    }
}
