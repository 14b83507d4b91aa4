use crate::error::GalileoProjError;
use bytes::Bytes;
use log::{debug, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Provides the content of grid shift files by name.
pub trait GridSource: Send + Sync {
    /// Loads the grid file. Returns `Ok(None)` if the source does not have it.
    fn load(&self, name: &str) -> Result<Option<Bytes>, GalileoProjError>;
}

/// Loads grid files from a folder in the file system.
#[derive(Debug, Clone)]
pub struct DirectoryGridSource {
    root: PathBuf,
}

impl DirectoryGridSource {
    /// Creates a source reading from the given folder.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The folder.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GridSource for DirectoryGridSource {
    fn load(&self, name: &str) -> Result<Option<Bytes>, GalileoProjError> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            warn!("Grid name '{name}' is not a plain file name");
            return Ok(None);
        }

        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(data) => {
                debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(Bytes::from(data)))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
