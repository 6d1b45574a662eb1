//! Resolving relative workbook locations against resource roots

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ImportError, Result};

/// Ordered list of directories searched for workbook files
#[derive(Debug, Clone)]
pub struct ResourceRoots {
    roots: Vec<PathBuf>,
}

impl Default for ResourceRoots {
    /// The current directory only
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
        }
    }
}

impl ResourceRoots {
    /// Create a root list; earlier roots win
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Append another root with the lowest priority
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Find the first existing file for `location`
    pub fn resolve(&self, location: &str) -> Result<PathBuf> {
        let relative = Path::new(location);
        if location.is_empty() {
            return Err(ImportError::ResourceNotFound(location.to_string()));
        }

        let found = if relative.is_absolute() {
            relative.is_file().then(|| relative.to_path_buf())
        } else {
            self.roots
                .iter()
                .map(|root| root.join(relative))
                .find(|candidate| candidate.is_file())
        };

        match found {
            Some(path) => {
                debug!(location, path = %path.display(), "resolved workbook location");
                Ok(path)
            }
            None => Err(ImportError::ResourceNotFound(location.to_string())),
        }
    }
}
