//! View lookup and rendering.
//!
//! Views are template files named `<view>.<engine>` (e.g. `one.html`),
//! searched in the route's views directory first and then the global one.
//! Templates are served as written.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Cannot find view {name:?} in {searched:?}")]
    NotFound { name: String, searched: Vec<PathBuf> },

    #[error("Cannot read view {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Ordered set of views directories.
#[derive(Debug, Clone)]
pub struct ViewResolver {
    dirs: Vec<PathBuf>,
    extension: String,
}

impl ViewResolver {
    pub fn new(dirs: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dirs,
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First existing file for `name`, in directory order.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let name = name.trim_matches('/');
        if name.is_empty() || name.split('/').any(|part| part == "..") {
            return None;
        }
        let file = format!("{}.{}", name, self.extension);
        self.dirs
            .iter()
            .map(|dir| dir.join(&file))
            .find(|path| path.is_file())
    }

    /// Read the view named `name`.
    pub async fn render(&self, name: &str) -> Result<String, ViewError> {
        let path = self.resolve(name).ok_or_else(|| ViewError::NotFound {
            name: name.to_string(),
            searched: self.dirs.clone(),
        })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ViewError::Io { path, source })
    }
}
