//! Filesystem port used by the toolkit probe, the finder and the orchestrator.

use std::io;
use std::path::Path;

/// The handful of filesystem operations the inspector needs.
pub trait FileSystemPort: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Names of the immediate subdirectories of `path`, sorted.
    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Recursively delete `path`.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}
