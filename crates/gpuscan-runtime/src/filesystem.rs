//! [`FileSystemPort`] over `std::fs`.

use std::fs;
use std::io;
use std::path::Path;

use gpuscan_core::ports::FileSystemPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystemPort for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dirs(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_only_directories_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("v12.1")).unwrap();
        fs::create_dir(temp.path().join("v11.8")).unwrap();
        fs::write(temp.path().join("v9.0"), b"not a dir").unwrap();

        let names = OsFileSystem.list_dirs(temp.path()).unwrap();
        assert_eq!(names, vec!["v11.8", "v12.1"]);
    }

    #[test]
    fn removes_tree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("CUDA");
        fs::create_dir_all(root.join("v12.1").join("bin")).unwrap();
        fs::write(root.join("v12.1").join("bin").join("nvcc.exe"), b"").unwrap();

        assert!(OsFileSystem.is_file(&root.join("v12.1").join("bin").join("nvcc.exe")));
        OsFileSystem.remove_dir_all(&root).unwrap();
        assert!(!OsFileSystem.exists(&root));
    }

    #[test]
    fn listing_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        assert!(OsFileSystem.list_dirs(&temp.path().join("absent")).is_err());
    }
}
