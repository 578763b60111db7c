//! Storage operations
//!
//! Enumerates the serving directory for `LIST` and `GET`.

use log::{debug, error};
use std::path::Path;
use tokio::fs;

use crate::error::StorageError;

/// Lists the names of every non-directory entry in `dir`.
///
/// The directory is read fresh on every call. Order follows the filesystem's
/// enumeration and is not sorted. Entry types are resolved through symlinks;
/// an entry whose type cannot be determined (e.g. a dangling link) is listed
/// as a file.
pub async fn list_files(dir: &Path) -> Result<Vec<String>, StorageError> {
    let unreadable = |e| {
        error!("ftserver: unable to open {}: {}", dir.display(), e);
        StorageError::DirectoryUnreadable(dir.to_path_buf(), e)
    };

    let mut entries = fs::read_dir(dir).await.map_err(unreadable)?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(unreadable)? {
        let is_dir = match fs::metadata(entry.path()).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) => {
                debug!("Cannot stat {}: {}", entry.path().display(), e);
                false
            }
        };
        if is_dir {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    debug!("Listed {} files in {}", names.len(), dir.display());
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, create_dir};

    #[tokio::test]
    async fn lists_files_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("hidden.txt")).unwrap();

        let mut names = list_files(dir.path()).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn empty_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rereads_directory_on_every_call() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path()).await.unwrap().is_empty());

        File::create(dir.path().join("late.bin")).unwrap();
        assert_eq!(list_files(dir.path()).await.unwrap(), vec!["late.bin"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_resolved() {
        let dir = tempfile::tempdir().unwrap();
        create_dir(dir.path().join("real_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real_dir"), dir.path().join("dir_link"))
            .unwrap();
        std::os::unix::fs::symlink(dir.path().join("nowhere"), dir.path().join("dangling"))
            .unwrap();

        assert_eq!(list_files(dir.path()).await.unwrap(), vec!["dangling"]);
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        assert!(matches!(
            list_files(&gone).await,
            Err(StorageError::DirectoryUnreadable(path, _)) if path == gone
        ));
    }
}
