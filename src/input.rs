//! Turn command-line paths into uploaded items.
//!
//! Each path is either a file, taken as given whatever its extension, or a
//! directory, whose direct children are taken when their extension has a
//! decoder compiled in. Directories are not walked recursively. Hidden
//! entries are skipped. Entries within a directory are sorted by name so the
//! upload order (which breaks ties between equal indices) is reproducible.

use crate::imaging::supported_input_extensions;
use crate::types::UploadedItem;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No such file or directory: {0}")]
    NotFound(PathBuf),
}

/// Read every input path into memory, in argument order.
pub fn collect_uploads(paths: &[PathBuf]) -> Result<Vec<UploadedItem>, InputError> {
    let mut uploads = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in collect_entries(path)? {
                uploads.push(read_upload(&file)?);
            }
        } else if path.is_file() {
            uploads.push(read_upload(path)?);
        } else {
            return Err(InputError::NotFound(path.clone()));
        }
    }
    Ok(uploads)
}

fn collect_entries(dir: &Path) -> Result<Vec<PathBuf>, InputError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| !is_hidden(p) && is_image(p))
        .collect();

    entries.sort();
    Ok(entries)
}

fn read_upload(path: &Path) -> Result<UploadedItem, InputError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    Ok(UploadedItem::new(name, fs::read(path)?))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().starts_with('.'))
}

fn is_image(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    supported_input_extensions().contains(&ext.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(uploads: &[UploadedItem]) -> Vec<&str> {
        uploads.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn directory_entries_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        for name in ["b2.png", "a1.JPG", "notes.txt", ".hidden3.png", "c3.jpeg"] {
            fs::write(tmp.path().join(name), name.as_bytes()).unwrap();
        }
        fs::create_dir(tmp.path().join("nested4.png")).unwrap();

        let uploads = collect_uploads(&[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(names(&uploads), vec!["a1.JPG", "b2.png", "c3.jpeg"]);
        assert_eq!(uploads[1].bytes, b"b2.png");
    }

    #[test]
    fn explicit_files_are_kept_as_given() {
        let tmp = TempDir::new().unwrap();
        let txt = tmp.path().join("odd7.txt");
        let png = tmp.path().join("p1.png");
        fs::write(&txt, b"text").unwrap();
        fs::write(&png, b"png").unwrap();

        let uploads = collect_uploads(&[txt, png]).unwrap();
        assert_eq!(names(&uploads), vec!["odd7.txt", "p1.png"]);
    }

    #[test]
    fn mixed_files_and_dirs_keep_argument_order() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("batch");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("x1.png"), b"1").unwrap();
        let single = tmp.path().join("z9.jpg");
        fs::write(&single, b"9").unwrap();

        let uploads = collect_uploads(&[single, dir]).unwrap();
        assert_eq!(names(&uploads), vec!["z9.jpg", "x1.png"]);
    }

    #[test]
    fn missing_path_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = collect_uploads(&[tmp.path().join("nope.png")]);
        assert!(matches!(result, Err(InputError::NotFound(_))));
    }

    #[test]
    fn empty_directory_gives_no_uploads() {
        let tmp = TempDir::new().unwrap();
        assert!(collect_uploads(&[tmp.path().to_path_buf()]).unwrap().is_empty());
    }
}
