//! On-disk storage for uploaded attachment content.
//!
//! Files are written under a single uploads directory with a generated
//! collision-free name; the original filename only survives as metadata in
//! the database. The store never reuses or renames entries, matching the
//! append-only attachment model.

use std::path::{Path, PathBuf};

use anyhow::Result;
use uuid::Uuid;

/// Per-file upload limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted upload extensions: images, PDFs, and common office documents.
const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpeg", "jpg", "png", "gif", "pdf", "doc", "docx", "txt", "xls", "xlsx", "ppt", "pptx",
];

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
];

/// Check an upload against the type allow-list. Both the filename extension
/// and the declared MIME type must pass.
pub fn is_allowed_type(original_name: &str, mime_type: &str) -> bool {
    let ext_ok = extension_of(original_name)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);
    ext_ok && ALLOWED_MIME_TYPES.contains(&mime_type)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// File storage rooted at a fixed uploads directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write uploaded bytes under a fresh collision-free name
    /// (`{uuid}{extension}`) and return that name.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let stored_name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        std::fs::write(self.root.join(&stored_name), bytes)?;
        Ok(stored_name)
    }

    pub fn path(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    pub fn read(&self, stored_name: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.path(stored_name))?)
    }

    /// Delete a stored file. Used for orphan cleanup when the referencing
    /// idea turns out not to exist.
    pub fn remove(&self, stored_name: &str) -> Result<()> {
        std::fs::remove_file(self.path(stored_name))?;
        Ok(())
    }
}

impl Clone for FileStore {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_generates_unique_names_and_keeps_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).unwrap();

        let a = store.save("photo.PNG", b"one").unwrap();
        let b = store.save("photo.PNG", b"two").unwrap();

        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert_eq!(store.read(&a).unwrap(), b"one");
        assert_eq!(store.read(&b).unwrap(), b"two");
    }

    #[test]
    fn save_handles_names_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).unwrap();

        let name = store.save("README", b"hello").unwrap();
        assert!(!name.contains('.'));
        assert_eq!(store.read(&name).unwrap(), b"hello");
    }

    #[test]
    fn remove_deletes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).unwrap();

        let name = store.save("doc.pdf", b"data").unwrap();
        store.remove(&name).unwrap();
        assert!(!store.path(&name).exists());
    }

    #[test]
    fn type_filter_accepts_allowed_combinations() {
        assert!(is_allowed_type("photo.jpg", "image/jpeg"));
        assert!(is_allowed_type("report.PDF", "application/pdf"));
        assert!(is_allowed_type("notes.txt", "text/plain"));
    }

    #[test]
    fn type_filter_rejects_disallowed_extension_or_mime() {
        assert!(!is_allowed_type("script.sh", "text/plain"));
        assert!(!is_allowed_type("photo.jpg", "application/x-sh"));
        assert!(!is_allowed_type("no_extension", "image/png"));
    }
}
