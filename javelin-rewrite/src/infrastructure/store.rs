//! Where passes read and write file contents
//!
//! Migration writes straight to the working tree. Preview layers an in-memory
//! overlay over an untouched snapshot so the same passes can run without side
//! effects.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::encoding::{SourceEncoding, SourceReadError, read_source_file, read_source_file_detected};
use crate::domain::TransformationError;

pub trait SourceStore {
    fn root(&self) -> &Path;

    /// Current content, `None` when the file does not exist
    fn read(&self, relative: &str) -> Result<Option<String>, TransformationError>;

    fn write(&mut self, relative: &str, content: &str) -> Result<(), TransformationError>;
}

fn read_from_disk(path: PathBuf) -> Result<Option<String>, TransformationError> {
    if !path.is_file() {
        return Ok(None);
    }
    match read_source_file(&path) {
        Ok(text) => Ok(Some(text)),
        Err(SourceReadError::Io(source)) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(e) => Err(TransformationError::from_read(path, e)),
    }
}

/// Reads and writes the working tree
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceStore for DiskStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, relative: &str) -> Result<Option<String>, TransformationError> {
        read_from_disk(self.root.join(relative))
    }

    fn write(&mut self, relative: &str, content: &str) -> Result<(), TransformationError> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TransformationError::Write {
                path: path.clone(),
                source,
            })?;
        }
        // Keep the encoding the file already had; new files are UTF-8
        let encoding = match read_source_file_detected(&path) {
            Ok((_, encoding)) => encoding,
            Err(_) => SourceEncoding::Utf8,
        };
        let bytes = match encoding.encode(content) {
            Some(bytes) => bytes,
            None => {
                warn!(file = %relative, encoding = ?encoding, "Content not representable, writing UTF-8");
                content.as_bytes().to_vec()
            }
        };
        std::fs::write(&path, bytes).map_err(|source| TransformationError::Write { path, source })
    }
}

/// Reads through to disk, keeps every write in memory
#[derive(Debug, Clone)]
pub struct OverlayStore {
    root: PathBuf,
    originals: BTreeMap<String, Option<String>>,
    overlay: BTreeMap<String, String>,
}

impl OverlayStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            originals: BTreeMap::new(),
            overlay: BTreeMap::new(),
        }
    }

    /// Files whose final content differs from the snapshot, as (path, original, updated)
    pub fn changed_files(&self) -> impl Iterator<Item = (&str, Option<&str>, &str)> {
        self.overlay.iter().filter_map(|(path, updated)| {
            let original = self.originals.get(path).and_then(|o| o.as_deref());
            (original != Some(updated.as_str())).then_some((path.as_str(), original, updated.as_str()))
        })
    }
}

impl SourceStore for OverlayStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, relative: &str) -> Result<Option<String>, TransformationError> {
        if let Some(content) = self.overlay.get(relative) {
            return Ok(Some(content.clone()));
        }
        read_from_disk(self.root.join(relative))
    }

    fn write(&mut self, relative: &str, content: &str) -> Result<(), TransformationError> {
        if !self.originals.contains_key(relative) {
            let original = read_from_disk(self.root.join(relative))?;
            self.originals.insert(relative.to_string(), original);
        }
        self.overlay.insert(relative.to_string(), content.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_never_touches_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.java"), "old").unwrap();

        let mut store = OverlayStore::new(dir.path());
        store.write("A.java", "new").unwrap();
        store.write("settings.gradle", "rootProject.name = 'x'").unwrap();

        assert_eq!(store.read("A.java").unwrap().as_deref(), Some("new"));
        assert_eq!(std::fs::read_to_string(dir.path().join("A.java")).unwrap(), "old");
        assert!(!dir.path().join("settings.gradle").exists());

        let changed: Vec<_> = store.changed_files().collect();
        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&("A.java", Some("old"), "new")));
        assert!(changed.contains(&("settings.gradle", None, "rootProject.name = 'x'")));
    }

    #[test]
    fn test_overlay_write_back_to_original_is_not_a_change() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.java"), "same").unwrap();

        let mut store = OverlayStore::new(dir.path());
        store.write("A.java", "other").unwrap();
        store.write("A.java", "same").unwrap();
        assert_eq!(store.changed_files().count(), 0);
    }

    #[test]
    fn test_disk_store_keeps_legacy_encoding() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("A.java"), b"// caf\xe9\nInteger i = new Integer(1);\n").unwrap();
        std::fs::write(dir.path().join("B.java"), b"\xEF\xBB\xBFclass B {}\n").unwrap();

        let mut store = DiskStore::new(dir.path());
        store.write("A.java", "// caf\u{e9}\nInteger i = Integer.valueOf(1);\n").unwrap();
        store.write("B.java", "class B { }\n").unwrap();
        store.write("C.java", "class C {}\n").unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("A.java")).unwrap(),
            b"// caf\xe9\nInteger i = Integer.valueOf(1);\n"
        );
        assert_eq!(std::fs::read(dir.path().join("B.java")).unwrap(), b"\xEF\xBB\xBFclass B { }\n");
        assert_eq!(std::fs::read(dir.path().join("C.java")).unwrap(), b"class C {}\n");
    }

    #[test]
    fn test_disk_store_reports_missing_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        assert!(store.read("pom.xml").unwrap().is_none());
    }
}
