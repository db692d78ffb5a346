//! Locating the files a rule kind applies to

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};
use walkdir::{DirEntry, WalkDir};

use crate::domain::FileKind;

/// Source roots tried in order. The project root is the last resort.
const SOURCE_DIRS: &[&str] = &["src/main/java", "src/test/java", "src"];

const EXCLUDED_DIRS: &[&str] = &["target", "build", "out", "node_modules"];

const RESOURCES_DIR: &str = "src/main/resources";

/// A file found under the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Relative to the project root, `/` separated
    pub relative: String,
}

impl SourceFile {
    fn new(root: &Path, path: PathBuf) -> Self {
        let relative = relative_path(root, &path);
        Self { path, relative }
    }
}

pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_pruned(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name.as_ref())
}

/// Walks a project and lists the files each [`FileKind`] reads
#[derive(Debug, Clone, Default)]
pub struct SourceDiscovery;

impl SourceDiscovery {
    pub fn new() -> Self {
        Self
    }

    /// Java sources under the conventional roots, each listed once
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn java_sources(&self, root: &Path) -> Vec<SourceFile> {
        let mut candidates: Vec<PathBuf> = SOURCE_DIRS
            .iter()
            .map(|dir| root.join(dir))
            .filter(|dir| dir.is_dir())
            .collect();
        candidates.push(root.to_path_buf());

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        let mut duplicates = 0usize;

        for dir in candidates {
            let walker = WalkDir::new(&dir)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !is_pruned(e));

            for entry in walker.filter_map(Result::ok) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("java") {
                    continue;
                }
                let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
                if !seen.insert(key) {
                    duplicates += 1;
                    continue;
                }
                trace!(file = %path.display(), "Found Java source");
                files.push(SourceFile::new(root, path.to_path_buf()));
            }
        }

        debug!(
            file_count = files.len(),
            duplicates, "Java source discovery completed"
        );
        files
    }

    /// Relative paths a file kind reads. Manifest kinds name fixed locations
    /// that may not exist yet.
    pub fn paths_for(&self, root: &Path, kind: FileKind) -> Vec<String> {
        match kind {
            FileKind::JavaSource => self
                .java_sources(root)
                .into_iter()
                .map(|f| f.relative)
                .collect(),
            FileKind::MavenManifest => vec!["pom.xml".to_string()],
            FileKind::GradleScript => {
                if root.join("build.gradle.kts").is_file() && !root.join("build.gradle").is_file() {
                    vec!["build.gradle.kts".to_string()]
                } else {
                    vec!["build.gradle".to_string()]
                }
            }
            FileKind::Properties => self.properties_files(root),
        }
    }

    fn properties_files(&self, root: &Path) -> Vec<String> {
        let dir = root.join(RESOURCES_DIR);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .filter(|name| name.starts_with("application") && name.ends_with(".properties"))
            .map(|name| format!("{}/{}", RESOURCES_DIR, name))
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_overlapping_roots_list_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let java = dir.path().join("src/main/java/com/acme");
        fs::create_dir_all(&java).unwrap();
        fs::write(java.join("App.java"), "class App {}").unwrap();

        let files = SourceDiscovery::new().java_sources(dir.path());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative, "src/main/java/com/acme/App.java");
    }

    #[test]
    fn test_build_and_hidden_dirs_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["target/classes", ".git/objects", "build/gen", "lib"] {
            let path = dir.path().join(sub);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join("X.java"), "class X {}").unwrap();
        }

        let files = SourceDiscovery::new().java_sources(dir.path());
        let relative: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(relative, vec!["lib/X.java"]);
    }

    #[test]
    fn test_properties_files_are_found() {
        let dir = tempfile::tempdir().unwrap();
        let res = dir.path().join(RESOURCES_DIR);
        fs::create_dir_all(&res).unwrap();
        fs::write(res.join("application.properties"), "a=b").unwrap();
        fs::write(res.join("application-dev.properties"), "a=c").unwrap();
        fs::write(res.join("logback.xml"), "<x/>").unwrap();

        let paths = SourceDiscovery::new().paths_for(dir.path(), FileKind::Properties);
        assert_eq!(
            paths,
            vec![
                "src/main/resources/application-dev.properties",
                "src/main/resources/application.properties",
            ]
        );
    }
}
