//! Filesystem scan of the research-papers directory.
//!
//! Documents are read-through snapshots: every scan reads the directory fresh, so a
//! file added, edited, or removed between two searches is reflected in the second.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One text or markdown file under the research directory.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Absolute (or root-joined) path on disk.
    pub path: PathBuf,
    /// Path relative to the research directory, `/`-separated.
    pub source_path: String,
    /// First `# ` heading, else the file stem.
    pub title: String,
    #[serde(skip)]
    pub content: String,
    /// SHA-256 of the content, lowercase hex.
    pub content_hash: String,
    pub modified: DateTime<Utc>,
}

/// Recursively load every file under `root` whose extension is in `extensions`
/// (case-insensitive). Unreadable entries are skipped with a warning.
///
/// Returns documents sorted by `source_path`.
pub fn scan_corpus(root: &Path, extensions: &[String]) -> Result<Vec<Document>> {
    if !root.is_dir() {
        return Err(Error::DirectoryNotFound(root.to_path_buf()));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }

        match load_document(root, entry.path()) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable document");
            }
        }
    }

    // Sort for deterministic ordering
    documents.sort_by(|a, b| a.source_path.cmp(&b.source_path));

    tracing::debug!(root = %root.display(), documents = documents.len(), "corpus scanned");
    Ok(documents)
}

fn load_document(root: &Path, path: &Path) -> std::io::Result<Document> {
    let content = std::fs::read_to_string(path)?;
    let modified = std::fs::metadata(path)?
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_default();

    let relative = path.strip_prefix(root).unwrap_or(path);
    let source_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Ok(Document {
        path: path.to_path_buf(),
        source_path,
        title: derive_title(path, &content),
        content_hash: format!("{:x}", Sha256::digest(content.as_bytes())),
        content,
        modified,
    })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Text of the first level-one markdown heading, falling back to the file stem.
pub fn derive_title(path: &Path, content: &str) -> String {
    let heading = content
        .lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|h| !h.is_empty());

    match heading {
        Some(h) => h.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exts() -> Vec<String> {
        vec!["md".into(), "txt".into()]
    }

    #[test]
    fn title_from_heading_or_stem() {
        let path = Path::new("papers/momentum_factors.md");
        assert_eq!(
            derive_title(path, "intro\n# Time-Series Momentum \nbody"),
            "Time-Series Momentum"
        );
        assert_eq!(derive_title(path, "## Subheading only\nbody"), "momentum_factors");
        assert_eq!(derive_title(path, ""), "momentum_factors");
    }

    #[test]
    fn scan_is_recursive_and_filters_extensions() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("nested/deeper")).unwrap();
        std::fs::write(tmp.path().join("a.md"), "# A\nalpha").unwrap();
        std::fs::write(tmp.path().join("nested/deeper/b.TXT"), "beta").unwrap();
        std::fs::write(tmp.path().join("nested/c.pdf"), "not text").unwrap();
        std::fs::write(tmp.path().join("noext"), "gamma").unwrap();

        let docs = scan_corpus(tmp.path(), &exts()).unwrap();
        let paths: Vec<&str> = docs.iter().map(|d| d.source_path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "nested/deeper/b.TXT"]);
        assert_eq!(docs[0].title, "A");
        assert_eq!(docs[1].title, "b");
    }

    #[test]
    fn non_utf8_file_is_skipped() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("good.md"), "fine").unwrap();
        std::fs::write(tmp.path().join("bad.md"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();

        let docs = scan_corpus(tmp.path(), &exts()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source_path, "good.md");
    }

    #[test]
    fn content_hash_tracks_content() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("p.md");
        std::fs::write(&file, "version one").unwrap();
        let first = scan_corpus(tmp.path(), &exts()).unwrap()[0].content_hash.clone();

        std::fs::write(&file, "version two").unwrap();
        let second = scan_corpus(tmp.path(), &exts()).unwrap()[0].content_hash.clone();

        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
    }

    #[test]
    fn missing_root_is_directory_not_found() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            scan_corpus(&missing, &exts()),
            Err(Error::DirectoryNotFound(p)) if p == missing
        ));
    }
}
