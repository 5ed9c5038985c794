use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extractor dispatch key, derived from the file extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PlainText,
    Pdf,
    /// Legacy word-processor document.
    Doc,
    /// OOXML word-processor document.
    Docx,
    /// Anything else; carries the extension (possibly empty).
    Unsupported(String),
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "txt" => DocumentKind::PlainText,
            "pdf" => DocumentKind::Pdf,
            "doc" => DocumentKind::Doc,
            "docx" => DocumentKind::Docx,
            other => DocumentKind::Unsupported(other.to_owned()),
        }
    }

    pub fn from_path(path: &Path) -> Self {
        Self::from_extension(path.extension().and_then(|s| s.to_str()).unwrap_or(""))
    }
}

/// One input of a build: its key (the file name), type and location.
#[derive(Debug, Clone)]
pub struct Document {
    pub key: String,
    pub kind: DocumentKind,
    pub path: PathBuf,
}

impl Document {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let key = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Document { key, kind: DocumentKind::from_path(&path), path }
    }
}

/// Regular files directly inside `dir`, ordered by file name.
pub fn discover(dir: &Path) -> Result<Vec<Document>, IndexError> {
    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| IndexError::Documents {
            path: dir.to_path_buf(),
            source: e.into(),
        })?;
        if entry.file_type().is_file() {
            docs.push(Document::from_path(entry.path()));
        }
    }
    Ok(docs)
}
