use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole build.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot read stop words from {path}: {source}")]
    StopWords {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot list documents in {path}: {source}")]
    Documents {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("a build is already running on this engine")]
    BuildInProgress,
}

/// Failures confined to a single document; the build skips it and goes on.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document type: {0}")]
    Unsupported(String),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("docx container error: {0}")]
    Docx(#[from] zip::result::ZipError),
    #[error("docx xml error: {0}")]
    Xml(#[from] quick_xml::Error),
}
