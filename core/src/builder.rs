use crate::analysis::Analyzer;
use crate::document::Document;
use crate::error::IndexError;
use crate::extract::TextExtractor;
use crate::index::{DocumentSet, InvertedIndex};
use crate::stemmer::Language;
use crate::stopwords::StopWordSet;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type ProgressFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Cancel switch and progress signal of a build, shared with observers on
/// other threads.
#[derive(Default)]
pub struct BuildControl {
    cancelled: AtomicBool,
    current: Mutex<Option<String>>,
    observer: RwLock<Option<ProgressFn>>,
}

impl BuildControl {
    pub fn new() -> Self { Self::default() }

    /// Called with each document key as its ingestion starts.
    pub fn set_observer(&self, f: ProgressFn) { *self.observer.write() = Some(f); }

    /// Idempotent. Honored before the next document starts.
    pub fn request_cancel(&self) { self.cancelled.store(true, Ordering::SeqCst); }

    pub fn is_cancelled(&self) -> bool { self.cancelled.load(Ordering::SeqCst) }

    pub fn currently_processing(&self) -> Option<String> { self.current.lock().clone() }

    /// Forget a pending cancel and the last processed document. Callers that
    /// reuse a control call this once they hold the right to build.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
        *self.current.lock() = None;
    }

    fn publish(&self, key: &str) {
        *self.current.lock() = Some(key.to_owned());
        let observer = self.observer.read().clone();
        if let Some(f) = observer {
            f(key);
        }
    }

    fn finish(&self) { *self.current.lock() = None; }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedDocument {
    pub key: String,
    pub reason: String,
}

/// Outcome of one build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub documents: usize,
    pub terms: usize,
    pub skipped: Vec<SkippedDocument>,
    pub cancelled: bool,
}

/// One generation of index state: stop words, postings and the ordered set
/// of ingested documents. Mutation takes `&mut self`, so a build and a query
/// on the same value can never overlap.
pub struct Indexer {
    language: Language,
    pub(crate) analyzer: Analyzer,
    pub(crate) index: InvertedIndex,
    pub(crate) documents: DocumentSet,
}

impl Indexer {
    pub fn new(language: Language) -> Self {
        Self::with_analyzer(language, Analyzer::new(language))
    }

    pub fn with_analyzer(language: Language, analyzer: Analyzer) -> Self {
        Self { language, analyzer, index: InvertedIndex::new(), documents: DocumentSet::new() }
    }

    pub fn language(&self) -> Language { self.language }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn documents(&self) -> &DocumentSet { &self.documents }

    pub fn stop_words(&self) -> &StopWordSet { self.analyzer.stop_words() }

    pub fn set_stop_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.analyzer.set_stop_words(StopWordSet::from_words(words));
    }

    pub fn load_stop_words(&mut self, path: &Path) -> Result<(), IndexError> {
        let set = StopWordSet::from_path(path)
            .map_err(|source| IndexError::StopWords { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), words = set.len(), "loaded stop words");
        self.analyzer.set_stop_words(set);
        Ok(())
    }

    /// Feed one chunk of `key`'s text through the pipeline. The document is
    /// registered on first use even when no term survives.
    pub fn index_text(&mut self, text: &str, key: &str) {
        let doc = self.documents.insert(key);
        for term in self.analyzer.terms(text) {
            self.index.add_occurrence(&term, doc);
        }
    }

    /// Drop postings, documents and stop words.
    pub fn reset(&mut self) {
        self.index.clear();
        self.documents.clear();
        self.analyzer.set_stop_words(StopWordSet::new());
    }

    /// Rebuild from scratch. Only an unreadable stop-word source fails the
    /// build; bad documents are skipped and reported. On cancellation the
    /// documents ingested so far stay indexed.
    ///
    /// A cancel already pending on `control` is honored before the first
    /// document; see [`BuildControl::reset`].
    pub fn build(
        &mut self,
        docs: &[Document],
        stop_words: &Path,
        extractor: &dyn TextExtractor,
        control: &BuildControl,
    ) -> Result<BuildReport, IndexError> {
        self.reset();
        self.load_stop_words(stop_words)?;

        info!(language = %self.language, documents = docs.len(), "index build started");
        let mut report = BuildReport::default();
        for doc in docs {
            if control.is_cancelled() {
                info!(next = %doc.key, "index build cancelled");
                report.cancelled = true;
                break;
            }
            control.publish(&doc.key);
            match extractor.extract(doc) {
                Ok(chunks) => {
                    self.documents.insert(&doc.key);
                    for chunk in &chunks {
                        self.index_text(chunk, &doc.key);
                    }
                    debug!(doc = %doc.key, chunks = chunks.len(), "indexed document");
                }
                Err(e) => {
                    warn!(doc = %doc.key, error = %e, "skipping document");
                    report.skipped.push(SkippedDocument { key: doc.key.clone(), reason: e.to_string() });
                }
            }
        }
        control.finish();

        report.documents = self.documents.len();
        report.terms = self.index.num_terms();
        info!(
            documents = report.documents,
            terms = report.terms,
            skipped = report.skipped.len(),
            cancelled = report.cancelled,
            "index build complete"
        );
        Ok(report)
    }
}
