use crate::builder::{BuildControl, BuildReport, Indexer, ProgressFn};
use crate::document::{discover, Document};
use crate::error::IndexError;
use crate::extract::{FileExtractor, TextExtractor};
use crate::query::SearchHit;
use crate::stemmer::Language;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Thread-safe handle over one language's index.
///
/// Builds run one at a time and assemble a fresh [`Indexer`] off to the side;
/// the served generation is emptied when a build starts and replaced when it
/// ends, so queries never see a half-built index. A query issued while a
/// build is running sees the empty generation.
pub struct Engine {
    language: Language,
    extractor: Arc<dyn TextExtractor>,
    current: RwLock<Arc<Indexer>>,
    control: BuildControl,
    claimed: AtomicBool,
    running: AtomicBool,
}

impl Engine {
    pub fn new(language: Language) -> Self { Self::with_extractor(language, Arc::new(FileExtractor)) }

    pub fn with_extractor(language: Language, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            language,
            extractor,
            current: RwLock::new(Arc::new(Indexer::new(language))),
            control: BuildControl::new(),
            claimed: AtomicBool::new(false),
            running: AtomicBool::new(false),
        }
    }

    pub fn language(&self) -> Language { self.language }

    pub fn build(&self, docs: &[Document], stop_words: &Path) -> Result<BuildReport, IndexError> {
        let _claim = Claim::take(self)?;
        self.run(docs, stop_words)
    }

    /// Build from every file directly inside `dir`.
    pub fn build_dir(&self, dir: &Path, stop_words: &Path) -> Result<BuildReport, IndexError> {
        let _claim = Claim::take(self)?;
        self.run_dir(dir, stop_words)
    }

    /// Take the right to run the next build now and run it later, possibly
    /// on another thread. From here until the ticket is used or dropped the
    /// engine reports itself as building and honors cancel requests.
    pub fn reserve(self: &Arc<Self>) -> Result<BuildTicket, IndexError> {
        self.claim()?;
        Ok(BuildTicket { engine: Arc::clone(self) })
    }

    fn claim(&self) -> Result<(), IndexError> {
        self.claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| IndexError::BuildInProgress)?;
        self.control.reset();
        self.clear();
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.claimed.store(false, Ordering::SeqCst);
    }

    fn run_dir(&self, dir: &Path, stop_words: &Path) -> Result<BuildReport, IndexError> {
        let docs = discover(dir)?;
        self.run(&docs, stop_words)
    }

    fn run(&self, docs: &[Document], stop_words: &Path) -> Result<BuildReport, IndexError> {
        let mut next = Indexer::new(self.language);
        let report = next.build(docs, stop_words, self.extractor.as_ref(), &self.control)?;
        *self.current.write() = Arc::new(next);
        Ok(report)
    }

    fn clear(&self) { *self.current.write() = Arc::new(Indexer::new(self.language)); }

    /// The generation currently served to queries.
    pub fn snapshot(&self) -> Arc<Indexer> { self.current.read().clone() }

    pub fn search(&self, query: &str) -> Vec<SearchHit> { self.snapshot().search(query) }

    pub fn search_keys(&self, query: &str) -> Vec<String> { self.snapshot().search_keys(query) }

    pub fn request_cancel(&self) { self.control.request_cancel(); }

    pub fn currently_processing(&self) -> Option<String> { self.control.currently_processing() }

    pub fn on_progress(&self, f: ProgressFn) { self.control.set_observer(f); }

    pub fn is_building(&self) -> bool { self.running.load(Ordering::SeqCst) }
}

struct Claim<'a>(&'a Engine);

impl<'a> Claim<'a> {
    fn take(engine: &'a Engine) -> Result<Self, IndexError> {
        engine.claim()?;
        Ok(Claim(engine))
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) { self.0.release(); }
}

/// A claimed build of one [`Engine`]. Dropping it unused releases the claim.
pub struct BuildTicket {
    engine: Arc<Engine>,
}

impl BuildTicket {
    pub fn language(&self) -> Language { self.engine.language }

    pub fn build(self, docs: &[Document], stop_words: &Path) -> Result<BuildReport, IndexError> {
        self.engine.run(docs, stop_words)
    }

    pub fn build_dir(self, dir: &Path, stop_words: &Path) -> Result<BuildReport, IndexError> {
        self.engine.run_dir(dir, stop_words)
    }
}

impl Drop for BuildTicket {
    fn drop(&mut self) { self.engine.release(); }
}
