pub mod analysis;
pub mod builder;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod index;
pub mod query;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;

pub use builder::{BuildControl, BuildReport, Indexer, ProgressFn, SkippedDocument};
pub use document::{discover, Document, DocumentKind};
pub use engine::{BuildTicket, Engine};
pub use error::{ExtractError, IndexError};
pub use extract::{FileExtractor, TextExtractor};
pub use index::{DocId, DocumentSet, InvertedIndex, PostingList};
pub use query::{SearchHit, TermCount};
pub use stemmer::{Language, SnowballStemmer, Stemmer};
pub use stopwords::StopWordSet;
