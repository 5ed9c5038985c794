use rust_stemmers::{Algorithm, Stemmer as Snowball};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Languages an engine can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Romanian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Romanian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Romanian => "romanian",
        }
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            Language::English => Algorithm::English,
            Language::Romanian => Algorithm::Romanian,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "romanian" | "ro" => Ok(Language::Romanian),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// Reduces a lowercase word to its stem. Must be deterministic and pure.
pub trait Stemmer: Send + Sync {
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str>;
}

/// Snowball stemmer for one [`Language`].
pub struct SnowballStemmer {
    language: Language,
    inner: Snowball,
}

impl SnowballStemmer {
    pub fn new(language: Language) -> Self {
        Self { language, inner: Snowball::create(language.algorithm()) }
    }

    pub fn language(&self) -> Language { self.language }
}

impl Stemmer for SnowballStemmer {
    fn stem<'a>(&self, word: &'a str) -> Cow<'a, str> { self.inner.stem(word) }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer").field("language", &self.language).finish()
    }
}
