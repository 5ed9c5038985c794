use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

lazy_static! {
    static ref LINE: Regex = Regex::new(r"^\s*([A-Za-z0-9_]+)").expect("valid regex");
}

/// Lowercased words excluded from indexing and querying.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn new() -> Self { Self::default() }

    /// Build from stop-word file lines. Only the first run of ASCII word
    /// characters after optional leading whitespace is taken from each line,
    /// so `dacă` is stored as `dac`, the same token the tokenizer produces.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = lines
            .into_iter()
            .filter_map(|line| {
                LINE.captures(line.as_ref())
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_lowercase())
            })
            .collect();
        Self { words }
    }

    /// Take every word as-is (lowercased), without line parsing.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
    }

    /// Lines are decoded lossily; a file in a legacy 8-bit encoding still
    /// yields its ASCII words.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut lines = Vec::new();
        for line in reader.split(b'\n') {
            let line = line?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);
            lines.push(String::from_utf8_lossy(line).into_owned());
        }
        Ok(Self::from_lines(lines))
    }

    pub fn from_path(path: &Path) -> io::Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// `word` must already be lowercase.
    pub fn contains(&self, word: &str) -> bool { self.words.contains(word) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}
