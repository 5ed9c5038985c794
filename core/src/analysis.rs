//! The normalization pipeline shared by indexing and querying:
//! tokenize → drop length-1 → lowercase → stop-word filter → stem.

use crate::stemmer::{Language, SnowballStemmer, Stemmer};
use crate::stopwords::StopWordSet;
use crate::tokenizer::tokenize;

pub struct Analyzer {
    stop_words: StopWordSet,
    stemmer: Box<dyn Stemmer>,
}

impl Analyzer {
    pub fn new(language: Language) -> Self {
        Self::with_stemmer(Box::new(SnowballStemmer::new(language)))
    }

    pub fn with_stemmer(stemmer: Box<dyn Stemmer>) -> Self {
        Self { stop_words: StopWordSet::new(), stemmer }
    }

    pub fn stop_words(&self) -> &StopWordSet { &self.stop_words }

    /// Replaces the whole stop-word set.
    pub fn set_stop_words(&mut self, stop_words: StopWordSet) { self.stop_words = stop_words; }

    /// Terms of `text` in token order, repeats included.
    pub fn terms<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        tokenize(text)
            .filter(move |tok| !self.stop_words.contains(&tok.text))
            .map(move |tok| self.stemmer.stem(&tok.text).into_owned())
            .filter(|term| !term.is_empty())
    }

    /// Distinct terms of `text` in order of first appearance.
    pub fn unique_terms(&self, text: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for term in self.terms(text) {
            if !out.contains(&term) {
                out.push(term);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english(stop: &[&str]) -> Analyzer {
        let mut a = Analyzer::new(Language::English);
        a.set_stop_words(StopWordSet::from_words(stop));
        a
    }

    #[test]
    fn stop_words_are_filtered_before_stemming() {
        let a = english(&["by", "was"]);
        let terms: Vec<String> = a.terms("Myself WAS being auto-asphyxiated By thyself").collect();
        assert_eq!(terms, vec!["myself", "be", "auto", "asphyxi", "thyself"]);
    }

    #[test]
    fn unique_terms_keep_first_appearance() {
        let a = english(&[]);
        assert_eq!(a.unique_terms("blackmailers blackmail asphyxiations BLACKMAILED"), vec!["blackmail", "asphyxi"]);
    }

    #[test]
    fn nothing_survives_stop_words_and_noise() {
        let a = english(&["the"]);
        assert!(a.unique_terms("The a I x THE").is_empty());
        assert!(a.unique_terms("").is_empty());
    }
}
