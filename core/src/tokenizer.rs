use lazy_static::lazy_static;
use regex::{Matches, Regex};

lazy_static! {
    static ref RE: Regex = Regex::new(r"[A-Za-z']+").expect("valid regex");
}

/// A word candidate: byte span into the source text plus the lowercased word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Lazy iterator over the tokens of one text. Call [`tokenize`] again to restart.
pub struct Tokens<'t> {
    matches: Matches<'static, 't>,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        for mat in self.matches.by_ref() {
            // single letters are noise, not words
            if mat.end() - mat.start() < 2 {
                continue;
            }
            return Some(Token {
                start: mat.start(),
                end: mat.end(),
                text: mat.as_str().to_ascii_lowercase(),
            });
        }
        None
    }
}

/// Split text into maximal runs of ASCII letters and apostrophes, dropping
/// runs of length one and lowercasing the rest.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { matches: RE.find_iter(text) }
}
