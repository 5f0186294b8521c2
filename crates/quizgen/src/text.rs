//! Interfaces to the text-processing services the generator depends on.
//!
//! Segmentation, tokenization and tagging are black boxes to the pipeline:
//! anything implementing these traits can be plugged into a
//! [`Toolkit`](crate::toolkit::Toolkit). The production implementations are
//! [`PunktSegmenter`](crate::segment::PunktSegmenter) and
//! [`NlpruleTagger`](crate::tagger::NlpruleTagger).

use serde::Serialize;

use crate::error::ServiceError;

/// A word and its Penn Treebank part-of-speech tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaggedToken {
    pub word: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }
}

/// Splits running text into sentences.
pub trait SentenceSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Result<Vec<String>, ServiceError>;
}

/// Splits one sentence into word tokens.
pub trait WordTokenizer: Send + Sync {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, ServiceError>;
}

/// Assigns a tag to every token, preserving order and length.
pub trait PosTagger: Send + Sync {
    fn tag(&self, words: &[String]) -> Result<Vec<TaggedToken>, ServiceError>;
}

/// Splits on whitespace and peels trailing `.`, `,`, `;`, `:`, `!` and `?`.
#[cfg(test)]
pub(crate) struct SplitTokenizer;

#[cfg(test)]
impl WordTokenizer for SplitTokenizer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, ServiceError> {
        let mut words = Vec::new();
        for raw in sentence.split_whitespace() {
            let word = raw.trim_end_matches(['.', ',', ';', ':', '!', '?']);
            if !word.is_empty() {
                words.push(word.to_string());
            }
            words.extend(raw[word.len()..].chars().map(String::from));
        }
        Ok(words)
    }
}

/// Tags from a fixed word table; anything else gets `fallback`.
#[cfg(test)]
pub(crate) struct TableTagger {
    table: std::collections::HashMap<String, String>,
    fallback: &'static str,
}

#[cfg(test)]
impl TableTagger {
    pub(crate) fn new(fallback: &'static str, pairs: &[(&str, &str)]) -> Self {
        Self {
            table: pairs
                .iter()
                .map(|(w, t)| (w.to_string(), t.to_string()))
                .collect(),
            fallback,
        }
    }
}

#[cfg(test)]
impl PosTagger for TableTagger {
    fn tag(&self, words: &[String]) -> Result<Vec<TaggedToken>, ServiceError> {
        Ok(words
            .iter()
            .map(|w| {
                let tag = self.table.get(w).map_or(self.fallback, String::as_str);
                TaggedToken::new(w.as_str(), tag)
            })
            .collect())
    }
}
