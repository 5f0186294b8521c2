//! Word tokenization and Penn Treebank tagging backed by nlprule.
//!
//! nlprule ships LanguageTool's English dictionary and disambiguation rules
//! as a binary (`en_tokenizer.bin`). Its tags are Penn tags, some with a
//! countability suffix (`NN:UN`) that is dropped here.

use std::path::Path;

use anyhow::{Context, Result};
use nlprule::Tokenizer;

use crate::error::ServiceError;
use crate::text::{PosTagger, TaggedToken, WordTokenizer};

/// A token's surface text and every tag nlprule left on it.
type Analysis = (String, Vec<String>);

pub struct NlpruleTagger {
    tokenizer: Tokenizer,
}

impl NlpruleTagger {
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let tokenizer = Tokenizer::new(path)
            .with_context(|| format!("loading nlprule tokenizer from {}", path.display()))?;
        Ok(Self::new(tokenizer))
    }

    fn analyze(&self, text: &str) -> Vec<Analysis> {
        self.tokenizer
            .pipe(text)
            .flat_map(|sentence| {
                sentence
                    .tokens()
                    .iter()
                    .map(|token| {
                        let word = token.word();
                        let tags = word
                            .tags()
                            .iter()
                            .map(|data| data.pos().as_str().to_string())
                            .collect();
                        (word.text().as_str().to_string(), tags)
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|(text, _)| !text.trim().is_empty())
            .collect()
    }
}

impl WordTokenizer for NlpruleTagger {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, ServiceError> {
        Ok(self
            .analyze(sentence)
            .into_iter()
            .map(|(text, _)| text)
            .collect())
    }
}

impl PosTagger for NlpruleTagger {
    /// Re-analyzes the space-joined words so disambiguation sees the context.
    fn tag(&self, words: &[String]) -> Result<Vec<TaggedToken>, ServiceError> {
        align(words, &self.analyze(&words.join(" ")))
    }
}

/// Map analyzed tokens back onto `words`. A word may span several tokens
/// and takes the first one's tag.
fn align(words: &[String], tokens: &[Analysis]) -> Result<Vec<TaggedToken>, ServiceError> {
    let mut tokens = tokens.iter();
    let mut tagged = Vec::with_capacity(words.len());
    for word in words {
        let mut covered = String::new();
        let mut tag = None;
        while covered.len() < word.len() {
            let Some((text, tags)) = tokens.next() else {
                return Err(ServiceError::Tagging(format!("no tokens left for {word:?}")));
            };
            covered.push_str(text);
            tag.get_or_insert_with(|| penn_tag(text, tags));
        }
        if covered != *word {
            return Err(ServiceError::Tagging(format!(
                "token boundaries differ at {word:?} (analyzed {covered:?})"
            )));
        }
        let tag = tag.unwrap_or_else(|| untagged(word));
        tagged.push(TaggedToken::new(word.as_str(), tag));
    }
    if let Some((text, _)) = tokens.next() {
        return Err(ServiceError::Tagging(format!("unexpected trailing token {text:?}")));
    }
    Ok(tagged)
}

fn penn_tag(text: &str, tags: &[String]) -> String {
    tags.iter()
        .map(|tag| tag.split_once(':').map_or(tag.as_str(), |(head, _)| head))
        .find(|tag| !tag.is_empty() && !tag.starts_with("SENT_"))
        .map(str::to_string)
        .unwrap_or_else(|| untagged(text))
}

/// Tag for a token outside the dictionary.
fn untagged(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_uppercase() => "NNP".to_string(),
        Some(c) if c.is_alphanumeric() => "NN".to_string(),
        // Punctuation is its own tag.
        _ if !text.chars().any(char::is_alphanumeric) => text.to_string(),
        _ => "NN".to_string(),
    }
}
