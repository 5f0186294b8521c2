#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use quizgen::{
    LexicalDatabase, PosTagger, PunktSegmenter, ServiceError, TaggedToken, Toolkit, WordTokenizer,
};
use wordnet_types::SynsetId;

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("wordnet-db")
        .join("tests")
        .join("fixtures")
        .join("wn")
}

/// Whitespace split with trailing punctuation as separate tokens.
pub struct SplitTokenizer;

impl WordTokenizer for SplitTokenizer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, ServiceError> {
        let mut words = Vec::new();
        for raw in sentence.split_whitespace() {
            let word = raw.trim_end_matches(['.', ',', '!', '?']);
            if !word.is_empty() {
                words.push(word.to_string());
            }
            words.extend(raw[word.len()..].chars().map(String::from));
        }
        Ok(words)
    }
}

/// Looks tags up in a table; unknown words are `NN`.
pub struct TableTagger(pub HashMap<&'static str, &'static str>);

impl PosTagger for TableTagger {
    fn tag(&self, words: &[String]) -> Result<Vec<TaggedToken>, ServiceError> {
        Ok(words
            .iter()
            .map(|w| TaggedToken::new(w.as_str(), *self.0.get(w.as_str()).unwrap_or(&"NN")))
            .collect())
    }
}

/// Penn tags for the closed-class and non-noun words the test corpora use.
pub fn english_tags() -> TableTagger {
    TableTagger(HashMap::from([
        ("The", "DT"),
        ("the", "DT"),
        ("a", "DT"),
        ("is", "VBZ"),
        ("runs", "VBZ"),
        ("works", "VBZ"),
        ("jumps", "VBZ"),
        ("compiles", "VBZ"),
        ("guarantees", "VBZ"),
        ("without", "IN"),
        ("for", "IN"),
        ("on", "IN"),
        ("of", "IN"),
        ("over", "IN"),
        ("than", "IN"),
        ("with", "IN"),
        ("and", "CC"),
        ("it", "PRP"),
        ("reports", "VBZ"),
        ("errors", "NNS"),
        ("explanations", "NNS"),
        ("developers", "NNS"),
        ("helpful", "JJ"),
        ("detailed", "JJ"),
        ("confused", "JJ"),
        ("first", "JJ"),
        ("always", "RB"),
        ("quick", "JJ"),
        ("brown", "JJ"),
        ("lazy", "JJ"),
        ("popular", "JJ"),
        ("virtual", "JJ"),
        ("key", "JJ"),
        ("slower", "JJR"),
        ("Usually", "RB"),
        ("ahead", "RB"),
        ("Python", "NNP"),
        ("Rust's", "NNP"),
        (".", "."),
        (",", ","),
    ]))
}

/// Punkt segmentation over the table tagger.
pub fn toolkit(lexicon: Arc<dyn LexicalDatabase>) -> Toolkit {
    Toolkit::new(
        Arc::new(PunktSegmenter::english()),
        Arc::new(SplitTokenizer),
        Arc::new(english_tags()),
        lexicon,
    )
}

/// A lexicon without entries.
pub struct EmptyLexicon;

impl LexicalDatabase for EmptyLexicon {
    fn noun_senses(&self, _word: &str) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(Vec::new())
    }
    fn hypernyms(&self, _sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(Vec::new())
    }
    fn hyponyms(&self, _sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(Vec::new())
    }
    fn lemma_names(&self, _sense: SynsetId) -> Result<Vec<String>, ServiceError> {
        Ok(Vec::new())
    }
}
