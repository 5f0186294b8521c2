//! Lexical database access and distractor selection.
//!
//! Wrong answers for a single-word blank are the word's co-hyponyms: take the
//! first noun sense, climb to its direct hypernym, and list the other senses
//! directly below it.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;
use wordnet_types::{Pos, SynsetId};

use crate::error::ServiceError;

pub const DEFAULT_DISTRACTOR_LIMIT: usize = 8;

/// Read access to a WordNet-shaped hypernym/hyponym graph.
pub trait LexicalDatabase: Send + Sync {
    /// Noun senses of `word`, most common first.
    fn noun_senses(&self, word: &str) -> Result<Vec<SynsetId>, ServiceError>;
    /// Direct hypernyms, in database order.
    fn hypernyms(&self, sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError>;
    /// Direct hyponyms, in database order.
    fn hyponyms(&self, sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError>;
    /// Lemma names of a sense (underscores kept), in database order.
    fn lemma_names(&self, sense: SynsetId) -> Result<Vec<String>, ServiceError>;
}

/// [`LexicalDatabase`] over a loaded WordNet, with morphy for inflected input.
#[derive(Clone)]
pub struct WordNetLexicon {
    wordnet: Arc<WordNet>,
    morphy: Arc<Morphy>,
}

impl WordNetLexicon {
    pub fn new(wordnet: Arc<WordNet>, morphy: Arc<Morphy>) -> Self {
        Self { wordnet, morphy }
    }

    /// WordNet and its morphy exception lists from one dict directory.
    pub fn load(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let wordnet = WordNet::load_with_mode(dir, mode)
            .with_context(|| format!("loading wordnet from {}", dir.display()))?;
        let morphy = Morphy::load(dir)
            .with_context(|| format!("loading morphy exceptions from {}", dir.display()))?;
        Ok(Self::new(Arc::new(wordnet), Arc::new(morphy)))
    }
}

impl LexicalDatabase for WordNetLexicon {
    fn noun_senses(&self, word: &str) -> Result<Vec<SynsetId>, ServiceError> {
        let exists = |pos, lemma: &str| self.wordnet.lemma_exists(pos, lemma);
        let mut seen = HashSet::new();
        let senses = self
            .morphy
            .lemmas(Pos::Noun, word, exists)
            .iter()
            .flat_map(|lemma| self.wordnet.synsets_for_lemma(Pos::Noun, lemma))
            .filter(|id| seen.insert(*id))
            .collect();
        Ok(senses)
    }

    fn hypernyms(&self, sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(self.wordnet.hypernyms(sense))
    }

    fn hyponyms(&self, sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(self.wordnet.hyponyms(sense))
    }

    fn lemma_names(&self, sense: SynsetId) -> Result<Vec<String>, ServiceError> {
        let synset = self
            .wordnet
            .get_synset(sense)
            .ok_or_else(|| ServiceError::Lexicon(format!("unknown synset {sense}")))?;
        Ok(synset.words.iter().map(|w| w.name().to_string()).collect())
    }
}

/// Produces sibling words to serve as wrong answers.
#[derive(Clone)]
pub struct DistractorFinder {
    lexicon: Arc<dyn LexicalDatabase>,
    limit: usize,
}

impl DistractorFinder {
    pub fn new(lexicon: Arc<dyn LexicalDatabase>) -> Self {
        Self {
            lexicon,
            limit: DEFAULT_DISTRACTOR_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Up to `limit` co-hyponyms of `word`'s first noun sense, never `word`
    /// itself. Lookup failures are logged and yield an empty list.
    pub fn find_distractors(&self, word: &str) -> Vec<String> {
        match self.siblings(word) {
            Ok(found) => found,
            Err(err) => {
                warn!(%word, error = %err, "distractor lookup failed");
                Vec::new()
            }
        }
    }

    fn siblings(&self, word: &str) -> Result<Vec<String>, ServiceError> {
        let senses = self.lexicon.noun_senses(word)?;
        let Some(&sense) = senses.first() else {
            return Ok(Vec::new());
        };
        let parents = self.lexicon.hypernyms(sense)?;
        let Some(&parent) = parents.first() else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for hyponym in self.lexicon.hyponyms(parent)? {
            if found.len() >= self.limit {
                break;
            }
            let names = match self.lexicon.lemma_names(hyponym) {
                Ok(names) => names,
                Err(err) => {
                    warn!(%word, %hyponym, error = %err, "skipping sibling");
                    continue;
                }
            };
            let Some(name) = names.first() else {
                continue;
            };
            let name = name.replace('_', " ");
            if name != word {
                found.push(name);
            }
        }
        Ok(found)
    }
}

/// A lexicon without entries.
#[cfg(test)]
pub(crate) struct NoLexicon;

#[cfg(test)]
impl LexicalDatabase for NoLexicon {
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
