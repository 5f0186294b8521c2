//! Noun-phrase chunking over tagged sentences.
//!
//! The grammar is three ordered rules. Each rule makes its own left-to-right
//! pass over the tokens not yet claimed by an earlier rule, taking the longest
//! match at the leftmost possible position; a match never spans a token
//! already inside a chunk. Tags are compared exactly (`NN` does not match
//! `NNS`).

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ServiceError;
use crate::text::{PosTagger, TaggedToken, WordTokenizer};
use crate::toolkit::Toolkit;

/// Sentences with fewer tokens never produce a question.
pub const MIN_SENTENCE_TOKENS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkRule {
    /// `<NN>+<IN|DT>*<NN>+`
    NounLink,
    /// `<NN>+<IN|DT>*<NNP>+`
    NounToProper,
    /// `<NNP>+<NNS>*`
    ProperNouns,
}

impl ChunkRule {
    pub const ORDERED: [ChunkRule; 3] = [
        ChunkRule::NounLink,
        ChunkRule::NounToProper,
        ChunkRule::ProperNouns,
    ];

    /// Length of the longest match anchored at the start of `tags`.
    pub fn match_at(self, tags: &[&str]) -> Option<usize> {
        match self {
            ChunkRule::NounLink => {
                let head = run(tags, |t| t == "NN");
                if head == 0 {
                    return None;
                }
                let link = run(&tags[head..], is_link);
                let tail = run(&tags[head + link..], |t| t == "NN");
                if link > 0 && tail > 0 {
                    Some(head + link + tail)
                } else if head >= 2 {
                    // The noun run splits into head and tail by itself.
                    Some(head)
                } else {
                    None
                }
            }
            ChunkRule::NounToProper => {
                let head = run(tags, |t| t == "NN");
                if head == 0 {
                    return None;
                }
                let link = run(&tags[head..], is_link);
                let tail = run(&tags[head + link..], |t| t == "NNP");
                (tail > 0).then_some(head + link + tail)
            }
            ChunkRule::ProperNouns => {
                let head = run(tags, |t| t == "NNP");
                if head == 0 {
                    return None;
                }
                Some(head + run(&tags[head..], |t| t == "NNS"))
            }
        }
    }
}

fn run(tags: &[&str], accept: impl Fn(&str) -> bool) -> usize {
    tags.iter().take_while(|t| accept(t)).count()
}

fn is_link(tag: &str) -> bool {
    tag == "IN" || tag == "DT"
}

/// A half-open token span `[start, end)` claimed by `rule`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub rule: ChunkRule,
    pub start: usize,
    pub end: usize,
}

/// All chunks in `tokens`, ordered by position.
pub fn chunk(tokens: &[TaggedToken]) -> Vec<Chunk> {
    let tags: Vec<&str> = tokens.iter().map(|t| t.tag.as_str()).collect();
    let mut claimed = vec![false; tags.len()];
    let mut chunks = Vec::new();

    for rule in ChunkRule::ORDERED {
        let mut i = 0;
        while i < tags.len() {
            if claimed[i] {
                i += 1;
                continue;
            }
            let free_end = claimed[i..]
                .iter()
                .position(|c| *c)
                .map_or(tags.len(), |p| i + p);
            match rule.match_at(&tags[i..free_end]) {
                Some(len) => {
                    claimed[i..i + len].iter_mut().for_each(|c| *c = true);
                    chunks.push(Chunk {
                        rule,
                        start: i,
                        end: i + len,
                    });
                    i += len;
                }
                None => i += 1,
            }
        }
    }

    chunks.sort_by_key(|c| c.start);
    chunks
}

/// Chunk texts (words joined by a single space), in sentence order.
pub fn chunk_phrases(tokens: &[TaggedToken]) -> Vec<String> {
    chunk(tokens)
        .into_iter()
        .map(|c| {
            tokens[c.start..c.end]
                .iter()
                .map(|t| t.word.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

/// A tagged sentence together with its candidate phrases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaggedSentence {
    pub tokens: Vec<TaggedToken>,
    pub phrases: Vec<String>,
}

/// Tokenizes, tags and chunks single sentences.
#[derive(Clone)]
pub struct PhraseTagger {
    tokenizer: Arc<dyn WordTokenizer>,
    tagger: Arc<dyn PosTagger>,
}

impl PhraseTagger {
    pub fn new(toolkit: &Toolkit) -> Self {
        Self {
            tokenizer: Arc::clone(&toolkit.tokenizer),
            tagger: Arc::clone(&toolkit.tagger),
        }
    }

    pub fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>, ServiceError> {
        let words = self.tokenizer.tokenize(sentence)?;
        let tagged = self.tagger.tag(&words)?;
        if tagged.len() != words.len() {
            return Err(ServiceError::Tagging(format!(
                "tagger returned {} tags for {} tokens",
                tagged.len(),
                words.len()
            )));
        }
        Ok(tagged)
    }

    /// Tag and chunk without applying any rejection rule.
    pub fn analyze(&self, sentence: &str) -> Result<TaggedSentence, ServiceError> {
        let tokens = self.tag(sentence)?;
        let phrases = chunk_phrases(&tokens);
        Ok(TaggedSentence { tokens, phrases })
    }

    /// `None` when the sentence is too short, opens with an adverb, or could
    /// not be tagged.
    pub fn tag_and_chunk(&self, sentence: &str) -> Option<TaggedSentence> {
        let tokens = match self.tag(sentence) {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(error = %err, %sentence, "skipping sentence");
                return None;
            }
        };
        if tokens.len() < MIN_SENTENCE_TOKENS || tokens[0].tag == "RB" {
            debug!(tokens = tokens.len(), %sentence, "sentence rejected");
            return None;
        }
        let phrases = chunk_phrases(&tokens);
        Some(TaggedSentence { tokens, phrases })
    }
}
