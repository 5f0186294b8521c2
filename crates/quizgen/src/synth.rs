//! Turning one tagged sentence into a fill-in-the-blank question.

use std::fmt;
use std::str::FromStr;

use regex::{NoExpand, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use crate::chunker::TaggedSentence;
use crate::lexicon::DistractorFinder;
use crate::text::TaggedToken;

/// Replaces each blanked word.
pub const BLANK: &str = "__________";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    /// The sentence with the answer replaced by one [`BLANK`] per word.
    pub question: String,
    pub answer: String,
    /// Character count of the shortest blanked word.
    pub key: usize,
    /// Distractors; only filled for single-word answers.
    pub similar: Vec<String>,
}

/// How many tokens are tried against the candidate phrases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PhraseScan {
    /// Only the first token. A phrase is blanked only when the sentence's
    /// first word occurs in it.
    #[default]
    FirstToken,
    /// Every token in order, stopping at the first one inside a phrase.
    EveryToken,
}

impl FromStr for PhraseScan {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "first-token" | "first" => Ok(PhraseScan::FirstToken),
            "every-token" | "every" => Ok(PhraseScan::EveryToken),
            other => Err(format!("unknown phrase scan mode: {other}")),
        }
    }
}

impl fmt::Display for PhraseScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PhraseScan::FirstToken => "first-token",
            PhraseScan::EveryToken => "every-token",
        })
    }
}

#[derive(Clone)]
pub struct QuestionSynthesizer {
    distractors: DistractorFinder,
    scan: PhraseScan,
}

impl QuestionSynthesizer {
    pub fn new(distractors: DistractorFinder, scan: PhraseScan) -> Self {
        Self { distractors, scan }
    }

    pub fn synthesize(&self, tagged: &TaggedSentence, sentence: &str) -> Option<QuestionRecord> {
        let words = select_words(&tagged.tokens, &tagged.phrases, self.scan);
        let key = words.iter().map(|w| w.chars().count()).min()?;
        let answer = words.join(" ");

        let Some(question) = blank_out(sentence, &answer, words.len()) else {
            debug!(%answer, %sentence, "answer not found verbatim in sentence");
            return None;
        };

        let similar = match words.as_slice() {
            [word] => self.distractors.find_distractors(word),
            _ => Vec::new(),
        };

        Some(QuestionRecord {
            question,
            answer,
            key,
            similar,
        })
    }
}

/// Words to blank: the last two words of the first phrase containing a
/// scanned token, else the first token alone.
fn select_words(tokens: &[TaggedToken], phrases: &[String], scan: PhraseScan) -> Vec<String> {
    let limit = match scan {
        PhraseScan::FirstToken => 1,
        PhraseScan::EveryToken => tokens.len(),
    };
    for token in tokens.iter().take(limit) {
        if let Some(words) = phrase_containing(&token.word, phrases) {
            return words;
        }
    }
    tokens
        .first()
        .map(|t| vec![t.word.clone()])
        .unwrap_or_default()
}

fn phrase_containing(word: &str, phrases: &[String]) -> Option<Vec<String>> {
    for phrase in phrases {
        // Quote-led phrases end the scan.
        if phrase.starts_with('\'') {
            break;
        }
        // Substring test, not a word-boundary test.
        if phrase.contains(word) {
            let parts: Vec<&str> = phrase.split_whitespace().collect();
            let tail = &parts[parts.len().saturating_sub(2)..];
            return Some(tail.iter().map(|w| w.to_string()).collect());
        }
    }
    None
}

/// Case-insensitively replace the first occurrence of `phrase`.
fn blank_out(sentence: &str, phrase: &str, words: usize) -> Option<String> {
    let pattern = RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
        .ok()?;
    if !pattern.is_match(sentence) {
        return None;
    }
    let marker = BLANK.repeat(words);
    Some(pattern.replacen(sentence, 1, NoExpand(&marker)).into_owned())
}
