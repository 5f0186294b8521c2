//! Sentence segmentation with the Punkt algorithm.
//!
//! Uses the English parameters NLTK ships (abbreviations, collocations and
//! sentence starters), so "Dr. Smith" or "e.g. this" do not end a sentence.

use punkt::params::Standard;
use punkt::{SentenceTokenizer, TrainingData};

use crate::error::ServiceError;
use crate::text::SentenceSegmenter;

pub struct PunktSegmenter {
    data: TrainingData,
}

impl PunktSegmenter {
    pub fn new(data: TrainingData) -> Self {
        Self { data }
    }

    /// Segmenter with the bundled English training data.
    pub fn english() -> Self {
        Self::new(TrainingData::english())
    }
}

impl SentenceSegmenter for PunktSegmenter {
    fn segment(&self, text: &str) -> Result<Vec<String>, ServiceError> {
        Ok(SentenceTokenizer::<Standard>::new(text, &self.data)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = PunktSegmenter::english()
            .segment("Rust has traits. Go has interfaces. Python has protocols.")
            .unwrap();
        assert_eq!(
            sentences,
            vec!["Rust has traits.", "Go has interfaces.", "Python has protocols."]
        );
    }

    #[test]
    fn known_abbreviations_do_not_split() {
        let sentences = PunktSegmenter::english()
            .segment("Dr. Hoare invented the null reference. He regrets it.")
            .unwrap();
        assert_eq!(
            sentences,
            vec!["Dr. Hoare invented the null reference.", "He regrets it."]
        );
    }

    #[test]
    fn blank_text_has_no_sentences() {
        let seg = PunktSegmenter::english();
        assert!(seg.segment("").unwrap().is_empty());
        assert!(seg.segment("  \n\t ").unwrap().is_empty());
    }
}
