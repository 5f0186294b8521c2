//! Open-ended ("subjective") questions built from recurring noun phrases.
//!
//! Every chunk phrase in the corpus becomes an upper-cased keyword. A keyword
//! is only admitted when first seen in a long sentence; each later sentence
//! mentioning it is appended to its model answer.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use rand::Rng;
use tracing::{debug, warn};

use crate::assemble::draw_distinct;
use crate::chunker::PhraseTagger;
use crate::error::QuizError;
use crate::pipeline::{GeneratorConfig, load_corpus};
use crate::text::SentenceSegmenter;
use crate::toolkit::Toolkit;

pub const QUESTION_PATTERNS: [&str; 4] = [
    "Explain in detail ",
    "Define ",
    "Write a short note on ",
    "What do you mean by ",
];

/// A keyword's first sentence must have more tokens than this.
pub const MIN_ANSWER_TOKENS: usize = 20;

pub const DEFAULT_SUBJECTIVE_QUESTIONS: usize = 2;

/// Candidate questions drawn before the final sample.
const CANDIDATE_DRAWS: usize = 3;

pub struct SubjectiveTest {
    corpus: Arc<str>,
    segmenter: Arc<dyn SentenceSegmenter>,
    tagger: PhraseTagger,
    max_draws: usize,
    keywords: OnceLock<Vec<(String, String)>>,
}

impl SubjectiveTest {
    pub fn new(corpus: impl Into<Arc<str>>, toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        Self {
            corpus: corpus.into(),
            segmenter: Arc::clone(&toolkit.segmenter),
            tagger: PhraseTagger::new(toolkit),
            max_draws: config.max_draws,
            keywords: OnceLock::new(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>, toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        Self::new(load_corpus(path), toolkit, config)
    }

    /// `(KEYWORD, answer)` pairs in order of first admission.
    pub fn keyword_answers(&self) -> &[(String, String)] {
        self.keywords.get_or_init(|| self.collect_keywords())
    }

    pub fn generate_test(&self, n: usize) -> Result<(Vec<String>, Vec<String>), QuizError> {
        self.generate_test_with_rng(n, &mut rand::thread_rng())
    }

    pub fn generate_test_with_rng<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<(Vec<String>, Vec<String>), QuizError> {
        let keywords = self.keyword_answers();
        if keywords.is_empty() {
            return Err(QuizError::NoViableQuestions);
        }

        let candidates: Vec<(String, String)> = (0..CANDIDATE_DRAWS)
            .map(|_| {
                let idx = rng.gen_range(0..keywords.len());
                let (keyword, answer) = &keywords[idx];
                let pattern = QUESTION_PATTERNS[idx % QUESTION_PATTERNS.len()];
                (format!("{pattern}{keyword}."), answer.clone())
            })
            .collect();

        let picked = draw_distinct(&candidates, n, self.max_draws, rng, |c| c.0.as_str())?;
        Ok(picked
            .into_iter()
            .map(|idx| candidates[idx].clone())
            .unzip())
    }

    fn collect_keywords(&self) -> Vec<(String, String)> {
        let sentences = match self.segmenter.segment(&self.corpus) {
            Ok(sentences) => sentences,
            Err(err) => {
                warn!(error = %err, "sentence segmentation failed");
                return Vec::new();
            }
        };

        let mut keywords: Vec<(String, String)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for sentence in &sentences {
            let tagged = match self.tagger.analyze(sentence) {
                Ok(tagged) => tagged,
                Err(err) => {
                    warn!(error = %err, %sentence, "skipping sentence");
                    continue;
                }
            };
            for phrase in &tagged.phrases {
                let keyword = phrase.to_uppercase();
                match positions.get(&keyword) {
                    Some(&pos) => keywords[pos].1.push_str(sentence),
                    None if tagged.tokens.len() > MIN_ANSWER_TOKENS => {
                        positions.insert(keyword.clone(), keywords.len());
                        keywords.push((keyword, sentence.clone()));
                    }
                    None => {}
                }
            }
        }
        debug!(keywords = keywords.len(), "collected subjective keywords");
        keywords
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const LONG: &str = "The borrow checker rejects programs because they can create \
        dangling pointers, and it always reports helpful errors with detailed \
        explanations for confused developers.";
    const SHORT: &str = "The borrow checker runs before code generation.";
    const SHORT_ONLY: &str = "The type checker reports mismatched types.";

    fn test_for(corpus: &str) -> SubjectiveTest {
        let toolkit = Toolkit::with_table("JJ", &[("borrow", "NN"), ("checker", "NN")]);
        SubjectiveTest::new(corpus, &toolkit, &GeneratorConfig::default())
    }

    #[test]
    fn keywords_need_a_long_first_sentence() {
        let test = test_for(&format!("{SHORT_ONLY} {LONG} {SHORT}"));
        let keywords = test.keyword_answers();
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].0, "BORROW CHECKER");
        assert_eq!(keywords[0].1, format!("{LONG}{SHORT}"));
    }

    #[test]
    fn questions_use_the_fixed_patterns() {
        let test = test_for(LONG);
        let (questions, answers) = test
            .generate_test_with_rng(1, &mut StdRng::seed_from_u64(5))
            .unwrap();
        assert_eq!(questions, vec!["Explain in detail BORROW CHECKER."]);
        assert_eq!(answers, vec![LONG.to_string()]);
    }

    #[test]
    fn one_keyword_cannot_fill_two_questions() {
        let test = test_for(LONG);
        let err = test
            .generate_test_with_rng(2, &mut StdRng::seed_from_u64(5))
            .unwrap_err();
        assert!(matches!(
            err,
            QuizError::InsufficientQuestions {
                requested: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn no_keywords_no_questions() {
        let test = test_for(SHORT_ONLY);
        assert_eq!(
            test.generate_test(2),
            Err(QuizError::NoViableQuestions)
        );
        assert_eq!(test_for("").generate_test(2), Err(QuizError::NoViableQuestions));
    }
}
