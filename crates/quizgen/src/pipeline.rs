//! Objective test generation for a single corpus.

use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use rand::Rng;
use tracing::warn;

use crate::assemble::{DEFAULT_MAX_DRAWS, DEFAULT_MIN_ANSWER_LEN, TestAssembler};
use crate::error::QuizError;
use crate::extract::CorpusQuestionExtractor;
use crate::lexicon::DEFAULT_DISTRACTOR_LIMIT;
use crate::synth::{PhraseScan, QuestionRecord};
use crate::toolkit::Toolkit;

pub const DEFAULT_NUM_QUESTIONS: usize = 3;

#[derive(Clone, Copy, Debug)]
pub struct GeneratorConfig {
    pub min_answer_len: usize,
    pub max_draws: usize,
    pub distractor_limit: usize,
    pub phrase_scan: PhraseScan,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_answer_len: DEFAULT_MIN_ANSWER_LEN,
            max_draws: DEFAULT_MAX_DRAWS,
            distractor_limit: DEFAULT_DISTRACTOR_LIMIT,
            phrase_scan: PhraseScan::default(),
        }
    }
}

/// Read a corpus file. Unreadable files give an empty corpus.
pub fn load_corpus(path: impl AsRef<Path>) -> Arc<str> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(text) => text.into(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "corpus not readable, using empty corpus");
            Arc::from("")
        }
    }
}

/// Fill-in-the-blank test generator over one immutable corpus.
///
/// Question records are extracted on first use and reused afterwards.
pub struct ObjectiveTest {
    corpus: Arc<str>,
    extractor: CorpusQuestionExtractor,
    assembler: TestAssembler,
    records: OnceLock<Vec<QuestionRecord>>,
}

impl ObjectiveTest {
    pub fn new(corpus: impl Into<Arc<str>>, toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        Self {
            corpus: corpus.into(),
            extractor: CorpusQuestionExtractor::new(toolkit, config),
            assembler: TestAssembler::new(config.min_answer_len, config.max_draws),
            records: OnceLock::new(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>, toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        Self::new(load_corpus(path), toolkit, config)
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    /// Every record the corpus yields, viable or not, in sentence order.
    pub fn question_records(&self) -> &[QuestionRecord] {
        self.records
            .get_or_init(|| self.extractor.extract(&self.corpus))
    }

    pub fn generate_test(&self, n: usize) -> Result<(Vec<String>, Vec<String>), QuizError> {
        self.generate_test_with_rng(n, &mut rand::thread_rng())
    }

    pub fn generate_test_with_rng<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<(Vec<String>, Vec<String>), QuizError> {
        self.assembler.assemble(self.question_records(), n, rng)
    }

    /// Like [`generate_test`](Self::generate_test) but keeps key and distractors.
    pub fn generate_detailed(&self, n: usize) -> Result<Vec<QuestionRecord>, QuizError> {
        self.generate_detailed_with_rng(n, &mut rand::thread_rng())
    }

    pub fn generate_detailed_with_rng<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<QuestionRecord>, QuizError> {
        Ok(self
            .assembler
            .sample(self.question_records(), n, rng)?
            .into_iter()
            .cloned()
            .collect())
    }
}
