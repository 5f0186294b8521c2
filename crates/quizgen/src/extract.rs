use std::sync::Arc;

use tracing::{debug, warn};

use crate::chunker::PhraseTagger;
use crate::lexicon::DistractorFinder;
use crate::pipeline::GeneratorConfig;
use crate::synth::{QuestionRecord, QuestionSynthesizer};
use crate::text::SentenceSegmenter;
use crate::toolkit::Toolkit;

/// Runs tagging and synthesis over every sentence of a corpus.
#[derive(Clone)]
pub struct CorpusQuestionExtractor {
    segmenter: Arc<dyn SentenceSegmenter>,
    tagger: PhraseTagger,
    synthesizer: QuestionSynthesizer,
}

impl CorpusQuestionExtractor {
    pub fn new(toolkit: &Toolkit, config: &GeneratorConfig) -> Self {
        let distractors = DistractorFinder::new(Arc::clone(&toolkit.lexicon))
            .with_limit(config.distractor_limit);
        Self {
            segmenter: Arc::clone(&toolkit.segmenter),
            tagger: PhraseTagger::new(toolkit),
            synthesizer: QuestionSynthesizer::new(distractors, config.phrase_scan),
        }
    }

    /// One record per usable sentence, in corpus order.
    pub fn extract(&self, corpus: &str) -> Vec<QuestionRecord> {
        let sentences = match self.segmenter.segment(corpus) {
            Ok(sentences) => sentences,
            Err(err) => {
                warn!(error = %err, "sentence segmentation failed");
                return Vec::new();
            }
        };

        let records: Vec<QuestionRecord> = sentences
            .iter()
            .filter_map(|sentence| {
                let tagged = self.tagger.tag_and_chunk(sentence)?;
                self.synthesizer.synthesize(&tagged, sentence)
            })
            .collect();
        debug!(
            sentences = sentences.len(),
            records = records.len(),
            "extracted question records"
        );
        records
    }
}
