use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use wordnet_db::LoadMode;

use crate::lexicon::{LexicalDatabase, WordNetLexicon};
use crate::segment::PunktSegmenter;
use crate::tagger::NlpruleTagger;
use crate::text::{PosTagger, SentenceSegmenter, WordTokenizer};

/// The external services one generator instance talks to.
///
/// Cheap to clone; every component keeps its own handles.
#[derive(Clone)]
pub struct Toolkit {
    pub segmenter: Arc<dyn SentenceSegmenter>,
    pub tokenizer: Arc<dyn WordTokenizer>,
    pub tagger: Arc<dyn PosTagger>,
    pub lexicon: Arc<dyn LexicalDatabase>,
}

impl Toolkit {
    pub fn new(
        segmenter: Arc<dyn SentenceSegmenter>,
        tokenizer: Arc<dyn WordTokenizer>,
        tagger: Arc<dyn PosTagger>,
        lexicon: Arc<dyn LexicalDatabase>,
    ) -> Self {
        Self {
            segmenter,
            tokenizer,
            tagger,
            lexicon,
        }
    }

    /// Punkt segmentation, nlprule tagging from `tokenizer_bin` and WordNet
    /// from `dict_dir`.
    pub fn load(
        dict_dir: impl AsRef<Path>,
        mode: LoadMode,
        tokenizer_bin: impl AsRef<Path>,
    ) -> Result<Self> {
        let lexicon = WordNetLexicon::load(dict_dir, mode)?;
        let tagger = Arc::new(NlpruleTagger::load(tokenizer_bin)?);
        Ok(Self::new(
            Arc::new(PunktSegmenter::english()),
            Arc::clone(&tagger) as Arc<dyn WordTokenizer>,
            tagger,
            Arc::new(lexicon),
        ))
    }

    pub fn with_segmenter(mut self, segmenter: Arc<dyn SentenceSegmenter>) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn WordTokenizer>) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = tagger;
        self
    }
}

/// Punkt over table-driven tagging and an empty lexicon.
#[cfg(test)]
impl Toolkit {
    pub(crate) fn with_table(fallback: &'static str, tags: &[(&str, &str)]) -> Self {
        use crate::lexicon::NoLexicon;
        use crate::text::{SplitTokenizer, TableTagger};

        Self::new(
            Arc::new(PunktSegmenter::english()),
            Arc::new(SplitTokenizer),
            Arc::new(TableTagger::new(fallback, tags)),
            Arc::new(NoLexicon),
        )
    }
}
