pub mod assemble;
pub mod catalog;
pub mod chunker;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod lexicon;
pub mod pipeline;
pub mod segment;
pub mod subjective;
pub mod synth;
pub mod tagger;
pub mod text;
pub mod toolkit;

pub use assemble::TestAssembler;
pub use catalog::{Subject, SubjectCatalog};
pub use chunker::{PhraseTagger, TaggedSentence};
pub use error::{QuizError, ServiceError};
pub use extract::CorpusQuestionExtractor;
pub use handlers::{AppState, router};
pub use lexicon::{DistractorFinder, LexicalDatabase, WordNetLexicon};
pub use pipeline::{DEFAULT_NUM_QUESTIONS, GeneratorConfig, ObjectiveTest, load_corpus};
pub use segment::PunktSegmenter;
pub use subjective::SubjectiveTest;
pub use synth::{BLANK, PhraseScan, QuestionRecord, QuestionSynthesizer};
pub use tagger::NlpruleTagger;
pub use text::{PosTagger, SentenceSegmenter, TaggedToken, WordTokenizer};
pub use toolkit::Toolkit;
