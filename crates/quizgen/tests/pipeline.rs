mod common;

use std::collections::HashMap;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wordnet_db::LoadMode;
use wordnet_types::{Pos, SynsetId};

use common::{TableTagger, fixture_dir};
use quizgen::{
    BLANK, CorpusQuestionExtractor, DistractorFinder, GeneratorConfig, LexicalDatabase,
    ObjectiveTest, PhraseScan, PosTagger, QuizError, SentenceSegmenter, ServiceError,
    TaggedToken, Toolkit, WordNetLexicon, WordTokenizer,
};

fn noun(offset: u32) -> SynsetId {
    SynsetId {
        pos: Pos::Noun,
        offset,
    }
}

/// Programming languages under one hypernym, keyed by exact word.
struct Languages;

impl LexicalDatabase for Languages {
    fn noun_senses(&self, word: &str) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(match word {
            "Java" => vec![noun(2)],
            "Rust" => vec![noun(3)],
            "Python" => vec![noun(4)],
            _ => vec![],
        })
    }

    fn hypernyms(&self, sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(if sense == noun(1) { vec![] } else { vec![noun(1)] })
    }

    fn hyponyms(&self, sense: SynsetId) -> Result<Vec<SynsetId>, ServiceError> {
        Ok(if sense == noun(1) {
            vec![noun(2), noun(3), noun(4)]
        } else {
            vec![]
        })
    }

    fn lemma_names(&self, sense: SynsetId) -> Result<Vec<String>, ServiceError> {
        let name = match sense.offset {
            1 => "programming_language",
            2 => "Java",
            3 => "Rust",
            4 => "Python",
            _ => return Err(ServiceError::Lexicon(format!("no synset {sense}"))),
        };
        Ok(vec![name.to_string()])
    }
}

struct WhitespaceTokenizer;

impl WordTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, sentence: &str) -> Result<Vec<String>, ServiceError> {
        Ok(sentence.split_whitespace().map(str::to_string).collect())
    }
}

struct FailingTagger;

impl PosTagger for FailingTagger {
    fn tag(&self, _words: &[String]) -> Result<Vec<TaggedToken>, ServiceError> {
        Err(ServiceError::Tagging("model not loaded".into()))
    }
}

struct FailingSegmenter;

impl SentenceSegmenter for FailingSegmenter {
    fn segment(&self, _text: &str) -> Result<Vec<String>, ServiceError> {
        Err(ServiceError::Segmentation("punkt data missing".into()))
    }
}

fn toolkit() -> Toolkit {
    common::toolkit(Arc::new(Languages))
}

fn extract(corpus: &str, toolkit: &Toolkit, config: &GeneratorConfig) -> Vec<quizgen::QuestionRecord> {
    CorpusQuestionExtractor::new(toolkit, config).extract(corpus)
}

#[test]
fn three_letter_first_word_is_filtered_out() {
    let corpus = "The quick brown fox jumps over the lazy dog.";
    let records = extract(corpus, &toolkit(), &GeneratorConfig::default());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, "The");
    assert_eq!(records[0].key, 3);
    assert!(records[0].similar.is_empty());
    assert_eq!(
        records[0].question,
        format!("{BLANK} quick brown fox jumps over the lazy dog.")
    );

    let test = ObjectiveTest::new(corpus, &toolkit(), &GeneratorConfig::default());
    assert_eq!(test.generate_test(1), Err(QuizError::NoViableQuestions));
}

#[test]
fn single_word_answers_get_sibling_distractors() {
    let test = ObjectiveTest::new(
        "Python is a popular language for data analysis.",
        &toolkit(),
        &GeneratorConfig::default(),
    );
    let records = test.question_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, "Python");
    assert_eq!(records[0].key, 6);
    assert_eq!(records[0].similar, vec!["Java", "Rust"]);
    assert_eq!(
        records[0].question,
        format!("{BLANK} is a popular language for data analysis.")
    );
}

#[test]
fn first_word_inside_a_phrase_blanks_two_words() {
    let records = extract(
        "Memory safety without garbage collection is Rust's key feature.",
        &toolkit(),
        &GeneratorConfig::default(),
    );
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.answer, "garbage collection");
    assert_eq!(record.key, 7);
    assert!(record.similar.is_empty());
    assert_eq!(
        record.question,
        format!("Memory safety without {BLANK}{BLANK} is Rust's key feature.")
    );
    assert_eq!(record.question.matches(BLANK).count(), 2);
}

#[test]
fn every_token_scan_finds_later_phrases() {
    let corpus = "Rust guarantees memory safety without garbage collection.";

    let first = extract(corpus, &toolkit(), &GeneratorConfig::default());
    assert_eq!(first[0].answer, "Rust");
    assert_eq!(first[0].similar, vec!["Java", "Python"]);

    let config = GeneratorConfig {
        phrase_scan: PhraseScan::EveryToken,
        ..GeneratorConfig::default()
    };
    let every = extract(corpus, &toolkit(), &config);
    assert_eq!(every[0].answer, "garbage collection");
}

#[test]
fn quote_led_phrase_stops_phrase_matching() {
    let tagger = TableTagger(HashMap::from([
        ("builds", "VBZ"),
        ("'Cargo", "NNP"),
        ("crates'", "NNS"),
        ("and", "CC"),
    ]));
    let toolkit = toolkit()
        .with_tokenizer(Arc::new(WhitespaceTokenizer))
        .with_tagger(Arc::new(tagger));
    let records = extract(
        "Cargo builds 'Cargo crates' and Cargo workspaces",
        &toolkit,
        &GeneratorConfig::default(),
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, "Cargo");
    assert_eq!(
        records[0].question,
        format!("{BLANK} builds 'Cargo crates' and Cargo workspaces")
    );
}

#[test]
fn adverb_openers_and_short_sentences_are_skipped() {
    let corpus = "Usually Python is slower than Rust. Java works. Rust compiles ahead of time.";
    let records = extract(corpus, &toolkit(), &GeneratorConfig::default());
    let answers: Vec<&str> = records.iter().map(|r| r.answer.as_str()).collect();
    assert_eq!(answers, vec!["Rust"]);
}

#[test]
fn empty_and_whitespace_corpora_have_no_questions() {
    for corpus in ["", "   \n\t\n  "] {
        let test = ObjectiveTest::new(corpus, &toolkit(), &GeneratorConfig::default());
        assert!(test.question_records().is_empty());
        assert_eq!(test.generate_test(3), Err(QuizError::NoViableQuestions));
    }
}

#[test]
fn zero_questions_returns_empty_lists() {
    let test = ObjectiveTest::new(
        "Python is a popular language for data analysis.",
        &toolkit(),
        &GeneratorConfig::default(),
    );
    assert_eq!(test.generate_test(0), Ok((vec![], vec![])));
}

#[test]
fn extraction_and_seeded_sampling_are_repeatable() {
    let corpus = "Python is a popular language for data analysis. \
        Rust guarantees memory safety without garbage collection. \
        Java runs on a virtual machine.";
    let config = GeneratorConfig::default();
    assert_eq!(
        extract(corpus, &toolkit(), &config),
        extract(corpus, &toolkit(), &config)
    );

    let test = ObjectiveTest::new(corpus, &toolkit(), &config);
    let a = test.generate_test_with_rng(2, &mut StdRng::seed_from_u64(11));
    let b = test.generate_test_with_rng(2, &mut StdRng::seed_from_u64(11));
    assert_eq!(a, b);

    let (questions, answers) = test
        .generate_test_with_rng(3, &mut StdRng::seed_from_u64(3))
        .unwrap();
    let mut sorted = answers.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["Java", "Python", "Rust"]);
    for (question, answer) in questions.iter().zip(&answers) {
        assert!(question.contains(BLANK));
        assert!(!question.contains(answer.as_str()));
    }
}

#[test]
fn asking_for_more_than_available_is_an_error() {
    let test = ObjectiveTest::new(
        "Python is a popular language for data analysis.",
        &toolkit(),
        &GeneratorConfig::default(),
    );
    assert_eq!(
        test.generate_test(2),
        Err(QuizError::InsufficientQuestions {
            requested: 2,
            available: 1,
            draws: 0
        })
    );
}

#[test]
fn service_failures_are_contained() {
    let corpus = "Python is a popular language for data analysis.";

    let toolkit_bad_tagger = toolkit().with_tagger(Arc::new(FailingTagger));
    assert!(extract(corpus, &toolkit_bad_tagger, &GeneratorConfig::default()).is_empty());

    let toolkit_bad_segmenter = toolkit().with_segmenter(Arc::new(FailingSegmenter));
    let test = ObjectiveTest::new(corpus, &toolkit_bad_segmenter, &GeneratorConfig::default());
    assert!(test.question_records().is_empty());
    assert_eq!(test.generate_test(1), Err(QuizError::NoViableQuestions));
}

#[test]
fn wordnet_distractors_follow_the_fixture_taxonomy() {
    let lexicon: Arc<dyn LexicalDatabase> =
        Arc::new(WordNetLexicon::load(fixture_dir(), LoadMode::Owned).expect("load fixtures"));
    let finder = DistractorFinder::new(Arc::clone(&lexicon));

    assert_eq!(finder.find_distractors("Python"), vec!["Java", "Rust"]);
    // Inflected forms resolve through morphy; self-exclusion stays exact.
    assert_eq!(finder.find_distractors("wolves"), vec!["dog", "wolf", "fox"]);
    assert_eq!(finder.find_distractors("dog"), vec!["wolf", "fox"]);
    // Instance hypernyms are not followed.
    assert!(finder.find_distractors("Laika").is_empty());
    assert!(finder.find_distractors("zebra").is_empty());

    let limited = DistractorFinder::new(lexicon).with_limit(1);
    assert_eq!(limited.find_distractors("dog"), vec!["wolf"]);
}
