mod common;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use quizgen::{NlpruleTagger, PhraseTagger, PunktSegmenter, Toolkit, WordTokenizer};

fn tokenizer_bin() -> Option<PathBuf> {
    env::var("NLPRULE_TOKENIZER").ok().map(PathBuf::from)
}

#[test]
fn ordinary_prose_gets_penn_tags_and_noun_chunks() {
    let Some(path) = tokenizer_bin() else {
        eprintln!("skipping: NLPRULE_TOKENIZER not set");
        return;
    };
    let nlp = Arc::new(NlpruleTagger::load(&path).expect("load en_tokenizer.bin"));
    let toolkit = Toolkit::new(
        Arc::new(PunktSegmenter::english()),
        Arc::clone(&nlp) as Arc<dyn WordTokenizer>,
        nlp,
        Arc::new(common::EmptyLexicon),
    );
    let tagger = PhraseTagger::new(&toolkit);

    let sentence = tagger
        .tag_and_chunk("Python is a general programming language used by many developers.")
        .expect("sentence accepted");
    let tag_of = |word: &str| {
        sentence
            .tokens
            .iter()
            .find(|t| t.word == word)
            .map(|t| t.tag.clone())
            .unwrap_or_default()
    };
    assert_eq!(sentence.tokens.len(), 11);
    assert_eq!(tag_of("is"), "VBZ");
    assert_eq!(tag_of("language"), "NN");
    assert_eq!(tag_of("developers"), "NNS");
    assert!(
        sentence.phrases.iter().any(|p| p.ends_with("language")),
        "phrases: {:?}",
        sentence.phrases
    );
    assert!(!sentence.phrases.iter().any(|p| p.contains("used")));
}
