use thiserror::Error;

/// Failure reported by an external text or lexical service.
///
/// The pipeline never propagates these; they are logged and the affected
/// sentence or word simply contributes nothing.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("sentence segmentation failed: {0}")]
    Segmentation(String),
    #[error("tokenization failed: {0}")]
    Tokenization(String),
    #[error("part-of-speech tagging failed: {0}")]
    Tagging(String),
    #[error("lexical lookup failed: {0}")]
    Lexicon(String),
}

/// Errors surfaced to callers of the test generators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no viable questions could be generated from the corpus")]
    NoViableQuestions,
    #[error(
        "requested {requested} distinct questions but only {available} are available (after {draws} draws)"
    )]
    InsufficientQuestions {
        requested: usize,
        available: usize,
        draws: usize,
    },
}
