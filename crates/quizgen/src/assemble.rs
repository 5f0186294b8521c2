//! Filtering question records and drawing a test from them.

use std::collections::HashSet;

use rand::Rng;

use crate::error::QuizError;
use crate::synth::QuestionRecord;

pub const DEFAULT_MIN_ANSWER_LEN: usize = 3;
pub const DEFAULT_MAX_DRAWS: usize = 10_000;

#[derive(Clone, Copy, Debug)]
pub struct TestAssembler {
    /// Records need `key` strictly above this.
    pub min_answer_len: usize,
    /// Upper bound on random draws for one test.
    pub max_draws: usize,
}

impl Default for TestAssembler {
    fn default() -> Self {
        Self {
            min_answer_len: DEFAULT_MIN_ANSWER_LEN,
            max_draws: DEFAULT_MAX_DRAWS,
        }
    }
}

impl TestAssembler {
    pub fn new(min_answer_len: usize, max_draws: usize) -> Self {
        Self {
            min_answer_len,
            max_draws,
        }
    }

    pub fn viable<'a>(&self, records: &'a [QuestionRecord]) -> Vec<&'a QuestionRecord> {
        records
            .iter()
            .filter(|r| r.key > self.min_answer_len)
            .collect()
    }

    /// Draw `n` records with distinct questions, uniformly with replacement.
    pub fn sample<'a, R: Rng + ?Sized>(
        &self,
        records: &'a [QuestionRecord],
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<&'a QuestionRecord>, QuizError> {
        let pool = self.viable(records);
        if pool.is_empty() {
            return Err(QuizError::NoViableQuestions);
        }
        let picked = draw_distinct(&pool, n, self.max_draws, rng, |r| r.question.as_str())?;
        Ok(picked.into_iter().map(|idx| pool[idx]).collect())
    }

    /// Parallel question and answer lists, in draw order.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        records: &[QuestionRecord],
        n: usize,
        rng: &mut R,
    ) -> Result<(Vec<String>, Vec<String>), QuizError> {
        Ok(self
            .sample(records, n, rng)?
            .into_iter()
            .map(|r| (r.question.clone(), r.answer.clone()))
            .unzip())
    }
}

/// Indices of `n` pool entries with pairwise distinct keys.
///
/// Fails up front when the pool cannot supply `n` distinct keys, and after
/// `max_draws` draws otherwise.
pub(crate) fn draw_distinct<T, R, K>(
    pool: &[T],
    n: usize,
    max_draws: usize,
    rng: &mut R,
    key: K,
) -> Result<Vec<usize>, QuizError>
where
    R: Rng + ?Sized,
    K: Fn(&T) -> &str,
{
    if n == 0 {
        return Ok(Vec::new());
    }
    let available = pool.iter().map(&key).collect::<HashSet<_>>().len();
    if available < n {
        return Err(QuizError::InsufficientQuestions {
            requested: n,
            available,
            draws: 0,
        });
    }

    let mut seen = HashSet::with_capacity(n);
    let mut picked = Vec::with_capacity(n);
    let mut draws = 0;
    while picked.len() < n {
        if draws >= max_draws {
            return Err(QuizError::InsufficientQuestions {
                requested: n,
                available,
                draws,
            });
        }
        draws += 1;
        let idx = rng.gen_range(0..pool.len());
        if seen.insert(key(&pool[idx])) {
            picked.push(idx);
        }
    }
    Ok(picked)
}
