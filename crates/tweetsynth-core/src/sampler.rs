use crate::bins::{BinIndex, LadderSearch};
use crate::error::{Result, SynthError};
use crate::params::WeibullParams;
use rand::Rng;

/// Draws single words from a user's bin index.
///
/// Each draw samples a Weibull variate, shifts it by `min_tfidf`, snaps the
/// result to the nearest score on the ladder and picks a word from that bin
/// uniformly. Draws are independent; nothing is remembered between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordSampler {
    min_tfidf: f64,
    search: LadderSearch,
}

impl Default for WordSampler {
    fn default() -> Self {
        Self::new(0.0, LadderSearch::Linear)
    }
}

impl WordSampler {
    pub fn new(min_tfidf: f64, search: LadderSearch) -> Self {
        Self { min_tfidf, search }
    }

    pub fn min_tfidf(&self) -> f64 {
        self.min_tfidf
    }

    pub fn search(&self) -> LadderSearch {
        self.search
    }

    /// Draw one word. `user` only labels the `EmptyIndex` error.
    pub fn sample<'a, R: Rng>(
        &self,
        user: &str,
        params: WeibullParams,
        index: &'a BinIndex,
        rng: &mut R,
    ) -> Result<&'a str> {
        if index.is_empty() {
            return Err(SynthError::empty_index(user));
        }

        let variate: f64 = rng.sample(params.distribution());
        let target = variate + self.min_tfidf;

        let bin = index
            .nearest_bin(target, self.search)
            .ok_or_else(|| SynthError::empty_index(user))?;
        let word = &bin.words()[rng.gen_range(0..bin.len())];

        tracing::trace!(user, variate, target, bin = bin.score(), word = %word, "word drawn");
        Ok(word)
    }
}
