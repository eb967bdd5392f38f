use crate::error::{Result, SynthError};
use crate::tfidf::TfidfVector;
use ahash::AHashMap;
use serde::Deserialize;

/// The words that share one exact TF-IDF score.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    score: f64,
    words: Vec<String>,
}

impl Bin {
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Words in the order they were encountered in the source vector.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// How the nearest ladder entry is located.
///
/// Both strategies return the same bin for every target, including ties,
/// where the smaller score wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LadderSearch {
    /// Scan every distinct score. O(bins).
    #[default]
    Linear,
    /// `partition_point` on the sorted ladder. O(log bins).
    Binary,
}

/// One user's vocabulary partitioned by exact score.
///
/// Bin keys compare bit-for-bit: scores come from a fixed-precision text
/// form, so two words share a bin only if they parsed to the same `f64`.
#[derive(Debug, Clone)]
pub struct BinIndex {
    bins: AHashMap<u64, Bin>,
    /// Distinct scores, ascending.
    ladder: Vec<f64>,
}

impl BinIndex {
    /// Partition `vector` into bins. Fails on a NaN score.
    pub fn build(vector: &TfidfVector) -> Result<Self> {
        let mut bins: AHashMap<u64, Bin> = AHashMap::new();
        for (word, score) in vector.iter() {
            if score.is_nan() {
                return Err(SynthError::malformed(
                    0,
                    format!("NaN score for word {word:?}"),
                ));
            }
            bins.entry(score.to_bits())
                .or_insert_with(|| Bin {
                    score,
                    words: Vec::new(),
                })
                .words
                .push(word.to_string());
        }

        let mut ladder: Vec<f64> = bins.values().map(|b| b.score).collect();
        ladder.sort_by(f64::total_cmp);

        Ok(Self { bins, ladder })
    }

    /// Sorted distinct scores.
    pub fn ladder(&self) -> &[f64] {
        &self.ladder
    }

    /// The bin whose key is exactly `score`.
    pub fn bin(&self, score: f64) -> Option<&Bin> {
        self.bins.get(&score.to_bits())
    }

    /// Bins in ladder order.
    pub fn bins(&self) -> impl Iterator<Item = &Bin> {
        self.ladder.iter().filter_map(|s| self.bin(*s))
    }

    pub fn num_bins(&self) -> usize {
        self.ladder.len()
    }

    pub fn num_words(&self) -> usize {
        self.bins.values().map(Bin::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ladder.is_empty()
    }

    /// The ladder score nearest to `x`, or `None` for an empty index.
    pub fn nearest(&self, x: f64, search: LadderSearch) -> Option<f64> {
        match search {
            LadderSearch::Linear => nearest_linear(&self.ladder, x),
            LadderSearch::Binary => nearest_binary(&self.ladder, x),
        }
    }

    /// The bin nearest to `x`.
    pub fn nearest_bin(&self, x: f64, search: LadderSearch) -> Option<&Bin> {
        self.nearest(x, search).and_then(|s| self.bin(s))
    }
}

/// Strict `<` keeps the earliest (smallest) entry on a tie.
fn nearest_linear(ladder: &[f64], x: f64) -> Option<f64> {
    let (&first, rest) = ladder.split_first()?;
    let mut best = first;
    let mut best_diff = (x - first).abs();
    for &v in rest {
        let diff = (x - v).abs();
        if diff < best_diff {
            best = v;
            best_diff = diff;
        }
    }
    Some(best)
}

fn nearest_binary(ladder: &[f64], x: f64) -> Option<f64> {
    if ladder.is_empty() {
        return None;
    }
    // First entry >= x; its left neighbour is the last entry < x.
    let hi = ladder.partition_point(|&v| v < x);
    if hi == 0 {
        return Some(ladder[0]);
    }
    let mut best = hi - 1;
    if hi < ladder.len() && (x - ladder[hi]).abs() < (x - ladder[best]).abs() {
        return Some(ladder[hi]);
    }
    // Far-off targets can round several distances to the same value; the
    // linear scan would keep the first of them.
    let best_diff = (x - ladder[best]).abs();
    while best > 0 && (x - ladder[best - 1]).abs() == best_diff {
        best -= 1;
    }
    Some(ladder[best])
}
