//! Synthetic tweet text from per-user TF-IDF vectors.
//!
//! Each user's vocabulary is partitioned into bins of equal TF-IDF score.
//! A word is drawn by sampling the user's Weibull distribution, snapping the
//! value to the nearest bin score and picking uniformly inside that bin.

pub mod bins;
pub mod cache;
pub mod error;
pub mod generator;
mod ingest;
pub mod params;
pub mod rng;
pub mod sampler;
pub mod tfidf;

pub use bins::{Bin, BinIndex, LadderSearch};
pub use cache::IndexCache;
pub use error::{Result, SynthError};
pub use generator::{GeneratedTweet, GeneratorConfig, TweetGenerator};
pub use params::{ColumnOrder, ParameterTable, WeibullParams};
pub use rng::SharedRng;
pub use sampler::WordSampler;
pub use tfidf::{TfidfTable, TfidfVector};
