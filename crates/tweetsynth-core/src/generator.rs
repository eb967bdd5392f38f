use crate::bins::LadderSearch;
use crate::cache::IndexCache;
use crate::error::{Result, SynthError};
use crate::params::ParameterTable;
use crate::sampler::WordSampler;
use crate::tfidf::TfidfTable;
use rand::Rng;
use serde::Deserialize;

/// Adjustable generation settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    /// Floor offset added to every Weibull variate.
    #[serde(default)]
    pub min_tfidf: f64,
    /// Emit a space after the last word too.
    #[serde(default = "default_trailing_space")]
    pub trailing_space: bool,
    #[serde(default)]
    pub search: LadderSearch,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_words: default_max_words(),
            min_tfidf: 0.0,
            trailing_space: default_trailing_space(),
            search: LadderSearch::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_words > self.max_words {
            return Err(SynthError::invalid_config(format!(
                "min_words ({}) > max_words ({})",
                self.min_words, self.max_words
            )));
        }
        if !self.min_tfidf.is_finite() {
            return Err(SynthError::invalid_config(format!(
                "min_tfidf must be finite, got {}",
                self.min_tfidf
            )));
        }
        Ok(())
    }
}

fn default_min_words() -> usize {
    3
}
fn default_max_words() -> usize {
    7
}
fn default_trailing_space() -> bool {
    true
}

/// The words of one generated tweet, in draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedTweet {
    words: Vec<String>,
}

impl GeneratedTweet {
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Space-joined text, optionally with a space after the last word.
    pub fn render(&self, trailing_space: bool) -> String {
        let mut text = self.words.join(" ");
        if trailing_space && !self.words.is_empty() {
            text.push(' ');
        }
        text
    }
}

/// Assembles pseudo-tweets for users from their parameters and bin indexes.
///
/// Holds no random state: the caller passes the generator on every call,
/// so a fixed seed and a fixed call order give a fixed output.
pub struct TweetGenerator {
    config: GeneratorConfig,
    sampler: WordSampler,
    params: ParameterTable,
    indexes: IndexCache,
}

impl TweetGenerator {
    pub fn new(config: GeneratorConfig, params: ParameterTable, tfidf: TfidfTable) -> Result<Self> {
        config.validate()?;
        let sampler = WordSampler::new(config.min_tfidf, config.search);
        Ok(Self {
            config,
            sampler,
            params,
            indexes: IndexCache::new(tfidf),
        })
    }

    /// Generate the text of one tweet for `user`.
    pub fn generate<R: Rng>(&self, user: &str, rng: &mut R) -> Result<String> {
        Ok(self
            .generate_tweet(user, rng)?
            .render(self.config.trailing_space))
    }

    /// Generate one tweet as a word list.
    ///
    /// Draw order: the word count first, then for each word its Weibull
    /// variate followed by its in-bin pick.
    pub fn generate_tweet<R: Rng>(&self, user: &str, rng: &mut R) -> Result<GeneratedTweet> {
        let params = self.params.get(user)?;
        let index = self.indexes.get(user)?;

        let count = rng.gen_range(self.config.min_words..=self.config.max_words);
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(self.sampler.sample(user, params, &index, rng)?.to_string());
        }
        Ok(GeneratedTweet { words })
    }

    /// Build every index and check that each TF-IDF user has parameters.
    pub fn warm(&self) -> Result<usize> {
        for user in self.indexes.table().users() {
            if !self.params.contains(user) {
                return Err(SynthError::unknown_user(user));
            }
        }
        let users = self.indexes.warm()?;
        tracing::info!(users, "bin indexes ready");
        Ok(users)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn params(&self) -> &ParameterTable {
        &self.params
    }

    pub fn indexes(&self) -> &IndexCache {
        &self.indexes
    }
}
