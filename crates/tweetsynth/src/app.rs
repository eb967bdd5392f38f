use crate::config::Config;
use crate::output::{format_line, OutputWriter};
use crate::tweetlog::{self, TweetLog};
use anyhow::Context;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tweetsynth_core::{rng, ParameterTable, TfidfTable, TweetGenerator};

/// Printed after a `replay` run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub records_read: usize,
    pub lines_written: usize,
    pub users_indexed: usize,
    pub unterminated_tail: bool,
    pub output: PathBuf,
}

/// One row of the `users` listing.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub user: String,
    pub shape: f64,
    pub scale: f64,
    pub bins: usize,
    pub words: usize,
}

fn open(path: &Path, what: &str) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {what} {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Read both tables and build the generator.
pub fn load_generator(config: &Config) -> anyhow::Result<TweetGenerator> {
    let params = ParameterTable::from_reader(
        open(&config.input.params, "parameter table")?,
        config.input.param_columns,
    )
    .with_context(|| format!("loading {}", config.input.params.display()))?;

    let tfidf = TfidfTable::from_reader(open(&config.input.matrix, "tf-idf matrix")?)
        .with_context(|| format!("loading {}", config.input.matrix.display()))?;

    tracing::info!(
        param_users = params.len(),
        tfidf_users = tfidf.len(),
        min_words = config.generator.min_words,
        max_words = config.generator.max_words,
        min_tfidf = config.generator.min_tfidf,
        search = ?config.generator.search,
        "tables loaded"
    );

    Ok(TweetGenerator::new(config.generator.clone(), params, tfidf)?)
}

/// Generate one line per record and append it to `out`.
pub fn replay<R: Rng>(
    generator: &TweetGenerator,
    log: &TweetLog,
    rng: &mut R,
    out: &mut OutputWriter,
) -> anyhow::Result<usize> {
    for (i, record) in log.records.iter().enumerate() {
        let text = generator
            .generate(&record.username, rng)
            .with_context(|| format!("generating for record {} ({})", i + 1, record.username))?;
        tracing::debug!(user = %record.username, original = %record.text, "source record");
        let line = format_line(record, &text);
        tracing::debug!(%line, "generated");
        out.write_line(&line)?;
    }
    Ok(out.written())
}

/// Full `replay` command: load, index, read the log, write output.
pub fn run_replay(config: &Config) -> anyhow::Result<RunSummary> {
    let generator = load_generator(config)?;
    let users_indexed = generator.warm()?;

    let raw = std::fs::read(&config.input.tweets)
        .with_context(|| format!("reading tweet log {}", config.input.tweets.display()))?;
    let log = tweetlog::parse_log(&String::from_utf8_lossy(&raw))
        .with_context(|| format!("parsing tweet log {}", config.input.tweets.display()))?;

    let seed = rng::resolve_seed(config.seed);
    let mut rng = StdRng::seed_from_u64(seed);
    let output = config.output_path();

    let mut out = OutputWriter::append(&output)?;
    replay(&generator, &log, &mut rng, &mut out)?;
    let lines_written = out.finish()?;

    tracing::info!(
        seed,
        records = log.records.len(),
        lines = lines_written,
        output = %output.display(),
        "replay finished"
    );

    Ok(RunSummary {
        seed,
        records_read: log.records.len(),
        lines_written,
        users_indexed,
        unterminated_tail: log.unterminated.is_some(),
        output,
    })
}

/// Generate `count` tweets for one user.
pub fn sample<R: Rng>(
    generator: &TweetGenerator,
    user: &str,
    count: usize,
    rng: &mut R,
) -> anyhow::Result<Vec<String>> {
    (0..count)
        .map(|_| {
            generator
                .generate(user, rng)
                .with_context(|| format!("generating for {user}"))
        })
        .collect()
}

/// Users present in both tables, in parameter-table order.
pub fn users(generator: &TweetGenerator) -> anyhow::Result<Vec<UserInfo>> {
    let mut rows = Vec::new();
    for user in generator.params().users() {
        if !generator.indexes().table().contains(user) {
            tracing::warn!(user, "user has parameters but no tf-idf column");
            continue;
        }
        let params = generator.params().get(user)?;
        let index = generator.indexes().get(user)?;
        rows.push(UserInfo {
            user: user.to_string(),
            shape: params.shape(),
            scale: params.scale(),
            bins: index.num_bins(),
            words: index.num_words(),
        });
    }
    Ok(rows)
}
