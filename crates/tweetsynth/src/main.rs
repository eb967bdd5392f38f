use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tweetsynth::app;
use tweetsynth::config::Config;
use tweetsynth_core::rng;

/// Tweetsynth: per-user synthetic tweet text from TF-IDF bins.
#[derive(Parser)]
#[command(name = "tweetsynth")]
struct Args {
    /// Config file (default: ./config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Random seed; overrides the config file
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Per-user shape/scale table
    #[arg(long, global = true)]
    params: Option<PathBuf>,

    /// Per-user word TF-IDF matrix
    #[arg(long, global = true)]
    matrix: Option<PathBuf>,

    /// Minimum words per tweet
    #[arg(long, global = true)]
    min_words: Option<usize>,

    /// Maximum words per tweet
    #[arg(long, global = true)]
    max_words: Option<usize>,

    /// Offset added to every Weibull draw
    #[arg(long, global = true)]
    min_tfidf: Option<f64>,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one line per record of a tweet log and append them to a file
    Replay {
        /// Cleaned tweet log
        #[arg(long)]
        tweets: Option<PathBuf>,
        /// Output file (appended to)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print generated tweets for one user
    Sample {
        #[arg(long)]
        user: String,
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// List users with their parameters and bin counts
    Users,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(p) = &self.params {
            config.input.params = p.clone();
        }
        if let Some(p) = &self.matrix {
            config.input.matrix = p.clone();
        }
        if let Some(n) = self.min_words {
            config.generator.min_words = n;
        }
        if let Some(n) = self.max_words {
            config.generator.max_words = n;
        }
        if let Some(x) = self.min_tfidf {
            config.generator.min_tfidf = x;
        }
        if let Command::Replay { tweets, output } = &self.command {
            if let Some(p) = tweets {
                config.input.tweets = p.clone();
            }
            if output.is_some() {
                config.output.path = output.clone();
            }
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = Config::resolve(args.config.as_deref())?;
    args.apply(&mut config);

    match &args.command {
        Command::Replay { .. } => {
            let summary = app::run_replay(&config)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Sample { user, count } => {
            let generator = app::load_generator(&config)?;
            let seed = rng::resolve_seed(config.seed);
            tracing::info!(seed, user = %user, count, "sampling");
            let mut rng = StdRng::seed_from_u64(seed);
            for text in app::sample(&generator, user, *count, &mut rng)? {
                println!("{text}");
            }
        }
        Command::Users => {
            let generator = app::load_generator(&config)?;
            for row in app::users(&generator)? {
                println!("{}", serde_json::to_string(&row)?);
            }
        }
    }
    Ok(())
}
