use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tweetsynth_core::{ColumnOrder, GeneratorConfig};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Run seed; absent means a fresh seed from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_params_path")]
    pub params: PathBuf,
    #[serde(default = "default_matrix_path")]
    pub matrix: PathBuf,
    #[serde(default = "default_tweets_path")]
    pub tweets: PathBuf,
    #[serde(default)]
    pub param_columns: ColumnOrder,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Defaults to `<tweets stem>_generated.<ext>` next to the tweet log.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load `explicit` if given, else `./config.toml` if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            tracing::info!(path = %path.display(), "loaded config");
            return Ok(config);
        }

        let local = Path::new("config.toml");
        if local.exists() {
            let config = Self::load(local)?;
            tracing::info!("loaded config from config.toml");
            Ok(config)
        } else {
            tracing::info!("no config.toml found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| generated_path(&self.input.tweets))
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            params: default_params_path(),
            matrix: default_matrix_path(),
            tweets: default_tweets_path(),
            param_columns: ColumnOrder::default(),
        }
    }
}

/// `dir/name.txt` -> `dir/name_generated.txt`.
pub fn generated_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}_generated.{}", ext.to_string_lossy()),
        None => format!("{stem}_generated"),
    };
    input.with_file_name(name)
}

fn default_params_path() -> PathBuf {
    PathBuf::from("user_parameters.txt")
}
fn default_matrix_path() -> PathBuf {
    PathBuf::from("tfidf_matrix.txt")
}
fn default_tweets_path() -> PathBuf {
    PathBuf::from("tweets_cleaned.txt")
}
