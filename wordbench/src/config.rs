use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::corpus::DEFAULT_DOCUMENT_FILE;
use crate::errors::{SearchError, SearchResult};
use crate::search::boundary::DEFAULT_CONTEXT_BYTES;
use crate::search::matcher::Algorithm;
use crate::search::partition::DEFAULT_PARTITIONS;

/// Settings for one benchmark run.
///
/// # Configuration Locations
///
/// Values are layered from, lowest precedence first:
/// 1. Global `$HOME/.config/wordbench/config.yaml`
/// 2. Local `.wordbench.yaml` in the current directory
/// 3. A file passed with `--config`
///
/// Command-line flags are applied last through [`SearchConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// keyword: "whale"
/// root_path: "texts"
/// algorithm: vectorized   # brute-force | library | vectorized
/// parallel: true
/// partitions: 2
/// print_matches: false
/// context_bytes: 20
/// file_name: "merged.txt"
/// vectorized_fallback: true
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// The word to count
    #[serde(default)]
    pub keyword: String,

    /// Directory holding one subdirectory per document
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Substring search strategy
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Split the corpus across worker threads
    #[serde(default)]
    pub parallel: bool,

    /// Number of contiguous partitions in a parallel run
    #[serde(default = "default_partitions")]
    pub partitions: NonZeroUsize,

    /// Print each match with its context (sequential runs only)
    #[serde(default)]
    pub print_matches: bool,

    /// Bytes of context printed on each side of a match
    #[serde(default = "default_context_bytes")]
    pub context_bytes: usize,

    /// File read inside each document directory
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Load at most this many documents
    #[serde(default)]
    pub limit: Option<usize>,

    /// Let the vectorized matcher hand inputs it cannot handle to the
    /// library matcher instead of reporting nothing for them
    #[serde(default = "default_vectorized_fallback")]
    pub vectorized_fallback: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Values given on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub keyword: Option<String>,
    pub root_path: Option<PathBuf>,
    pub algorithm: Option<Algorithm>,
    pub parallel: Option<bool>,
    pub partitions: Option<NonZeroUsize>,
    pub print_matches: Option<bool>,
    pub context_bytes: Option<usize>,
    pub file_name: Option<String>,
    pub limit: Option<usize>,
    pub vectorized_fallback: Option<bool>,
    pub log_level: Option<String>,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_partitions() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_PARTITIONS).unwrap_or(NonZeroUsize::MIN)
}

fn default_context_bytes() -> usize {
    DEFAULT_CONTEXT_BYTES
}

fn default_file_name() -> String {
    DEFAULT_DOCUMENT_FILE.to_string()
}

fn default_vectorized_fallback() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            root_path: default_root_path(),
            algorithm: Algorithm::default(),
            parallel: false,
            partitions: default_partitions(),
            print_matches: false,
            context_bytes: default_context_bytes(),
            file_name: default_file_name(),
            limit: None,
            vectorized_fallback: default_vectorized_fallback(),
            log_level: default_log_level(),
        }
    }
}

impl SearchConfig {
    pub fn new(keyword: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            keyword: keyword.into(),
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from the default locations plus `config_path`.
    ///
    /// An explicit path that does not exist is an error; the default
    /// locations are only read when present.
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("wordbench/config.yaml")),
            Some(PathBuf::from(".wordbench.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Applies command-line values over configuration file values.
    ///
    /// Every flag the user passed wins, even when it repeats a default.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(keyword) = cli.keyword {
            self.keyword = keyword;
        }
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(algorithm) = cli.algorithm {
            self.algorithm = algorithm;
        }
        if let Some(parallel) = cli.parallel {
            self.parallel = parallel;
        }
        if let Some(partitions) = cli.partitions {
            self.partitions = partitions;
        }
        if let Some(print_matches) = cli.print_matches {
            self.print_matches = print_matches;
        }
        if let Some(context_bytes) = cli.context_bytes {
            self.context_bytes = context_bytes;
        }
        if let Some(file_name) = cli.file_name {
            self.file_name = file_name;
        }
        if cli.limit.is_some() {
            self.limit = cli.limit;
        }
        if let Some(vectorized_fallback) = cli.vectorized_fallback {
            self.vectorized_fallback = vectorized_fallback;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }

    /// Rejects settings no run can use
    pub fn validate(&self) -> SearchResult<()> {
        if self.keyword.is_empty() {
            return Err(SearchError::invalid_keyword("keyword must not be empty"));
        }
        if self.file_name.is_empty() {
            return Err(SearchError::config_error("file_name must not be empty"));
        }
        Ok(())
    }
}
