pub mod toml_config;

use crate::core::abbreviator::IgnoreList;
use chrono::NaiveDate;
use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;

pub use toml_config::TomlConfig;

/// Validated settings for one invocation. Build it with
/// [`TomlConfig::into_configuration`].
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Matches a serialized month line; group 1 holds the month text.
    pub month_regex: Regex,
    /// Download location of the abbreviation source file.
    pub latest_issn: String,
    /// Files modified on or before this date are refreshed.
    pub issn_upd: NaiveDate,
    pub url_base: String,
    /// Value of the `Accept` header sent to the resolver.
    pub accept: String,
    pub timeout: Duration,
    pub download_timeout: Duration,
    pub ignore_words: IgnoreList,
    pub abbrev_file: String,
}

/// Platform config location: `<config_dir>/etic/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("etic").join("config.toml"))
}

/// Platform data location for the abbreviation file: `<data_dir>/etic`.
pub fn data_home() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("etic"))
}

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "etic", version)]
    #[command(about = "Download '.bib'-ready citations from DOI")]
    pub struct CliConfig {
        /// DOI to resolve, or a full https:// URL used as is
        pub doi: String,

        #[arg(long, help = "Configuration file [default: <config dir>/etic/config.toml]")]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Directory holding the abbreviation file")]
        pub data_dir: Option<PathBuf>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }
}
