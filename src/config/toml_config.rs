use crate::config::Configuration;
use crate::core::abbreviation_store::DEFAULT_ABBREV_FILE;
use crate::core::abbreviator::IgnoreList;
use crate::utils::error::{EticError, Result};
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_URL_BASE: &str = "https://dx.doi.org/";
pub const DEFAULT_ACCEPT: &str = "text/x-bibliography;style=bibtex";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECONDS: u64 = 120;

/// On-disk configuration. Keys are upper-case, e.g. `MONTH_REGEX`.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(rename = "MONTH_REGEX")]
    pub month_regex: String,
    #[serde(rename = "LATEST_ISSN")]
    pub latest_issn: String,
    #[serde(rename = "ISSN_UPD")]
    pub issn_upd: String,
    #[serde(rename = "URL_BASE")]
    pub url_base: Option<String>,
    #[serde(rename = "HEADERS")]
    pub headers: Option<String>,
    #[serde(rename = "TIMEOUT_SECONDS")]
    pub timeout_seconds: Option<u64>,
    #[serde(rename = "DOWNLOAD_TIMEOUT_SECONDS")]
    pub download_timeout_seconds: Option<u64>,
    #[serde(rename = "IGNORE_WORDS")]
    pub ignore_words: Option<Vec<String>>,
    #[serde(rename = "ABBREV_FILE")]
    pub abbrev_file: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(EticError::MissingConfigError {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EticError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EticError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn url_base(&self) -> &str {
        self.url_base.as_deref().unwrap_or(DEFAULT_URL_BASE)
    }

    pub fn accept(&self) -> &str {
        self.headers.as_deref().unwrap_or(DEFAULT_ACCEPT)
    }

    /// Validates every field and produces the runtime configuration.
    pub fn into_configuration(self) -> Result<Configuration> {
        self.validate()?;

        let month_regex = validation::validate_month_regex("MONTH_REGEX", &self.month_regex)?;
        let issn_upd = validation::parse_date("ISSN_UPD", &self.issn_upd)?;
        let ignore_words = match &self.ignore_words {
            Some(words) => IgnoreList::new(words.iter().map(String::as_str)),
            None => IgnoreList::default(),
        };

        Ok(Configuration {
            month_regex,
            latest_issn: self.latest_issn.clone(),
            issn_upd,
            url_base: self.url_base().to_string(),
            accept: self.accept().to_string(),
            timeout: Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            download_timeout: Duration::from_secs(
                self.download_timeout_seconds
                    .unwrap_or(DEFAULT_DOWNLOAD_TIMEOUT_SECONDS),
            ),
            ignore_words,
            abbrev_file: self
                .abbrev_file
                .clone()
                .unwrap_or_else(|| DEFAULT_ABBREV_FILE.to_string()),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("LATEST_ISSN", &self.latest_issn)?;
        validation::validate_url("URL_BASE", self.url_base())?;
        validation::validate_non_empty_string("HEADERS", self.accept())?;
        validation::validate_month_regex("MONTH_REGEX", &self.month_regex)?;
        validation::parse_date("ISSN_UPD", &self.issn_upd)?;

        if let Some(timeout) = self.timeout_seconds {
            validation::validate_positive_number("TIMEOUT_SECONDS", timeout, 1)?;
        }
        if let Some(timeout) = self.download_timeout_seconds {
            validation::validate_positive_number("DOWNLOAD_TIMEOUT_SECONDS", timeout, 1)?;
        }
        if let Some(file) = &self.abbrev_file {
            validation::validate_non_empty_string("ABBREV_FILE", file)?;
        }
        Ok(())
    }
}
