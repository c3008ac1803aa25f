use crate::config::Configuration;
use crate::core::abbreviation_store::AbbreviationStore;
use crate::domain::model::{AbbreviationTable, Abbreviated};
use crate::domain::ports::Storage;
use std::collections::HashSet;

/// Words passed through without a table lookup.
pub const DEFAULT_IGNORE_WORDS: &[&str] = &[
    "of", "and", "in", "at", "on", "the", "&", "für", "ab", "um",
];

/// Table value meaning "keep the word as it is".
pub const NO_ABBREVIATION: &str = "n.a.";

/// Single-word titles shorter than this are returned untouched.
const SHORT_TITLE_CHARS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    words: HashSet<String>,
}

impl IgnoreList {
    pub fn new<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().map(str::to_lowercase).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_WORDS.iter().copied())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Abbreviator {
    ignore: IgnoreList,
}

impl Abbreviator {
    pub fn new(ignore: IgnoreList) -> Self {
        Self { ignore }
    }

    pub fn from_config(config: &Configuration) -> Self {
        Self::new(config.ignore_words.clone())
    }

    /// Abbreviates `title` word by word against `table`. Anything after the
    /// first colon is dropped.
    pub fn abbreviate(&self, title: &str, table: &AbbreviationTable) -> String {
        let head = title.split(':').next().unwrap_or_default();
        let words: Vec<&str> = head.split_whitespace().collect();

        if words.len() == 1 && words[0].chars().count() < SHORT_TITLE_CHARS {
            return head.to_string();
        }

        words
            .iter()
            .map(|word| self.abbreviate_word(word, table))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn abbreviate_word(&self, word: &str, table: &AbbreviationTable) -> String {
        let lower = word.to_lowercase();

        if !self.ignore.contains(&lower) {
            if let Some(abbreviation) = table.lookup(&lower) {
                return if abbreviation == NO_ABBREVIATION {
                    capitalize(&lower)
                } else {
                    capitalize(abbreviation)
                };
            }
        }

        if is_all_uppercase(word) {
            word.to_string()
        } else {
            capitalize(word)
        }
    }

    /// Loads the table through `store` and abbreviates `title`. A table that
    /// cannot be loaded degrades to the unabbreviated title plus a warning.
    pub async fn abbreviate_journal<S: Storage>(
        &self,
        title: &str,
        store: &AbbreviationStore<S>,
        config: &Configuration,
    ) -> Abbreviated {
        match store.ensure_table(&config.abbrev_file, config).await {
            Ok(table) => Abbreviated {
                title: self.abbreviate(title, &table),
                warning: None,
            },
            Err(e) => {
                let warning = format!("Warning: Abbreviation data could not be loaded: {}", e);
                tracing::debug!("Falling back to the unabbreviated title: {:?}", e);
                Abbreviated {
                    title: title.to_string(),
                    warning: Some(warning),
                }
            }
        }
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// True when the word has at least one cased letter and no lowercase ones.
fn is_all_uppercase(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}
