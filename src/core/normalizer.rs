use crate::adapters::bibtex;
use crate::config::Configuration;
use crate::core::abbreviation_store::AbbreviationStore;
use crate::core::abbreviator::Abbreviator;
use crate::domain::model::{CitationRecord, Resolved};
use crate::domain::ports::Storage;
use crate::utils::error::{EticError, Result};
use regex::Regex;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Post-processes a parsed record into the final citation text.
pub struct Normalizer<S: Storage> {
    store: AbbreviationStore<S>,
    abbreviator: Abbreviator,
}

impl<S: Storage> Normalizer<S> {
    pub fn new(store: AbbreviationStore<S>, abbreviator: Abbreviator) -> Self {
        Self { store, abbreviator }
    }

    /// Adds `shortjournal`, normalizes `month`, rewrites the key and returns
    /// the serialized entry. `record` is updated in place.
    pub async fn normalize(
        &self,
        record: &mut CitationRecord,
        config: &Configuration,
    ) -> Result<Resolved> {
        let mut warnings = Vec::new();

        if let Some(journal) = record.get("journal").map(str::to_string) {
            let abbreviated = self
                .abbreviator
                .abbreviate_journal(&journal, &self.store, config)
                .await;
            warnings.extend(abbreviated.warning);
            apply_short_journal(record, &journal, &abbreviated.title);
        }

        normalize_month(record);
        record.key = generate_key(record)?;
        tracing::debug!("Generated key {}", record.key);

        let bibtex = rewrite_month_lines(&bibtex::to_bibtex(record), &config.month_regex);
        Ok(Resolved { bibtex, warnings })
    }
}

/// Stores the abbreviation as `shortjournal` when it differs from `journal`.
/// Surrounding whitespace does not count as a difference.
pub fn apply_short_journal(record: &mut CitationRecord, journal: &str, abbreviated: &str) {
    if abbreviated.trim() != journal.trim() {
        record.insert("shortjournal", abbreviated);
    }
}

/// Reduces `month` to its lowercase three-letter form.
pub fn normalize_month(record: &mut CitationRecord) {
    if let Some(month) = record.get("month") {
        let short = month_abbreviation(month);
        record.insert("month", short);
    }
}

fn month_abbreviation(month: &str) -> String {
    let month = month.trim();
    if let Ok(n) = month.parse::<usize>() {
        if (1..=12).contains(&n) {
            return MONTHS[n - 1].to_string();
        }
    }
    month.to_lowercase().chars().take(3).collect()
}

/// Builds `{surname}{year}{venue initials}`, e.g. `smith2020jt`.
pub fn generate_key(record: &CitationRecord) -> Result<String> {
    let surname = match record.get("author") {
        Some(authors) => {
            let first_author = authors.split(" and ").next().unwrap_or_default();
            let surname = first_author.split(',').next().unwrap_or_default();
            let surname: String = surname
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if surname.is_empty() {
                return Err(EticError::KeyGenerationError {
                    message: format!("no usable surname in author field '{}'", authors),
                });
            }
            surname
        }
        None => "unknown".to_string(),
    };

    let year = record.get("year").unwrap_or("xxxx").trim();

    let suffix = ["shortjournal", "journal", "publisher"]
        .iter()
        .find_map(|field| record.get(field))
        .map(key_from_phrase)
        .unwrap_or_default();

    Ok(format!("{}{}{}", surname, year, suffix))
}

/// Lowercased first letters of each word: `"J. Test."` → `"jt"`. Words
/// without a letter or digit, such as `&`, contribute nothing.
pub fn key_from_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Rewrites each line matched by `month_regex` as `  month = jan,`, keeping
/// the trailing comma only if the line had one.
pub fn rewrite_month_lines(text: &str, month_regex: &Regex) -> String {
    text.trim()
        .lines()
        .map(|line| match month_regex.captures(line).and_then(|c| c.get(1)) {
            Some(month) => {
                let short = month_abbreviation(month.as_str());
                if line.trim_end().ends_with(',') {
                    format!("  month = {},", short)
                } else {
                    format!("  month = {}", short)
                }
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month_regex() -> Regex {
        Regex::new(r"^\s*month\s*=\s*\{?(\w+)\}?,?\s*$").unwrap()
    }

    #[test]
    fn test_generate_key_from_author_year_and_shortjournal() {
        let record = CitationRecord::new("article", "Smith_2020")
            .with_field("author", "Smith, John and Doe, Jane")
            .with_field("year", "2020")
            .with_field("journal", "Journal of Testing")
            .with_field("shortjournal", "J. Test.");

        assert_eq!(key_from_phrase("J. Test."), "jt");
        assert_eq!(key_from_phrase("Phys. & Chem. (Liq.)"), "pcl");
        assert_eq!(generate_key(&record).unwrap(), "smith2020jt");
    }

    #[test]
    fn test_generate_key_falls_back_through_venues() {
        let record = CitationRecord::new("book", "x")
            .with_field("author", "Knuth, Donald E.")
            .with_field("year", "1997")
            .with_field("publisher", "Addison Wesley");
        assert_eq!(generate_key(&record).unwrap(), "knuth1997aw");

        let record = CitationRecord::new("misc", "x").with_field("journal", "Physical Review");
        assert_eq!(generate_key(&record).unwrap(), "unknownxxxxpr");

        let record = CitationRecord::new("misc", "x");
        assert_eq!(generate_key(&record).unwrap(), "unknownxxxx");
    }

    #[test]
    fn test_generate_key_rejects_empty_author() {
        let record = CitationRecord::new("misc", "x").with_field("author", " , Jane");
        assert!(matches!(
            generate_key(&record),
            Err(EticError::KeyGenerationError { .. })
        ));
    }

    #[test]
    fn test_normalize_month() {
        let mut record = CitationRecord::new("article", "x").with_field("month", "January");
        normalize_month(&mut record);
        assert_eq!(record.get("month"), Some("jan"));

        let mut record = CitationRecord::new("article", "x").with_field("month", "9");
        normalize_month(&mut record);
        assert_eq!(record.get("month"), Some("sep"));

        let mut record = CitationRecord::new("article", "x");
        normalize_month(&mut record);
        assert!(!record.contains("month"));
    }

    #[test]
    fn test_rewrite_month_lines_keeps_comma_policy() {
        let regex = month_regex();
        let text = "@article{x,\n month = {January},\n year = {2020}\n}\n";
        assert_eq!(
            rewrite_month_lines(text, &regex),
            "@article{x,\n  month = jan,\n year = {2020}\n}"
        );

        let text = "@article{x,\n author = {A},\n month = {jan}\n}";
        assert_eq!(
            rewrite_month_lines(text, &regex),
            "@article{x,\n author = {A},\n  month = jan\n}"
        );
    }

    #[test]
    fn test_short_journal_only_when_different() {
        let mut record = CitationRecord::new("article", "x").with_field("journal", "Nature");
        apply_short_journal(&mut record, "Nature", "Nature");
        assert!(!record.contains("shortjournal"));

        apply_short_journal(&mut record, "Nature ", "Nature");
        assert!(!record.contains("shortjournal"));

        apply_short_journal(&mut record, "Journal of Testing", "J. Test.");
        assert_eq!(record.get("shortjournal"), Some("J. Test."));
        assert_eq!(record.get("journal"), Some("Nature"));
    }
}
