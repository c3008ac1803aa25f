use std::collections::{BTreeMap, HashMap};

/// One row of the abbreviation source file, case-folded at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbbreviationEntry {
    pub name: String,
    pub abbreviation: String,
    /// Parsed from the third column; no matching rule consults it yet.
    pub languages: Vec<String>,
}

impl AbbreviationEntry {
    pub fn new(name: &str, abbreviation: &str, languages: Vec<String>) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            abbreviation: abbreviation.trim().to_lowercase(),
            languages,
        }
    }
}

/// Journal-name → abbreviation lookup table.
///
/// Keys keep the order in which they first appeared in the source file; a
/// repeated key overwrites the earlier value in place. A key ending in `-` is
/// a prefix rule (`int-` matches `international`), anything else must match a
/// word exactly.
///
/// Lookups prefer an exact rule over a prefix rule, and among prefix rules the
/// longest stem. Stems of equal length are tried in file order.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
    // (stem, entry index), longest stem first
    prefixes: Vec<(String, usize)>,
}

impl AbbreviationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, abbreviation: impl Into<String>) {
        let name = name.into();
        let abbreviation = abbreviation.into();

        if let Some(&pos) = self.index.get(&name) {
            self.entries[pos].1 = abbreviation;
            return;
        }

        let pos = self.entries.len();
        if let Some(stem) = name.strip_suffix('-') {
            let at = self
                .prefixes
                .partition_point(|(existing, _)| existing.len() >= stem.len());
            self.prefixes.insert(at, (stem.to_string(), pos));
        }
        self.index.insert(name.clone(), pos);
        self.entries.push((name, abbreviation));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Finds the abbreviation for a single lowercase word.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        if let Some(abbreviation) = self.get(word) {
            return Some(abbreviation);
        }
        self.prefixes
            .iter()
            .find(|(stem, _)| word.starts_with(stem.as_str()))
            .map(|&(_, pos)| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source-file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<AbbreviationEntry> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = AbbreviationEntry>>(iter: I) -> Self {
        let mut table = AbbreviationTable::new();
        for entry in iter {
            table.insert(entry.name, entry.abbreviation);
        }
        table
    }
}

/// A field value in two forms: `raw` is the BibTeX source written back on
/// output (delimiters included, e.g. `{Physics {\&} Chemistry}` or the
/// macro `jan`), `text` is the resolved plain text used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub raw: String,
    pub text: String,
}

impl FieldValue {
    pub fn new(raw: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            text: text.into(),
        }
    }

    /// A value built from plain text: braced, with TeX specials escaped.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            raw: format!("{{{}}}", escape_tex(&text)),
            text,
        }
    }
}

/// Escapes `& % # _` unless already preceded by a backslash.
pub fn escape_tex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        if matches!(c, '&' | '%' | '#' | '_') && prev != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// A single parsed BibTeX entry. Field names are lowercase; the citation key
/// lives in `key` rather than in `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationRecord {
    pub entry_type: String,
    pub key: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl CitationRecord {
    pub fn new(entry_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            key: key.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Plain text of `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|value| value.text.as_str())
    }

    /// BibTeX source of `field`.
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|value| value.raw.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Sets `field` from plain text.
    pub fn insert(&mut self, field: impl Into<String>, text: impl Into<String>) {
        self.insert_value(field, FieldValue::from_text(text));
    }

    pub fn insert_value(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into().to_lowercase(), value);
    }

    pub fn with_field(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }
}

/// A journal title after abbreviation. `warning` is set when the table could
/// not be loaded and `title` is the untouched input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abbreviated {
    pub title: String,
    pub warning: Option<String>,
}

/// Final output of a DOI resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub bibtex: String,
    pub warnings: Vec<String>,
}
