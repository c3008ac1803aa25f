use crate::domain::model::{CitationRecord, FieldValue};
use crate::utils::error::{EticError, Result};
use biblatex::{Bibliography, ChunksExt, Field, ParseError, RawBibliography, RawChunk};

/// Month macros every BibTeX style defines.
const MONTH_MACROS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Parses BibTeX text and returns its first entry.
///
/// Each field keeps its source text for output and its resolved text for
/// abbreviation and key synthesis.
pub fn parse_first_entry(content: &str) -> Result<CitationRecord> {
    let raw = RawBibliography::parse(content).map_err(parse_error)?;
    let first = raw
        .entries
        .first()
        .map(|entry| entry.v.clone())
        .ok_or(EticError::NoEntriesError)?;

    let bibliography = Bibliography::from_raw(raw).map_err(parse_error)?;
    let entry = bibliography
        .get(first.key.v)
        .ok_or(EticError::NoEntriesError)?;

    let mut record = CitationRecord::new(entry.entry_type.to_string(), first.key.v);
    for pair in &first.fields {
        let name = pair.key.v.to_ascii_lowercase();
        let text = entry
            .fields
            .get(&name)
            .map(|chunks| chunks.format_verbatim())
            .unwrap_or_default();
        let value = match raw_source(&pair.value.v) {
            Some(source) => FieldValue::new(source, text),
            None => FieldValue::from_text(text),
        };
        record.insert_value(name, value);
    }
    Ok(record)
}

fn parse_error(e: ParseError) -> EticError {
    EticError::BibtexParseError {
        message: e.to_string(),
    }
}

/// Source form of a field value, `#` concatenation included. `None` when the
/// value uses a `@string` macro, which the output would not define.
fn raw_source(field: &Field) -> Option<String> {
    let parts = field
        .iter()
        .map(|chunk| match chunk.v {
            RawChunk::Normal(s) => Some(format!("{{{}}}", s)),
            RawChunk::Abbreviation(s) => MONTH_MACROS
                .contains(&s.to_ascii_lowercase().as_str())
                .then(|| s.to_string()),
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(" # "))
}

/// Writes the record as a single BibTeX entry: fields in key order, one per
/// line, indented by one space.
pub fn to_bibtex(record: &CitationRecord) -> String {
    let fields: Vec<String> = record
        .fields
        .iter()
        .map(|(name, value)| format!(" {} = {}", name, value.raw))
        .collect();

    let mut out = format!("@{}{{{}", record.entry_type.to_lowercase(), record.key);
    if !fields.is_empty() {
        out.push_str(",\n");
        out.push_str(&fields.join(",\n"));
    }
    out.push_str("\n}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const CROSSREF: &str = "@article{Smith_2020, title={Testing Things}, volume={12}, \
        journal={Journal of Testing}, publisher={Test Press}, \
        author={Smith, John and Doe, Jane}, year={2020}, pages={1--10} }";

    #[test]
    fn test_parse_first_entry() {
        let record = parse_first_entry(CROSSREF).unwrap();

        assert_eq!(record.entry_type, "article");
        assert_eq!(record.key, "Smith_2020");
        assert_eq!(record.get("journal"), Some("Journal of Testing"));
        assert_eq!(record.get("year"), Some("2020"));
        assert!(record.get("author").unwrap().starts_with("Smith, John"));
    }

    #[test]
    fn test_parse_without_entries_fails() {
        assert!(matches!(
            parse_first_entry("no bibtex here"),
            Err(EticError::NoEntriesError) | Err(EticError::BibtexParseError { .. })
        ));
    }

    #[test]
    fn test_to_bibtex_layout() {
        let record = CitationRecord::new("article", "smith2020jt")
            .with_field("year", "2020")
            .with_field("author", "Smith, John")
            .with_field("month", "jan");

        assert_eq!(
            to_bibtex(&record),
            "@article{smith2020jt,\n author = {Smith, John},\n month = {jan},\n year = {2020}\n}\n"
        );
    }

    #[test]
    fn test_markup_survives_reserialization() {
        let record = parse_first_entry(
            "@article{Smith_2020, title={{DNA} sequencing of $\\alpha$ helices {\\&} more}, \
             journal={Physics {\\&} Chemistry of Liquids}, note = {50\\% off}, \
             pages={1--10}, month=jan, year=2020}",
        )
        .unwrap();

        assert_eq!(record.get("journal"), Some("Physics & Chemistry of Liquids"));
        assert_eq!(record.raw("month"), Some("jan"));

        let out = to_bibtex(&record);
        assert!(out.contains("\n journal = {Physics {\\&} Chemistry of Liquids},\n"));
        assert!(out.contains("\n title = {{DNA} sequencing of $\\alpha$ helices {\\&} more},\n"));
        assert!(out.contains("\n note = {50\\% off},\n"));
        assert!(out.contains("\n pages = {1--10},\n"));
        assert!(out.contains("\n month = jan,\n"));
        assert!(out.contains("\n year = {2020}\n"));
    }

    #[test]
    fn test_string_macros_are_expanded() {
        let record = parse_first_entry(
            "@string{prl = \"Physical Review Letters\"}\n\
             @article{x, journal = prl, month = feb # \" 1\"}",
        )
        .unwrap();

        assert_eq!(record.raw("journal"), Some("{Physical Review Letters}"));
        assert_eq!(record.raw("month"), Some("feb # { 1}"));
    }

    #[test]
    fn test_to_bibtex_without_fields() {
        let record = CitationRecord::new("misc", "unknownxxxx");
        assert_eq!(to_bibtex(&record), "@misc{unknownxxxx\n}\n");
    }
}
