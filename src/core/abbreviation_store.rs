use crate::config::Configuration;
use crate::domain::model::{AbbreviationEntry, AbbreviationTable};
use crate::domain::ports::Storage;
use crate::utils::error::{EticError, Result};
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use reqwest::{Client, StatusCode};
use std::io::Read;

pub const DEFAULT_ABBREV_FILE: &str = "abbrev.txt.gz";

/// Leading token of the header row in the source file.
const HEADER_TOKEN: &str = "WORD";

/// Keeps the on-disk abbreviation file current and loads it into memory.
pub struct AbbreviationStore<S: Storage> {
    storage: S,
    client: Client,
}

impl<S: Storage> AbbreviationStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_client(storage, Client::new())
    }

    pub fn with_client(storage: S, client: Client) -> Self {
        Self { storage, client }
    }

    /// Downloads `file_name` when it is missing or stale, then parses it.
    /// Failures are returned as-is; nothing is retried.
    pub async fn ensure_table(
        &self,
        file_name: &str,
        config: &Configuration,
    ) -> Result<AbbreviationTable> {
        let target = self.storage.path_of(file_name);

        match self.storage.modified_date(file_name).await? {
            None => {
                tracing::warn!("{} not found; downloading...", target.display());
                self.download(file_name, config).await?;
            }
            Some(modified) if is_stale(modified, config.issn_upd) => {
                tracing::warn!("{} is out of date; redownloading...", target.display());
                self.download(file_name, config).await?;
            }
            Some(modified) => {
                tracing::debug!("{} is current (modified {})", target.display(), modified);
            }
        }

        let raw = self.storage.read_file(file_name).await?;
        let table = parse_table(&raw)?;
        tracing::debug!("Loaded {} abbreviations", table.len());
        Ok(table)
    }

    async fn download(&self, file_name: &str, config: &Configuration) -> Result<()> {
        tracing::debug!("Downloading abbreviations from: {}", config.latest_issn);

        let response = self
            .client
            .get(&config.latest_issn)
            .timeout(config.download_timeout)
            .send()
            .await
            .map_err(|e| EticError::DownloadError {
                message: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            return Err(EticError::DownloadError {
                message: format!("HTTP {}", response.status().as_u16()),
            });
        }

        let data = response.bytes().await.map_err(|e| EticError::DownloadError {
            message: e.to_string(),
        })?;

        self.storage.write_file(file_name, &data).await
    }
}

/// A file modified on or before the threshold date must be replaced.
pub fn is_stale(modified: NaiveDate, threshold: NaiveDate) -> bool {
    modified <= threshold
}

/// Parses the gzip-compressed, UTF-16 source file.
pub fn parse_table(raw: &[u8]) -> Result<AbbreviationTable> {
    let mut decoder = GzDecoder::new(raw);
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| EticError::AbbreviationParseError {
            message: format!("gzip: {}", e),
        })?;

    let text = decode_utf16(&bytes)?;
    Ok(parse_entries(&text)?.into_iter().collect())
}

/// Reads tab-separated rows of `name<TAB>abbreviation<TAB>languages`.
///
/// The header row and rows with fewer than three columns or an empty name or
/// abbreviation are skipped.
pub fn parse_entries(text: &str) -> Result<Vec<AbbreviationEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| EticError::AbbreviationParseError {
            message: e.to_string(),
        })?;

        if record.get(0).is_some_and(|first| first.starts_with(HEADER_TOKEN)) {
            continue;
        }
        if record.len() < 3 {
            continue;
        }

        let name = record[0].trim();
        let abbreviation = record[1].trim();
        if name.is_empty() || abbreviation.is_empty() {
            continue;
        }

        let languages = record[2]
            .trim()
            .split(", ")
            .filter(|lang| !lang.is_empty())
            .map(String::from)
            .collect();

        entries.push(AbbreviationEntry::new(name, abbreviation, languages));
    }

    Ok(entries)
}

/// Decodes UTF-16 honouring a byte-order mark; little-endian without one.
fn decode_utf16(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(EticError::AbbreviationParseError {
            message: "UTF-16 data has an odd number of bytes".to_string(),
        });
    }

    let (body, big_endian) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (rest, true),
        [0xFF, 0xFE, rest @ ..] => (rest, false),
        _ => (bytes, false),
    };

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    String::from_utf16(&units).map_err(|e| EticError::AbbreviationParseError {
        message: format!("utf-16: {}", e),
    })
}
