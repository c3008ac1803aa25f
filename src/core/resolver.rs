use crate::adapters::bibtex;
use crate::config::Configuration;
use crate::core::normalizer::Normalizer;
use crate::domain::model::Resolved;
use crate::domain::ports::{CitationSource, Storage};
use crate::utils::error::Result;

/// Drives one DOI through fetch, parse and normalization.
pub struct Resolver<C: CitationSource, S: Storage> {
    source: C,
    normalizer: Normalizer<S>,
}

impl<C: CitationSource, S: Storage> Resolver<C, S> {
    pub fn new(source: C, normalizer: Normalizer<S>) -> Self {
        Self { source, normalizer }
    }

    pub async fn resolve(&self, doi: &str, config: &Configuration) -> Result<Resolved> {
        tracing::info!("Resolving {}", doi);

        let content = self.source.fetch(doi).await?;
        tracing::debug!("Fetched {} bytes of BibTeX", content.len());

        let mut record = bibtex::parse_first_entry(&content)?;
        self.normalizer.normalize(&mut record, config).await
    }
}
