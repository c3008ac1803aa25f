use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Persistence for the abbreviation source file.
pub trait Storage: Send + Sync {
    fn path_of(&self, name: &str) -> PathBuf;
    fn read_file(&self, name: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Replaces `name` wholesale; readers never observe a partial write.
    fn write_file(
        &self,
        name: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    /// Local date of the last modification, `None` when the file is absent.
    fn modified_date(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<NaiveDate>>> + Send;
}

/// Source of raw BibTeX text for a DOI.
#[async_trait]
pub trait CitationSource: Send + Sync {
    async fn fetch(&self, doi: &str) -> Result<String>;
}
