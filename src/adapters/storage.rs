use crate::domain::ports::Storage;
use crate::utils::error::{EticError, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Storage rooted at the platform data directory (`<data_dir>/etic`).
    pub fn data_home() -> Result<Self> {
        crate::config::data_home()
            .map(Self::new)
            .ok_or_else(|| EticError::ConfigError {
                message: "Could not determine the user data directory".to_string(),
            })
    }
}

impl Storage for LocalStorage {
    fn path_of(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    async fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.path_of(name))?;
        Ok(data)
    }

    async fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        let full_path = self.path_of(name);
        let dir = full_path.parent().unwrap_or(self.base_path.as_path());
        fs::create_dir_all(dir)?;

        // Same directory as the target so the rename cannot cross filesystems.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.flush()?;
        tmp.persist(&full_path).map_err(|e| EticError::IoError(e.error))?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }

    async fn modified_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        let metadata = match fs::metadata(self.path_of(name)) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let modified: DateTime<Local> = metadata.modified()?.into();
        Ok(Some(modified.date_naive()))
    }
}
