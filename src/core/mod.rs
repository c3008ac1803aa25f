pub mod abbreviation_store;
pub mod abbreviator;
pub mod normalizer;
pub mod resolver;

pub use crate::domain::model::{AbbreviationTable, CitationRecord, Resolved};
pub use crate::domain::ports::{CitationSource, Storage};
pub use crate::utils::error::Result;
