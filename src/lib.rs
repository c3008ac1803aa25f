pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::DoiFetcher, storage::LocalStorage};
pub use crate::config::{Configuration, TomlConfig};
pub use crate::core::{
    abbreviation_store::AbbreviationStore, abbreviator::Abbreviator, normalizer::Normalizer,
    resolver::Resolver,
};
pub use utils::error::{EticError, Result};
