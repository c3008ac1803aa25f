// Adapters layer: concrete implementations for external systems (http, bibtex, storage).

pub mod bibtex;
pub mod http;
pub mod storage;
