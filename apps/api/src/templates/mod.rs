// Template ingestion and storage: upload, extraction, canonical text, artifact files.

pub mod extractor;
pub mod handlers;
pub mod ingest;
pub mod store;
