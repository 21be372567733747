// Mention pipeline: ingestion, processing, storage and the import runner

pub mod ingestion;
pub mod processing;
pub mod runner;
pub mod seed;
pub mod storage;

pub use processing::{MentionProcessor, RawMention};
pub use runner::{run_import, store_processed, ImportReport};
