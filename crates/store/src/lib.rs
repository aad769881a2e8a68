//! File-backed document store for devapi.
//! - Each declared resource owns an ordered collection of JSON object records.
//! - The whole database lives in memory and is rewritten to one JSON file on every mutation.
//! - Records are identified by their `id` field; see [`matching`] for how ids compare.

pub mod errors;
pub mod matching;
pub mod record;
pub mod storage;

pub use errors::StoreError;
pub use record::Record;
pub use storage::document_store::Store;
pub use storage::prepare::{prepare_storage, StorageStatus};
