//! Storage for the document store
//!
//! `prepare` makes sure the database file exists before the first load;
//! `document_store` owns the in-memory collections and rewrites the file.

pub mod document_store;
pub mod prepare;
