//! # Masterblog Infrastructure
//!
//! Concrete implementations of the ports defined in `masterblog-core`.
//!
//! - [`JsonFileStore`] - durable storage in a single JSON file
//! - [`InMemoryPostStore`] - process-local storage for tests and throwaway runs

pub mod store;

pub use store::{InMemoryPostStore, JsonFileStore};
