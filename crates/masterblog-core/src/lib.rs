//! # Masterblog Core
//!
//! The domain layer of the Masterblog post service: the post entity, input
//! normalization, the post repository, and read-only search and sort.
//! Storage is reached only through the [`ports::PostStore`] trait.

pub mod domain;
pub mod error;
pub mod ports;
pub mod query;
pub mod repository;
pub mod validation;

pub use error::DomainError;
pub use repository::PostRepository;
