//! # Masterblog Shared
//!
//! Wire types exchanged between the post service and its clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
