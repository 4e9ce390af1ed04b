//! # Domain Layer
//!
//! Core models and errors for second-pass reranking.
//! This layer is independent of model runtimes and I/O.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
