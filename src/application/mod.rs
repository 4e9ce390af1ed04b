//! # Application Layer
//!
//! Pipeline stages and orchestration coordinating domain models and
//! connector adapters.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
