mod candidate;
mod config;
mod detection;
mod hit;
mod query;

pub use candidate::*;
pub use config::*;
pub use detection::*;
pub use hit::*;
pub use query::*;
