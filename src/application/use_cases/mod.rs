mod combine;
mod normalize;
mod pairing;
mod rerank_cross_modal;
mod rerank_text;
mod select;

pub use combine::*;
pub use normalize::*;
pub use pairing::*;
pub use rerank_cross_modal::*;
pub use rerank_text::*;
pub use select::*;
