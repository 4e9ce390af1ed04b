mod content_segmenter;
mod image_loader;
mod region_detector;
mod relevance_scorer;

pub use content_segmenter::*;
pub use image_loader::*;
pub use region_detector::*;
pub use relevance_scorer::*;
