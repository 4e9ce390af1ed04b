mod http_image_loader;
mod mock_detector;
mod mock_scorer;
mod ort_scorer;
mod window_segmenter;

pub use http_image_loader::*;
pub use mock_detector::*;
pub use mock_scorer::*;
pub use ort_scorer::*;
pub use window_segmenter::*;
