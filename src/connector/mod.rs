//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Relevance scoring (ONNX cross-encoder, deterministic mock)
//! - Region detection (mock; real detectors plug in via `RegionDetector`)
//! - Content segmentation (overlapping windows)
//! - Image loading (local paths and http(s) URLs)

pub mod adapter;

pub use adapter::*;
