//! Image normalization for structure recognition
//!
//! Turns arbitrary browser captures into canonical black-on-white binary
//! images for the recognition engine.

pub mod pipeline;
pub mod steps;

pub use pipeline::{NormalizedImage, Pipeline, StepTiming};
