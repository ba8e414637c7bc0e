//! Individual normalization steps
//!
//! Pipeline order: flatten, grayscale, invert, suppress, contrast, threshold,
//! denoise, border, resize.

pub mod border;
pub mod contrast;
pub mod denoise;
pub mod flatten;
pub mod grayscale;
pub mod invert;
pub mod resize;
pub mod suppress;
pub mod threshold;
