use crate::loader::RasterImage;
use image::GrayImage;
use serde::Serialize;
use std::time::Instant;

use super::steps;

/// Timing information for a single normalization step
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: &'static str,
    pub time_ms: u64,
}

/// Canonical binary image plus timing stats
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedImage {
    /// Black-on-white luminance image, every pixel 0 or 255 (not serialized)
    #[serde(skip)]
    pub image: GrayImage,
    /// Total normalization time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// The fixed nine-step normalization chain
///
/// Every step consumes the previous step's output; none can be skipped or
/// reordered.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pipeline;

impl Pipeline {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a decoded upload into a canonical binary image
    pub fn process(&self, raster: RasterImage) -> NormalizedImage {
        let start = Instant::now();
        let mut timings = Vec::with_capacity(9);

        let rgb = run_step("flatten", raster, &mut timings, steps::flatten::apply);
        let gray = run_step("grayscale", rgb, &mut timings, steps::grayscale::apply);
        let gray = run_step("invert", gray, &mut timings, steps::invert::apply);
        let gray = run_step("suppress", gray, &mut timings, steps::suppress::apply);
        let gray = run_step("contrast", gray, &mut timings, steps::contrast::apply);
        let binary = run_step("threshold", gray, &mut timings, steps::threshold::apply);
        let binary = run_step("denoise", binary, &mut timings, steps::denoise::apply);
        let binary = run_step("border", binary, &mut timings, steps::border::apply);
        let binary = run_step("resize", binary, &mut timings, steps::resize::apply);

        let total_time_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(
            "Normalized to {}x{} in {}ms ({})",
            binary.width(),
            binary.height(),
            total_time_ms,
            timings
                .iter()
                .map(|t| format!("{}={}ms", t.name, t.time_ms))
                .collect::<Vec<_>>()
                .join(", ")
        );

        NormalizedImage {
            image: binary,
            total_time_ms,
            steps: timings,
        }
    }
}

fn run_step<I, O, F>(name: &'static str, input: I, timings: &mut Vec<StepTiming>, step_fn: F) -> O
where
    F: FnOnce(I) -> O,
{
    let step_start = Instant::now();
    let output = step_fn(input);
    timings.push(StepTiming {
        name,
        time_ms: step_start.elapsed().as_millis() as u64,
    });
    output
}
