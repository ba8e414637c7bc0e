//! Structure recognition engine implementations
//!
//! Engines implement [`StructureEngine`]; the server only ever talks to the
//! trait object.

pub mod osra;

use crate::config::Config;
use crate::engine::StructureEngine;
use std::sync::Arc;

/// Build the configured recognition engine
///
/// Availability is not checked here: the engine may be installed or removed
/// while the server runs, so callers probe on demand.
pub fn from_config(config: &Config) -> Arc<dyn StructureEngine> {
    tracing::info!(
        "Using OSRA engine at '{}' (timeout: {:?})",
        config.osra_path,
        config.recognition_timeout
    );
    Arc::new(osra::OsraEngine::new(config))
}
