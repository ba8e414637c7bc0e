use futures::future::BoxFuture;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Outcome of a completed recognition run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    /// SMILES string for the recognized structure (never empty)
    Smiles(String),
    /// The engine ran cleanly but found no structure
    NotRecognized,
}

/// Why a recognition run produced no answer
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("recognition timed out after {0:?}")]
    Timeout(Duration),

    #[error("recognition engine not found: {0}")]
    EngineNotFound(String),

    #[error("recognition engine failed: {0}")]
    EngineFailure(String),

    #[error("failed to stage image for recognition: {0}")]
    Artifact(#[from] std::io::Error),
}

impl RecognitionError {
    /// Engine-side failures that callers treat as "nothing recognized"
    pub fn is_soft(&self) -> bool {
        !matches!(self, RecognitionError::Artifact(_))
    }
}

/// Trait that all structure recognition engines must implement
pub trait StructureEngine: Send + Sync {
    /// Returns the engine identifier (e.g., "osra")
    fn name(&self) -> &'static str;

    /// Human-readable location of the engine (executable path, URL, ...)
    fn location(&self) -> String;

    /// Recognize the structure drawn in the image file at `path`
    fn recognize<'a>(
        &'a self,
        path: &'a Path,
    ) -> BoxFuture<'a, Result<Recognition, RecognitionError>>;

    /// Check whether the engine can currently be invoked
    fn is_available(&self) -> BoxFuture<'_, bool>;
}
