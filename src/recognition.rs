//! Recognition adapter
//!
//! Stages the canonical image in a uniquely-named temporary PNG, hands its path
//! to the engine and removes the file when the call returns. The file is owned
//! by a [`NamedTempFile`], so removal also happens on timeout, on error and when
//! the request future is cancelled. Encoding and writing the PNG run on the
//! blocking pool.

use crate::engine::{Recognition, RecognitionError, StructureEngine};
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::{self, Cursor, Write};
use tempfile::NamedTempFile;

/// Run one recognition attempt on a normalized image
pub async fn recognize(
    engine: &dyn StructureEngine,
    image: &GrayImage,
) -> Result<Recognition, RecognitionError> {
    let canonical = image.clone();
    let artifact = tokio::task::spawn_blocking(move || stage(canonical))
        .await
        .map_err(|e| RecognitionError::Artifact(io::Error::other(e)))??;

    tracing::info!(
        "Running {} on {} ({}x{})",
        engine.name(),
        artifact.path().display(),
        image.width(),
        image.height()
    );

    let result = engine.recognize(artifact.path()).await;

    if let Err(e) = artifact.close() {
        tracing::warn!("Failed to remove recognition artifact: {}", e);
    }

    result
}

/// Write the image to a fresh temporary PNG
fn stage(image: GrayImage) -> Result<NamedTempFile, RecognitionError> {
    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| RecognitionError::Artifact(io::Error::other(e)))?;

    let mut artifact = tempfile::Builder::new()
        .prefix("molecule-")
        .suffix(".png")
        .tempfile()?;
    artifact.write_all(&png)?;
    artifact.flush()?;

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{BoxFuture, FutureExt};
    use image::Luma;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Engine double that records the artifact path it was given
    struct ScriptedEngine {
        outcome: fn() -> Result<Recognition, RecognitionError>,
        seen: Mutex<Option<PathBuf>>,
        saw_readable_png: Mutex<bool>,
    }

    impl ScriptedEngine {
        fn new(outcome: fn() -> Result<Recognition, RecognitionError>) -> Self {
            Self {
                outcome,
                seen: Mutex::new(None),
                saw_readable_png: Mutex::new(false),
            }
        }

        fn seen_path(&self) -> PathBuf {
            self.seen.lock().unwrap().clone().expect("engine was not called")
        }
    }

    impl StructureEngine for ScriptedEngine {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn location(&self) -> String {
            "memory".to_string()
        }

        fn recognize<'a>(
            &'a self,
            path: &'a Path,
        ) -> BoxFuture<'a, Result<Recognition, RecognitionError>> {
            async move {
                *self.seen.lock().unwrap() = Some(path.to_path_buf());
                *self.saw_readable_png.lock().unwrap() = image::open(path).is_ok();
                (self.outcome)()
            }
            .boxed()
        }

        fn is_available(&self) -> BoxFuture<'_, bool> {
            async { true }.boxed()
        }
    }

    fn canonical_image() -> GrayImage {
        GrayImage::from_fn(420, 400, |x, _| Luma([if x == 200 { 0 } else { 255 }]))
    }

    #[tokio::test]
    async fn test_artifact_removed_after_success() {
        let engine = ScriptedEngine::new(|| Ok(Recognition::Smiles("CCO".to_string())));

        let result = recognize(&engine, &canonical_image()).await.unwrap();

        assert_eq!(result, Recognition::Smiles("CCO".to_string()));
        assert!(*engine.saw_readable_png.lock().unwrap());
        let path = engine.seen_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_artifact_removed_after_not_recognized() {
        let engine = ScriptedEngine::new(|| Ok(Recognition::NotRecognized));

        let result = recognize(&engine, &canonical_image()).await.unwrap();

        assert_eq!(result, Recognition::NotRecognized);
        assert!(!engine.seen_path().exists());
    }

    #[tokio::test]
    async fn test_artifact_removed_after_engine_error() {
        let engine = ScriptedEngine::new(|| {
            Err(RecognitionError::EngineFailure("exit status 1".to_string()))
        });

        let err = recognize(&engine, &canonical_image()).await.unwrap_err();

        assert!(err.is_soft());
        assert!(!engine.seen_path().exists());
    }

    #[tokio::test]
    async fn test_artifact_removed_after_timeout() {
        let engine =
            ScriptedEngine::new(|| Err(RecognitionError::Timeout(Duration::from_secs(30))));

        let err = recognize(&engine, &canonical_image()).await.unwrap_err();

        assert!(matches!(err, RecognitionError::Timeout(_)));
        assert!(!engine.seen_path().exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_calls_use_distinct_artifacts() {
        let first = ScriptedEngine::new(|| Ok(Recognition::NotRecognized));
        let second = ScriptedEngine::new(|| Ok(Recognition::NotRecognized));
        let image = canonical_image();

        let (a, b) = futures::join!(recognize(&first, &image), recognize(&second, &image));
        a.unwrap();
        b.unwrap();

        assert_ne!(first.seen_path(), second.seen_path());
        assert!(*first.saw_readable_png.lock().unwrap());
        assert!(!first.seen_path().exists() && !second.seen_path().exists());
    }
}
