use crate::config::Config;
use crate::engine::{Recognition, StructureEngine};
use crate::engines;
use crate::error::MoleculeError;
use crate::loader;
use crate::preprocessing::{NormalizedImage, Pipeline};
use crate::recognition;
use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shown when the engine finds nothing or cannot run
const NOT_RECOGNIZED_MESSAGE: &str = "Could not recognize molecular structure. Make sure the image contains a clear chemical structure diagram.";

/// Formats the loader accepts, by MIME type
const SUPPORTED_FORMATS: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/tiff",
];

/// Shared application state (read-only across requests)
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn StructureEngine>,
    pub config: Arc<Config>,
}

/// Molecule analysis response
#[derive(Serialize, Debug)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeResponse {
    fn recognized(smiles: String) -> Self {
        Self {
            success: true,
            smiles: Some(smiles),
            error: None,
        }
    }

    fn not_recognized() -> Self {
        Self {
            success: false,
            smiles: None,
            error: Some(NOT_RECOGNIZED_MESSAGE.to_string()),
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub osra_available: bool,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub engine: String,
    pub engine_location: String,
    pub recognition_timeout_secs: u64,
    pub supported_formats: Vec<String>,
    pub max_file_size_bytes: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let engine = engines::from_config(&config);
    let addr = format!("{}:{}", config.host, config.port);

    if engine.is_available().await {
        tracing::info!("OSRA is installed and ready");
    } else {
        tracing::warn!(
            "OSRA not available at '{}'; requests will report no structure until it is installed",
            engine.location()
        );
    }

    let app = router(AppState {
        engine,
        config: Arc::new(config),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let max_file_size = state.config.max_file_size;

    Router::new()
        .route("/analyze-molecule", post(handle_analyze))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn a handler panic into the generic JSON server error
fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    MoleculeError::Internal("unexpected failure while handling request".to_string()).into_response()
}

/// Handle molecule analysis requests
async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, MoleculeError> {
    let start = Instant::now();

    let max_file_size = state.config.max_file_size;
    let mut image_data: Option<Bytes> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Failed to parse multipart", max_file_size))?
    {
        if field.name() == Some("image") {
            image_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, "Failed to read image data", max_file_size))?,
            );
        }
    }

    let data = image_data.ok_or(MoleculeError::MissingImage)?;

    let normalized = normalize(data).await?;

    let response = match recognition::recognize(state.engine.as_ref(), &normalized.image).await {
        Ok(Recognition::Smiles(smiles)) => {
            tracing::info!("Recognized SMILES: {}", smiles);
            AnalyzeResponse::recognized(smiles)
        }
        Ok(Recognition::NotRecognized) => {
            tracing::info!("No structure recognized");
            AnalyzeResponse::not_recognized()
        }
        Err(e) if e.is_soft() => {
            tracing::warn!("Recognition failed: {}", e);
            AnalyzeResponse::not_recognized()
        }
        Err(e) => return Err(MoleculeError::Internal(e.to_string())),
    };

    tracing::info!(
        "Analysis completed in {}ms (normalization: {}ms over {} steps)",
        start.elapsed().as_millis(),
        normalized.total_time_ms,
        normalized.steps.len()
    );

    Ok(Json(response))
}

/// The body limit trips inside the multipart reader; report it as an oversize upload
fn multipart_error(e: MultipartError, context: &str, max_file_size: usize) -> MoleculeError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MoleculeError::ImageTooLarge { max: max_file_size }
    } else {
        MoleculeError::InvalidRequest(format!("{}: {}", context, e))
    }
}

/// Decode and normalize on the blocking pool; a panic there becomes a 500
async fn normalize(data: Bytes) -> Result<NormalizedImage, MoleculeError> {
    tokio::task::spawn_blocking(move || -> Result<NormalizedImage, MoleculeError> {
        let raster = loader::load(&data)?;
        Ok(Pipeline::new().process(raster))
    })
    .await
    .map_err(|e| MoleculeError::Internal(format!("Image normalization aborted: {}", e)))?
}

/// Handle health check requests
async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Molecule detector backend is running".to_string(),
        osra_available: state.engine.is_available().await,
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: state.engine.name().to_string(),
        engine_location: state.engine.location(),
        recognition_timeout_secs: state.config.recognition_timeout.as_secs(),
        supported_formats: SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect(),
        max_file_size_bytes: state.config.max_file_size,
    })
}
