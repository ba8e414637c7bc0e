//! OSRA engine implementation
//!
//! Runs the OSRA command-line tool (`osra -f smi <image>`) as a subprocess.
//! OSRA prints `SMILES name` on its first output line; only the SMILES token is
//! kept. Each run is bounded by a hard timeout and the child is killed when the
//! bound is hit.

use crate::config::Config;
use crate::engine::{Recognition, RecognitionError, StructureEngine};
use futures::future::{BoxFuture, FutureExt};
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

/// Spawn attempts while the executable is still open for writing elsewhere
const SPAWN_ATTEMPTS: u32 = 5;
const SPAWN_RETRY_DELAY: Duration = Duration::from_millis(50);

/// OSRA command-line engine
pub struct OsraEngine {
    executable: String,
    timeout: Duration,
    probe_timeout: Duration,
}

impl OsraEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            executable: config.osra_path.clone(),
            timeout: config.recognition_timeout,
            probe_timeout: config.probe_timeout,
        }
    }

    async fn run(&self, path: &Path) -> Result<Recognition, RecognitionError> {
        let mut command = Command::new(&self.executable);
        command
            .args(["-f", "smi"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let child = spawn(&mut command).await.map_err(|e| self.spawn_error(e))?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                RecognitionError::EngineFailure(format!("failed to collect OSRA output: {}", e))
            })?,
            Err(_) => {
                tracing::warn!("OSRA timed out after {:?}", self.timeout);
                return Err(RecognitionError::Timeout(self.timeout));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();

        if !output.status.success() {
            tracing::warn!("OSRA exited with {}, stderr: {}", output.status, stderr);
            return Err(RecognitionError::EngineFailure(format!(
                "OSRA exited with {}",
                output.status
            )));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| {
            RecognitionError::EngineFailure("OSRA output is not valid UTF-8".to_string())
        })?;

        match parse_smiles(&stdout) {
            Some(smiles) => Ok(Recognition::Smiles(smiles)),
            None => {
                if !stderr.is_empty() {
                    tracing::warn!("OSRA found no structure, stderr: {}", stderr);
                }
                Ok(Recognition::NotRecognized)
            }
        }
    }

    async fn probe(&self) -> bool {
        let mut command = Command::new(&self.executable);
        command
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let status = async {
            let mut child = spawn(&mut command).await?;
            child.wait().await
        };

        match tokio::time::timeout(self.probe_timeout, status).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                tracing::debug!("OSRA probe failed to start: {}", e);
                false
            }
            Err(_) => {
                tracing::debug!("OSRA probe timed out after {:?}", self.probe_timeout);
                false
            }
        }
    }

    fn spawn_error(&self, e: io::Error) -> RecognitionError {
        if e.kind() == io::ErrorKind::NotFound {
            tracing::warn!(
                "OSRA not found at '{}'. Install it (e.g. apt-get install osra) or pass --osra-path",
                self.executable
            );
            RecognitionError::EngineNotFound(self.executable.clone())
        } else {
            tracing::warn!("Failed to start OSRA at '{}': {}", self.executable, e);
            RecognitionError::EngineFailure(format!("failed to start OSRA: {}", e))
        }
    }
}

impl StructureEngine for OsraEngine {
    fn name(&self) -> &'static str {
        "osra"
    }

    fn location(&self) -> String {
        self.executable.clone()
    }

    fn recognize<'a>(
        &'a self,
        path: &'a Path,
    ) -> BoxFuture<'a, Result<Recognition, RecognitionError>> {
        self.run(path).boxed()
    }

    fn is_available(&self) -> BoxFuture<'_, bool> {
        self.probe().boxed()
    }
}

/// Start the command, retrying briefly on ETXTBSY (an install or copy of the
/// executable still holds it open for writing)
async fn spawn(command: &mut Command) -> io::Result<Child> {
    let mut attempt = 1;
    loop {
        match command.spawn() {
            Err(e) if e.kind() == io::ErrorKind::ExecutableFileBusy && attempt < SPAWN_ATTEMPTS => {
                tracing::debug!("OSRA executable busy, retrying spawn (attempt {})", attempt);
                attempt += 1;
                tokio::time::sleep(SPAWN_RETRY_DELAY).await;
            }
            result => return result,
        }
    }
}

/// First whitespace-delimited token of OSRA's output
fn parse_smiles(stdout: &str) -> Option<String> {
    stdout.split_whitespace().next().map(str::to_string)
}
