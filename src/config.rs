use crate::Args;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub osra_path: String,
    pub recognition_timeout: Duration,
    pub probe_timeout: Duration,
    pub max_file_size: usize,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            osra_path: args.osra_path,
            recognition_timeout: Duration::from_secs(args.recognition_timeout),
            probe_timeout: Duration::from_secs(args.probe_timeout),
            max_file_size: args.max_file_size,
        }
    }
}

#[cfg(test)]
impl Config {
    /// Configuration pointing at a specific engine executable, for tests
    pub fn for_engine(osra_path: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            osra_path: osra_path.into(),
            recognition_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(5),
            max_file_size: 20 * 1024 * 1024,
        }
    }
}
