//! Configuration management

mod cli;
pub mod network;

pub use cli::{normalize_legacy_args, Cli};

use crate::executor::{LOCAL_CHUNK_SIZE, MAX_CHUNK_SIZE, NETWORK_CHUNK_SIZE};
use crate::types::CopyError;
use std::path::PathBuf;
use tracing::debug;

/// Run configuration, built once from the command line
#[derive(Debug, Clone)]
pub struct Config {
    /// Source file or directory
    pub source: PathBuf,

    /// Destination file or directory
    pub destination: PathBuf,

    /// Bytes moved per read/write cycle
    pub chunk_size: usize,

    /// Legacy shade palette without color
    pub legacy_display: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            chunk_size: LOCAL_CHUNK_SIZE,
            legacy_display: false,
        }
    }
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), CopyError> {
        if self.chunk_size == 0 {
            return Err(CopyError::Config(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(CopyError::Config(format!(
                "Chunk size must be at most {} bytes, got {}",
                MAX_CHUNK_SIZE, self.chunk_size
            )));
        }

        if self.source.as_os_str().is_empty() || self.destination.as_os_str().is_empty() {
            return Err(CopyError::Config(
                "Source and destination must both be given".to_string(),
            ));
        }

        Ok(())
    }
}

impl TryFrom<Cli> for Config {
    type Error = CopyError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let (Some(source), Some(destination)) = (cli.source, cli.destination) else {
            return Err(CopyError::Config(
                "Source and destination must both be given".to_string(),
            ));
        };

        let chunk_size = match cli.chunk_size {
            Some(size) => size,
            None if cli.net => NETWORK_CHUNK_SIZE,
            None => detect_chunk_size(&source, &destination),
        };

        let config = Config {
            source,
            destination,
            chunk_size,
            legacy_display: cli.old,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Network chunk size when either side looks like a network share
fn detect_chunk_size(source: &std::path::Path, destination: &std::path::Path) -> usize {
    if network::is_network_path(source) || network::is_network_path(destination) {
        debug!("network location detected, using large chunks");
        NETWORK_CHUNK_SIZE
    } else {
        LOCAL_CHUNK_SIZE
    }
}
