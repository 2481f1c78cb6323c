//! # cprog - File Copy With Progress
//!
//! Copies a file or a directory tree while drawing a block-gradient
//! progress bar with throughput and ETA.
//!
//! The engine streams in fixed-size chunks so memory stays bounded, and
//! redraws on a time cadence rather than per chunk so the terminal is not
//! flooded.

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use executor::{CopyStats, StreamCopier, TransferReport};
pub use types::{CopyError, Eta};
pub use ui::{ProgressRenderer, Theme};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
