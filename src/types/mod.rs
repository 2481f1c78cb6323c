//! Core type definitions for cprog

mod error;
pub mod metrics;

pub use error::CopyError;
pub use metrics::Eta;
