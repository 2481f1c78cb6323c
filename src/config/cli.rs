//! Command-line interface

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Single-dash spellings accepted for compatibility with older scripts
const LEGACY_FLAGS: &[(&str, &str)] = &[("-net", "--net"), ("-old", "--old")];

/// Copy files or directories with a live progress bar
#[derive(Debug, Parser)]
#[command(
    name = "cprog",
    version,
    about,
    override_usage = "cprog <SOURCE> <DESTINATION> [-net] [-old]"
)]
pub struct Cli {
    /// Source file or directory
    pub source: Option<PathBuf>,

    /// Destination file or directory
    pub destination: Option<PathBuf>,

    /// Use the 64 MiB network chunk size
    #[arg(short = 'n', long = "net")]
    pub net: bool,

    /// Plain output: no color and a 4-level shade bar
    #[arg(long = "old")]
    pub old: bool,

    /// Explicit chunk size in bytes, at most 1 GiB (overrides -net and auto-detection)
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Log each copied file
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse `std::env::args_os`, accepting the legacy flag spellings
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_args(std::env::args_os()))
    }

    /// True when both paths were given
    pub fn has_paths(&self) -> bool {
        self.source.is_some() && self.destination.is_some()
    }
}

/// Rewrite `-net`/`-old` into their long forms so clap does not read them
/// as clusters of short flags.
pub fn normalize_legacy_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg == *legacy)
                .map(|(_, modern)| OsString::from(modern))
                .unwrap_or(arg)
        })
        .collect()
}
