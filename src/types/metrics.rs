//! Throughput arithmetic shared by the engine and the renderer

use std::fmt;
use std::time::Duration;

/// Bytes per MiB; all speeds and sizes are displayed in this unit
pub const MIB: f64 = 1_048_576.0;

/// Estimated time remaining, split for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Eta {
    pub minutes: u64,
    pub seconds: u64,
}

impl Eta {
    /// Whole seconds split into minutes and leftover seconds
    pub fn from_secs(total: u64) -> Self {
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    /// ETA for `remaining` bytes at `bytes_per_sec`.
    ///
    /// Returns `None` when the speed is not a positive finite number.
    pub fn estimate(remaining: u64, bytes_per_sec: f64) -> Option<Self> {
        if !bytes_per_sec.is_finite() || bytes_per_sec <= 0.0 {
            return None;
        }
        let secs = (remaining as f64 / bytes_per_sec).floor();
        Some(Self::from_secs(secs as u64))
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

/// Percent complete, clamped to `[0, 100]`. An empty transfer is complete.
pub fn percentage(copied: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (100.0 * copied as f64 / total as f64).clamp(0.0, 100.0)
}

/// Bytes over a time window; zero for an empty window
pub fn bytes_per_sec(bytes: u64, window: Duration) -> f64 {
    let secs = window.as_secs_f64();
    if secs > 0.0 {
        bytes as f64 / secs
    } else {
        0.0
    }
}

/// Round to `places` decimals, drop trailing zeros, keep at least one decimal.
///
/// `17.0`, `0.412`, `1.5`
pub fn format_rounded(value: f64, places: usize) -> String {
    let fixed = format!("{:.*}", places, value);
    match fixed.find('.') {
        Some(dot) => {
            let trimmed = fixed.trim_end_matches('0');
            if trimmed.len() == dot + 1 {
                format!("{}0", trimmed)
            } else {
                trimmed.to_string()
            }
        }
        None => format!("{}.0", fixed),
    }
}
