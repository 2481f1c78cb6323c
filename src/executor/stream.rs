//! Chunked stream copy with live progress

use crate::types::metrics::{bytes_per_sec, format_rounded, percentage, MIB};
use crate::types::{CopyError, Eta};
use crate::ui::ProgressRenderer;
use std::fmt;
use std::io::{self, ErrorKind, Read, Write};
use std::time::{Duration, Instant};
use tracing::debug;

/// 8 MiB: keeps the bar responsive on local disks
pub const LOCAL_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// 64 MiB: fewer round trips on network mounts
pub const NETWORK_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Largest accepted `--chunk-size`, 1 GiB
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024 * 1024;

/// Speed and percentage refresh (12.5 Hz)
pub const DISPLAY_INTERVAL: Duration = Duration::from_millis(80);

/// ETA refresh
pub const ETA_INTERVAL: Duration = Duration::from_secs(1);

/// Monotonic time source, as an offset from an arbitrary origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Outcome of one stream copy
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    /// Bytes actually written to the destination
    pub bytes_copied: u64,
    /// Number of non-empty chunks moved
    pub chunks: u64,
    pub elapsed: Duration,
    /// Speed from the last display sample, zero if none was taken
    pub bytes_per_sec: f64,
}

/// Per-copy bookkeeping. Times are offsets from the session start.
#[derive(Debug)]
struct TransferSession {
    total: u64,
    copied: u64,
    chunks: u64,
    started: Duration,
    last_display: Duration,
    next_display: Duration,
    next_eta: Duration,
    copied_at_display: u64,
    speed: f64,
    eta: Eta,
    drawn: bool,
}

impl TransferSession {
    fn new(total: u64, started: Duration) -> Self {
        Self {
            total,
            copied: 0,
            chunks: 0,
            started,
            last_display: Duration::ZERO,
            next_display: DISPLAY_INTERVAL,
            next_eta: ETA_INTERVAL,
            copied_at_display: 0,
            speed: 0.0,
            eta: Eta::default(),
            drawn: false,
        }
    }

    fn record(&mut self, bytes: u64) {
        self.copied += bytes;
        self.chunks += 1;
    }

    fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.started)
    }

    fn percent(&self) -> f64 {
        percentage(self.copied, self.total)
    }

    fn speed_mib(&self) -> f64 {
        self.speed / MIB
    }

    /// Refresh the speed if the display cadence is due
    fn sample_display(&mut self, elapsed: Duration) -> bool {
        if elapsed < self.next_display {
            return false;
        }
        let window = elapsed.saturating_sub(self.last_display);
        self.speed = bytes_per_sec(self.copied - self.copied_at_display, window);
        self.copied_at_display = self.copied;
        self.last_display = elapsed;
        self.next_display = elapsed + DISPLAY_INTERVAL;
        true
    }

    /// Refresh the ETA if the ETA cadence is due. A zero speed keeps the
    /// previous estimate.
    fn sample_eta(&mut self, elapsed: Duration) -> bool {
        if elapsed < self.next_eta {
            return false;
        }
        let remaining = self.total.saturating_sub(self.copied);
        if let Some(eta) = Eta::estimate(remaining, self.speed) {
            self.eta = eta;
        }
        self.next_eta = elapsed + ETA_INTERVAL;
        true
    }
}

/// Copies a byte stream in fixed-size chunks and draws progress to `out`.
///
/// One chunk is read and written in full before the next read; memory use
/// is bounded by the chunk size.
pub struct StreamCopier<'a, O: Write, C: Clock = MonotonicClock> {
    renderer: &'a ProgressRenderer,
    out: O,
    chunk_size: usize,
    clock: C,
}

impl<'a, O: Write> StreamCopier<'a, O, MonotonicClock> {
    pub fn new(renderer: &'a ProgressRenderer, out: O, chunk_size: usize) -> Self {
        Self {
            renderer,
            out,
            chunk_size: chunk_size.max(1),
            clock: MonotonicClock::new(),
        }
    }
}

impl<'a, O: Write, C: Clock> StreamCopier<'a, O, C> {
    /// Replace the time source
    pub fn with_clock<C2: Clock>(self, clock: C2) -> StreamCopier<'a, O, C2> {
        StreamCopier {
            renderer: self.renderer,
            out: self.out,
            chunk_size: self.chunk_size,
            clock,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn into_output(self) -> O {
        self.out
    }

    /// Print a status line to the progress output
    pub fn println(&mut self, line: impl fmt::Display) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            debug!(error = %e, "failed to write status line");
        }
    }

    /// Copy everything from `src` to `dst`.
    ///
    /// `total` drives the percentage and ETA only; it is not checked
    /// against the real stream length. Any read or write error aborts the
    /// copy.
    pub fn copy<R: Read, W: Write>(
        &mut self,
        mut src: R,
        mut dst: W,
        total: u64,
    ) -> Result<TransferReport, CopyError> {
        debug!(total, chunk_size = self.chunk_size, "starting stream copy");

        let mut session = TransferSession::new(total, self.clock.now());
        if let Err(e) = self.pump(&mut src, &mut dst, &mut session) {
            if session.drawn {
                // leave the partial bar on its own line
                self.println("");
            }
            return Err(e);
        }

        let chunks = session.chunks;
        let elapsed = session.elapsed(self.clock.now());
        self.draw(100.0, &mut session);
        if let Err(e) = self.write_summary(total, elapsed) {
            debug!(error = %e, "failed to write transfer summary");
        }

        debug!(
            bytes = session.copied,
            chunks,
            elapsed_ms = elapsed.as_millis() as u64,
            "stream copy finished"
        );

        Ok(TransferReport {
            bytes_copied: session.copied,
            chunks,
            elapsed,
            bytes_per_sec: session.speed,
        })
    }

    fn pump<R: Read, W: Write>(
        &mut self,
        src: &mut R,
        dst: &mut W,
        session: &mut TransferSession,
    ) -> Result<(), CopyError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(self.chunk_size)
            .map_err(|e| io::Error::new(ErrorKind::OutOfMemory, e))?;
        buffer.resize(self.chunk_size, 0);
        loop {
            let n = fill_chunk(src, &mut buffer)?;
            if n == 0 {
                break;
            }
            dst.write_all(&buffer[..n])?;
            session.record(n as u64);

            let elapsed = session.elapsed(self.clock.now());
            if session.sample_display(elapsed) {
                self.draw(session.percent(), session);
            }
            if session.sample_eta(elapsed) {
                self.draw(session.percent(), session);
            }
        }
        dst.flush()?;
        Ok(())
    }

    // A broken terminal must not abort the data copy.
    fn draw(&mut self, percent: f64, session: &mut TransferSession) {
        session.drawn = true;
        if let Err(e) = self
            .renderer
            .draw(&mut self.out, percent, session.speed_mib(), session.eta)
        {
            debug!(error = %e, "failed to draw progress");
        }
    }

    fn write_summary(&mut self, total: u64, elapsed: Duration) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}MB copied in {}s",
            format_rounded(total as f64 / MIB, 3),
            format_rounded(elapsed.as_secs_f64(), 3)
        )?;
        self.out.flush()
    }
}

/// Read until `buf` is full or the stream ends
fn fill_chunk<R: Read>(src: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
