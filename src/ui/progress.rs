//! Progress line rendering

use super::theme::Theme;
use crate::types::Eta;
use std::io::{self, Write};

/// Renders the single-line transfer display.
///
/// Output depends only on the inputs and the theme, so the same triple
/// always produces the same line.
#[derive(Debug, Clone)]
pub struct ProgressRenderer {
    theme: Theme,
}

impl ProgressRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Unstyled bar, exactly `width` glyphs long
    pub fn bar(&self, percent: f64) -> String {
        let geometry = &self.theme.geometry;
        let palette = geometry.palette();
        let sub_steps = palette.sub_steps();
        let width = geometry.width();

        let percent = clamp_percent(percent);
        let filled_steps = (percent * geometry.total_steps() as f64 / 100.0).floor() as usize;
        let mut full_cells = filled_steps / sub_steps;
        let remainder = filled_steps % sub_steps;

        let mut bar = String::with_capacity(width * 3);
        bar.extend(std::iter::repeat(palette.full()).take(full_cells));
        if remainder > 0 && full_cells < width {
            bar.push(palette.glyphs()[remainder]);
            full_cells += 1;
        }
        bar.extend(std::iter::repeat(palette.empty()).take(width.saturating_sub(full_cells)));
        bar
    }

    /// Full progress line without the leading carriage return
    pub fn render_line(&self, percent: f64, speed_mib: f64, eta: Eta) -> String {
        let colors = &self.theme.colors;
        let percent = clamp_percent(percent);
        format!(
            "{bar} {sep} {pct} {sep} {speed} {sep} {eta}{clear}",
            bar = colors.bar.apply_to(self.bar(percent)),
            sep = colors.separator,
            pct = colors.percent.apply_to(format!("{:6.2}%", percent)),
            speed = colors.speed.apply_to(format!("{:6.2}MB/s", speed_mib)),
            eta = colors.eta.apply_to(eta),
            clear = colors.clear_eol,
        )
    }

    /// Overwrite the current terminal line and flush
    pub fn draw<W: Write + ?Sized>(
        &self,
        out: &mut W,
        percent: f64,
        speed_mib: f64,
        eta: Eta,
    ) -> io::Result<()> {
        write!(out, "\r{}", self.render_line(percent, speed_mib, eta))?;
        out.flush()
    }
}

fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}
