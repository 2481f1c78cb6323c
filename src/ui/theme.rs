//! Bar geometry, glyph palettes and colors

use console::{Style, Term};

/// Block glyphs from empty to full, eighth-height steps
const UNICODE_GLYPHS: &[char] = &[' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Shade glyphs for terminals without eighth blocks
const LEGACY_GLYPHS: &[char] = &['░', '▒', '▓', '█'];

/// Ordered glyph set used for sub-cell gradient rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// 9 levels: blank plus eight block heights
    #[default]
    Unicode,

    /// 4 levels: light, medium and dark shade plus full block
    Legacy,
}

impl Palette {
    /// Glyphs ordered from empty (index 0) to full (last index)
    pub fn glyphs(self) -> &'static [char] {
        match self {
            Palette::Unicode => UNICODE_GLYPHS,
            Palette::Legacy => LEGACY_GLYPHS,
        }
    }

    /// Number of gradient steps inside one cell
    pub fn sub_steps(self) -> usize {
        self.glyphs().len() - 1
    }

    pub fn empty(self) -> char {
        self.glyphs()[0]
    }

    pub fn full(self) -> char {
        self.glyphs()[self.sub_steps()]
    }
}

/// Bar size in character cells plus the palette that fills it.
///
/// Computed once at startup; terminal resizes are not tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarGeometry {
    width: usize,
    palette: Palette,
}

impl BarGeometry {
    pub fn new(width: usize, palette: Palette) -> Self {
        Self {
            width: width.max(1),
            palette,
        }
    }

    /// A quarter of the current terminal width
    pub fn from_terminal(palette: Palette) -> Self {
        let (_rows, cols) = Term::stdout().size();
        Self::new(cols as usize / 4, palette)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Resolution of the whole bar in sub-cell steps
    pub fn total_steps(&self) -> usize {
        self.width * self.palette.sub_steps()
    }
}

/// Styling for each field of the progress line
#[derive(Debug, Clone)]
pub struct DisplayColors {
    pub bar: Style,
    pub percent: Style,
    pub speed: Style,
    pub eta: Style,
    pub separator: &'static str,
    /// Erases leftovers of a longer previous line
    pub clear_eol: &'static str,
}

impl DisplayColors {
    /// 256-color set: blue bar on a dark blue background, yellow percent,
    /// red speed and purple ETA
    pub fn full() -> Self {
        Self {
            bar: Style::new().color256(26).on_color256(17).force_styling(true),
            percent: Style::new().color256(220).force_styling(true),
            speed: Style::new().color256(160).force_styling(true),
            eta: Style::new().color256(91).force_styling(true),
            separator: "┋",
            clear_eol: "\x1b[K",
        }
    }

    /// No escape sequences at all
    pub fn off() -> Self {
        Self {
            bar: Style::new(),
            percent: Style::new(),
            speed: Style::new(),
            eta: Style::new(),
            separator: "┋",
            clear_eol: "",
        }
    }

    pub fn is_off(&self) -> bool {
        self.clear_eol.is_empty()
    }
}

/// Complete display configuration, built once and passed by reference
#[derive(Debug, Clone)]
pub struct Theme {
    pub geometry: BarGeometry,
    pub colors: DisplayColors,
}

impl Theme {
    pub fn new(geometry: BarGeometry, colors: DisplayColors) -> Self {
        Self { geometry, colors }
    }

    /// Theme for the current terminal.
    ///
    /// `legacy` selects the shade palette and disables color. Color is also
    /// off when stdout does not support it (pipes, `NO_COLOR`).
    pub fn detect(legacy: bool) -> Self {
        let palette = if legacy {
            Palette::Legacy
        } else {
            Palette::Unicode
        };
        let colors = if legacy || !console::colors_enabled() {
            DisplayColors::off()
        } else {
            DisplayColors::full()
        };
        Self::new(BarGeometry::from_terminal(palette), colors)
    }
}
