//! Drawing-surface capability interface
//!
//! The render loop talks to the display through this small trait so the
//! synthesis core can be exercised headless. The terminal frontend keeps a
//! retained display list behind it; tests and benches use
//! [`HeadlessSurface`], which just records what was asked of it.

use crate::trace_buffer::WaveformPoint;

/// 24-bit display color for the trace and its glow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const EMERALD: Rgb = Rgb(16, 185, 129);
    pub const RED: Rgb = Rgb(239, 68, 68);
    pub const CYAN: Rgb = Rgb(34, 211, 238);
    pub const YELLOW: Rgb = Rgb(250, 204, 21);
    pub const BLUE: Rgb = Rgb(96, 165, 250);
    /// Faint reference-grid line color.
    pub const GRID: Rgb = Rgb(38, 44, 54);
}

/// Minimal drawing capability the render loop needs.
///
/// Coordinates follow canvas convention: origin top-left, y grows downward.
/// Implementations own the mapping to whatever the real display wants.
pub trait Surface {
    /// Surface dimensions in pixels, (width, height).
    fn size(&self) -> (f32, f32);

    /// Wipe everything drawn so far.
    fn clear(&mut self);

    /// Single plain line, used for the reference grid.
    fn draw_line(&mut self, a: WaveformPoint, b: WaveformPoint, color: Rgb);

    /// Stroke the waveform polyline with a glow/halo in the given color.
    fn stroke_trace(&mut self, segments: &[(WaveformPoint, WaveformPoint)], color: Rgb);
}

/// Recording surface for tests and benches: counts calls, retains the last
/// stroked trace, draws nothing.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    width: f32,
    height: f32,
    pub clear_count: usize,
    pub grid_lines: usize,
    pub stroke_count: usize,
    pub last_trace: Vec<(WaveformPoint, WaveformPoint)>,
    pub last_color: Option<Rgb>,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.clear_count += 1;
        self.grid_lines = 0;
        self.last_trace.clear();
    }

    fn draw_line(&mut self, _a: WaveformPoint, _b: WaveformPoint, _color: Rgb) {
        self.grid_lines += 1;
    }

    fn stroke_trace(&mut self, segments: &[(WaveformPoint, WaveformPoint)], color: Rgb) {
        self.stroke_count += 1;
        self.last_trace = segments.to_vec();
        self.last_color = Some(color);
    }
}
