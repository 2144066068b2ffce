//! Visualization Renderer
//!
//! Turns store updates into drawing calls. The renderer only knows the
//! collaborator traits defined here; the terminal implementation lives in
//! `text_grid`.
//!
//! - **donut**: arc geometry for the lived/remaining donut
//! - **caption**: the alternating centre caption
//! - **visualization**: store subscription, metric recomputation, deferral
//! - **text_grid**: character-grid surface used by the CLI
//!
//! ```text
//! Store notify / resize
//!   → skip if inputs missing
//!   → DerivedMetrics
//!   → TextPanel (weeks, journey)
//!   → ChartSurface (clear, arcs, labels), or defer while size is zero
//! ```

mod caption;
mod donut;
mod text_grid;
mod visualization;

pub use caption::{Caption, CaptionCycle, CaptionPhase};
pub use donut::DonutLayout;
pub use text_grid::{CaptionLines, TextGrid};
pub use visualization::{RenderOutcome, Visualization};

use chrono::NaiveDateTime;

/// Measured size of a drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Not laid out yet
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Which share of life an arc represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    Used,
    Remaining,
}

/// One donut segment
///
/// Angles are radians, clockwise from twelve o'clock, measured around the
/// surface centre.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub slice: Slice,
    pub value: i64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub corner_radius: f64,
    pub color: String,
    /// Pulsing segment matching the current caption
    pub highlighted: bool,
}

impl ArcSegment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Angle lies inside `[start, end)`
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// Text drawn at the surface centre
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
    /// Vertical offset from the centre, in surface units
    pub offset_y: f64,
    pub bold: bool,
}

/// Drawable target for the donut
pub trait ChartSurface {
    fn measured_size(&self) -> Size;
    fn clear(&mut self);
    fn draw_arc(&mut self, arc: &ArcSegment);
    fn draw_label(&mut self, label: &Label);
}

/// Sink for the sentences around the chart
pub trait TextPanel {
    fn show_weeks(&mut self, weeks_lived: i64, weeks_remaining: i64);
    fn show_journey(&mut self, remaining_percentage: i64);
}

/// Source of "now" for metric computation
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
