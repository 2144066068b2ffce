//! Donut geometry
//!
//! Lays out the used/remaining arcs the way a pie layout without sorting
//! does: values keep their order, the first arc starts at twelve o'clock and
//! the arcs together cover one full turn.

use std::f64::consts::TAU;

use super::{ArcSegment, Label, Size, Slice};
use crate::config::ChartConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct DonutLayout {
    pub radius_ratio: f64,
    pub inner_ratio: f64,
    pub corner_radius: f64,
    pub used_color: String,
    pub remaining_color: String,
}

impl Default for DonutLayout {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

impl DonutLayout {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            radius_ratio: config.radius_ratio,
            inner_ratio: config.inner_ratio,
            corner_radius: config.corner_radius,
            used_color: config.used_color.clone(),
            remaining_color: config.remaining_color.clone(),
        }
    }

    pub fn outer_radius(&self, size: Size) -> f64 {
        size.width.min(size.height) / 2.0 * self.radius_ratio
    }

    pub fn inner_radius(&self, size: Size) -> f64 {
        self.outer_radius(size) * self.inner_ratio
    }

    /// Arcs for `(used, remaining)` percentages
    ///
    /// Negative values get a zero sweep. If both are zero, both arcs are
    /// empty.
    pub fn arcs(
        &self,
        size: Size,
        used: i64,
        remaining: i64,
        highlighted: Slice,
    ) -> [ArcSegment; 2] {
        let weights = [used.max(0) as f64, remaining.max(0) as f64];
        let total: f64 = weights.iter().sum();
        let scale = if total > 0.0 { TAU / total } else { 0.0 };

        let outer_radius = self.outer_radius(size);
        let inner_radius = self.inner_radius(size);

        let used_end = weights[0] * scale;
        let remaining_end = used_end + weights[1] * scale;

        [
            ArcSegment {
                slice: Slice::Used,
                value: used,
                start_angle: 0.0,
                end_angle: used_end,
                inner_radius,
                outer_radius,
                corner_radius: self.corner_radius,
                color: self.used_color.clone(),
                highlighted: highlighted == Slice::Used,
            },
            ArcSegment {
                slice: Slice::Remaining,
                value: remaining,
                start_angle: used_end,
                end_angle: remaining_end,
                inner_radius,
                outer_radius,
                corner_radius: self.corner_radius,
                color: self.remaining_color.clone(),
                highlighted: highlighted == Slice::Remaining,
            },
        ]
    }

    /// Percentage and description labels sized from the surface width
    pub fn labels(&self, size: Size, percentage: &str, description: &str) -> [Label; 2] {
        [
            Label {
                text: percentage.to_string(),
                font_size: size.width / 8.0,
                offset_y: 0.0,
                bold: true,
            },
            Label {
                text: description.to_string(),
                font_size: size.width / 16.0,
                offset_y: size.width / 10.0,
                bold: false,
            },
        ]
    }
}
