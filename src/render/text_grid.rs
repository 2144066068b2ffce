//! Terminal rendering
//!
//! `TextGrid` rasterizes arcs into characters. A cell is one unit wide and
//! two units tall, which roughly matches a terminal glyph, so the donut comes
//! out round. `CaptionLines` keeps the sentences shown around the chart.

use super::{ArcSegment, ChartSurface, Label, Size, Slice, TextPanel};
use std::f64::consts::TAU;

const CELL_HEIGHT: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct TextGrid {
    columns: usize,
    rows: usize,
    cells: Vec<char>,
}

impl TextGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![' '; columns * rows],
        }
    }

    /// Change the grid size; contents are discarded
    pub fn resize(&mut self, columns: usize, rows: usize) {
        self.columns = columns;
        self.rows = rows;
        self.cells = vec![' '; columns * rows];
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        if column < self.columns && row < self.rows {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    /// Grid contents, trailing spaces trimmed
    pub fn render(&self) -> String {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn glyph(arc: &ArcSegment) -> char {
        match (arc.slice, arc.highlighted) {
            (Slice::Used, true) => '@',
            (Slice::Used, false) => '#',
            (Slice::Remaining, true) => 'O',
            (Slice::Remaining, false) => 'o',
        }
    }

    /// Centre of a cell relative to the surface centre
    fn offset(&self, column: usize, row: usize) -> (f64, f64) {
        let size = self.measured_size();
        let x = column as f64 + 0.5 - size.width / 2.0;
        let y = (row as f64 + 0.5) * CELL_HEIGHT - size.height / 2.0;
        (x, y)
    }
}

impl ChartSurface for TextGrid {
    fn measured_size(&self) -> Size {
        Size::new(self.columns as f64, self.rows as f64 * CELL_HEIGHT)
    }

    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|cell| *cell = ' ');
    }

    fn draw_arc(&mut self, arc: &ArcSegment) {
        if arc.sweep() <= 0.0 {
            return;
        }

        let glyph = Self::glyph(arc);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let (x, y) = self.offset(column, row);
                let distance = x.hypot(y);
                if distance < arc.inner_radius || distance > arc.outer_radius {
                    continue;
                }
                // Clockwise from twelve o'clock; y grows downward
                let angle = x.atan2(-y).rem_euclid(TAU);
                if arc.contains_angle(angle) || (arc.end_angle >= TAU && angle >= arc.start_angle) {
                    self.cells[row * self.columns + column] = glyph;
                }
            }
        }
    }

    fn draw_label(&mut self, label: &Label) {
        if self.rows == 0 || self.columns == 0 {
            return;
        }

        let centre_row = self.rows as f64 / 2.0 + label.offset_y / CELL_HEIGHT;
        let row = (centre_row.floor().max(0.0) as usize).min(self.rows - 1);

        let text: Vec<char> = label.text.chars().take(self.columns).collect();
        let start = (self.columns - text.len()) / 2;
        for (i, ch) in text.into_iter().enumerate() {
            self.cells[row * self.columns + start + i] = ch;
        }
    }
}

/// Sentences above and below the chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptionLines {
    pub weeks: Option<String>,
    pub journey: Option<String>,
}

impl TextPanel for CaptionLines {
    fn show_weeks(&mut self, weeks_lived: i64, weeks_remaining: i64) {
        self.weeks = Some(format!(
            "You've lived {weeks_lived} weeks. You have approx. {weeks_remaining} weeks left."
        ));
    }

    fn show_journey(&mut self, remaining_percentage: i64) {
        self.journey = Some(format!("Make your last {remaining_percentage}% count."));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DonutLayout;

    #[test]
    fn test_measured_size() {
        let grid = TextGrid::new(40, 20);
        assert_eq!(grid.measured_size(), Size::new(40.0, 40.0));
        assert!(TextGrid::new(0, 10).measured_size().is_empty());
    }

    #[test]
    fn test_draw_full_ring_leaves_hole() {
        let mut grid = TextGrid::new(40, 20);
        let layout = DonutLayout::default();
        let arcs = layout.arcs(grid.measured_size(), 100, 0, Slice::Used);
        for arc in &arcs {
            grid.draw_arc(arc);
        }

        // Centre is in the hole, ring cells above the centre are filled
        assert_eq!(grid.cell(20, 10), Some(' '));
        assert_eq!(grid.cell(20, 2), Some('@'));
        assert_eq!(grid.cell(20, 17), Some('@'));
        // Corners are outside the ring
        assert_eq!(grid.cell(0, 0), Some(' '));
    }

    #[test]
    fn test_halves_split_left_and_right() {
        let mut grid = TextGrid::new(40, 20);
        let layout = DonutLayout::default();
        for arc in &layout.arcs(grid.measured_size(), 50, 50, Slice::Remaining) {
            grid.draw_arc(arc);
        }

        // Used runs clockwise from twelve, so it fills the right half
        assert_eq!(grid.cell(33, 10), Some('#'));
        assert_eq!(grid.cell(6, 10), Some('O'));
    }

    #[test]
    fn test_label_is_centred() {
        let mut grid = TextGrid::new(21, 11);
        grid.draw_label(&Label {
            text: "43%".to_string(),
            font_size: 1.0,
            offset_y: 0.0,
            bold: true,
        });
        let rendered = grid.render();
        let line = rendered.lines().nth(5).unwrap();
        assert_eq!(line, "         43%");
    }

    #[test]
    fn test_clear_and_resize() {
        let mut grid = TextGrid::new(10, 4);
        grid.draw_label(&Label {
            text: "x".to_string(),
            font_size: 1.0,
            offset_y: 0.0,
            bold: false,
        });
        grid.clear();
        assert!(grid.render().trim().is_empty());

        grid.resize(6, 3);
        assert_eq!(grid.columns(), 6);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cell(6, 0), None);
    }

    #[test]
    fn test_caption_lines() {
        let mut lines = CaptionLines::default();
        lines.show_weeks(1774, 2397);
        lines.show_journey(57);
        assert_eq!(
            lines.weeks.as_deref(),
            Some("You've lived 1774 weeks. You have approx. 2397 weeks left.")
        );
        assert_eq!(lines.journey.as_deref(), Some("Make your last 57% count."));
    }
}
