//! Alternating centre caption

use super::Slice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPhase {
    Lived,
    Left,
}

/// Text shown in the donut hole
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub percentage: String,
    pub description: &'static str,
    pub highlighted: Slice,
}

/// Flips between "lived" and "left" on every tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionCycle {
    used: i64,
    remaining: i64,
    phase: CaptionPhase,
}

impl CaptionCycle {
    /// Starts on the lived share
    pub fn new(used: i64, remaining: i64) -> Self {
        Self {
            used,
            remaining,
            phase: CaptionPhase::Lived,
        }
    }

    pub fn used(&self) -> i64 {
        self.used
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn phase(&self) -> CaptionPhase {
        self.phase
    }

    pub fn caption(&self) -> Caption {
        match self.phase {
            CaptionPhase::Lived => Caption {
                percentage: format!("{}%", self.used),
                description: "of life lived",
                highlighted: Slice::Used,
            },
            CaptionPhase::Left => Caption {
                percentage: format!("{}%", self.remaining),
                description: "of life left",
                highlighted: Slice::Remaining,
            },
        }
    }

    /// Switch phase and return the new caption
    pub fn advance(&mut self) -> Caption {
        self.phase = match self.phase {
            CaptionPhase::Lived => CaptionPhase::Left,
            CaptionPhase::Left => CaptionPhase::Lived,
        };
        self.caption()
    }
}
