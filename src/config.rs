use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::Rect;

/// Slack allowed when testing whether a piece fits a free region.
pub const DEFAULT_EPSILON: f64 = 0.01;
/// Pieces thinner than this are kept on one shelf row by the row-priority split.
pub const DEFAULT_THIN_THRESHOLD: f64 = 12.0;
/// Shortest segment the expander will leave when splitting an oversized piece.
pub const DEFAULT_MIN_SEGMENT_LENGTH: f64 = 25.0;
/// Most segments a single piece may be split into.
pub const MAX_SEGMENTS: usize = 1_000;
/// Most kerf-padded rectangles one cut list may expand into.
pub const MAX_EXPANDED_PIECES: usize = 10_000;

pub const DEFAULT_SHEET_LENGTH: f64 = 130.0;
pub const DEFAULT_SHEET_WIDTH: f64 = 65.0;
pub const DEFAULT_EDGE_TRIM: f64 = 1.0;
pub const DEFAULT_KERF: f64 = 0.125;

/// How the L-shaped leftover of a free region is cut into two rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SplitPolicy {
    /// Split along the shorter leftover axis.
    ShorterAxis,
    /// Force a horizontal split for thin pieces, otherwise keep the larger leftover whole.
    RowPriority { thin_threshold: f64 },
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self::RowPriority {
            thin_threshold: DEFAULT_THIN_THRESHOLD,
        }
    }
}

impl FromStr for SplitPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shorter-axis" | "shorter_axis" => Ok(Self::ShorterAxis),
            "row-priority" | "row_priority" => Ok(Self::default()),
            _ => Err(format!(
                "invalid split policy '{s}', expected: shorter-axis or row-priority"
            )),
        }
    }
}

/// Tuning knobs of the packing engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackSettings {
    pub epsilon: f64,
    pub split: SplitPolicy,
    pub min_segment_length: f64,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            split: SplitPolicy::default(),
            min_segment_length: DEFAULT_MIN_SEGMENT_LENGTH,
        }
    }
}

/// Gross stock sheet plus the cutting allowances applied to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub length: f64,
    pub width: f64,
    pub edge_trim: f64,
    pub kerf: f64,
    pub cost_per_sheet: f64,
}

impl Default for SheetSpec {
    fn default() -> Self {
        Self {
            length: DEFAULT_SHEET_LENGTH,
            width: DEFAULT_SHEET_WIDTH,
            edge_trim: DEFAULT_EDGE_TRIM,
            kerf: DEFAULT_KERF,
            cost_per_sheet: 0.0,
        }
    }
}

impl SheetSpec {
    pub fn new(length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            ..Default::default()
        }
    }

    pub fn with_trim(mut self, edge_trim: f64) -> Self {
        self.edge_trim = edge_trim;
        self
    }

    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    pub fn with_cost(mut self, cost_per_sheet: f64) -> Self {
        self.cost_per_sheet = cost_per_sheet;
        self
    }

    pub fn gross(&self) -> Rect {
        Rect::new(self.length, self.width)
    }

    /// Sheet area left after the edge trim is removed from every side.
    pub fn usable(&self) -> Rect {
        self.gross().inset(self.edge_trim)
    }
}
