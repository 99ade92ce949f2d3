use serde::{Deserialize, Deserializer, Serialize};

use crate::config::SheetSpec;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub length: f64,
    pub width: f64,
}

impl Rect {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    pub fn rotated(&self) -> Self {
        Self {
            length: self.width,
            width: self.length,
        }
    }

    /// Fit test with `eps` slack on both sides, absorbing rounding from kerf/trim arithmetic.
    pub fn fits_in(&self, other: &Rect, eps: f64) -> bool {
        self.length <= other.length + eps && self.width <= other.width + eps
    }

    /// Shrinks the rect by `amount` on every side.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            length: self.length - 2.0 * amount,
            width: self.width - 2.0 * amount,
        }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", trim_float(self.length), trim_float(self.width))
    }
}

/// Formats with at most two decimals, dropping trailing zeros.
pub fn trim_float(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// One line of the user's cut list. Field names match the saved job format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceRequirement {
    pub room: String,
    pub name: String,
    #[serde(rename = "l")]
    pub length: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "qty", deserialize_with = "deserialize_u32_from_number")]
    pub quantity: u32,
    #[serde(rename = "rot", default)]
    pub allow_rotation: bool,
    #[serde(rename = "split", default)]
    pub center_seam: bool,
}

impl PieceRequirement {
    pub fn new(room: &str, name: &str, length: f64, width: f64, quantity: u32) -> Self {
        Self {
            room: room.to_string(),
            name: name.to_string(),
            length,
            width,
            quantity,
            allow_rotation: false,
            center_seam: false,
        }
    }

    pub fn rotatable(mut self) -> Self {
        self.allow_rotation = true;
        self
    }

    pub fn center_seam(mut self) -> Self {
        self.center_seam = true;
        self
    }
}

/// Identifies a packed piece. `segment` is 1-based and only shown when the piece was split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId {
    pub room: String,
    pub name: String,
    pub segment: u32,
    pub segments: u32,
}

impl PieceId {
    pub fn is_split(&self) -> bool {
        self.segments > 1
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.room, self.name)?;
        if self.is_split() {
            write!(f, " ({}/{})", self.segment, self.segments)?;
        }
        Ok(())
    }
}

/// A kerf-inflated rectangle ready for the packer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRect {
    pub rect: Rect,
    pub id: PieceId,
    pub allow_rotation: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub rect: Rect,
    pub x: f64,
    pub y: f64,
    pub rotated: bool,
    pub id: PieceId,
}

impl Placement {
    pub fn overlaps(&self, other: &Placement, eps: f64) -> bool {
        self.x + eps < other.x + other.rect.length
            && other.x + eps < self.x + self.rect.length
            && self.y + eps < other.y + other.rect.width
            && other.y + eps < self.y + self.rect.width
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetResult {
    pub placements: Vec<Placement>,
    /// Gross sheet area not covered by finished pieces.
    pub waste_area: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub sheets: Vec<SheetResult>,
    pub sheet: SheetSpec,
    /// Sum of finished (kerf-free) piece areas.
    pub finished_area: f64,
}

impl Solution {
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn total_cost(&self) -> f64 {
        self.sheets.len() as f64 * self.sheet.cost_per_sheet
    }

    /// Waste relative to the gross area of every sheet used, trim included.
    pub fn total_waste_percent(&self) -> f64 {
        let total_stock_area = self.sheet.gross().area() * self.sheets.len() as f64;
        if total_stock_area <= 0.0 {
            return 0.0;
        }
        (total_stock_area - self.finished_area) / total_stock_area * 100.0
    }
}

/// Accepts integral JSON numbers written either as `3` or `3.0`.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative integer, got {v}"
        )));
    }
    Ok(v as u32)
}
