//! Turns the user's cut list into kerf-padded rectangles for the packer.
//!
//! Pieces longer than the usable cut length are split into seamed segments,
//! either greedily (full-length chunks, never leaving a sliver shorter than the
//! minimum segment length) or evenly when a center seam is requested.

use crate::config::{MAX_EXPANDED_PIECES, MAX_SEGMENTS, PackSettings};
use crate::error::{PackError, Result};
use crate::types::{PieceId, PieceRequirement, PlacementRect, Rect};

#[derive(Debug, Clone, Default)]
pub struct Expansion {
    pub pieces: Vec<PlacementRect>,
    /// True finished area of every segment, excluding kerf padding.
    pub finished_area: f64,
}

pub struct Expander<'a> {
    usable: Rect,
    kerf: f64,
    settings: &'a PackSettings,
}

impl<'a> Expander<'a> {
    pub fn new(usable: Rect, kerf: f64, settings: &'a PackSettings) -> Self {
        Self {
            usable,
            kerf,
            settings,
        }
    }

    /// Longest segment that still fits the sheet once kerf is added on both ends.
    pub fn max_cut_length(&self) -> f64 {
        self.usable.length - 2.0 * self.kerf
    }

    pub fn expand(&self, requirements: &[PieceRequirement]) -> Result<Expansion> {
        let max_cut = self.max_cut_length();
        if max_cut <= 0.0 {
            return Err(PackError::InvalidConfiguration(format!(
                "kerf {} leaves no usable cut length on a {} sheet",
                self.kerf, self.usable
            )));
        }

        let mut out = Expansion::default();
        for req in requirements {
            self.validate(req)?;

            let segments = self.segments(req.length, req.center_seam);
            let count = segments.len() as u32;
            let added = segments.len() as u64 * u64::from(req.quantity);
            if out.pieces.len() as u64 + added > MAX_EXPANDED_PIECES as u64 {
                return Err(PackError::InvalidPiece {
                    name: req.name.clone(),
                    reason: format!(
                        "{} x {} segments would exceed the limit of {MAX_EXPANDED_PIECES} pieces per job",
                        req.quantity,
                        segments.len()
                    ),
                });
            }
            if count > 1 {
                tracing::debug!(
                    room = %req.room,
                    name = %req.name,
                    length = req.length,
                    segments = count,
                    "split oversized piece"
                );
            }

            for _ in 0..req.quantity {
                for (idx, &seg) in segments.iter().enumerate() {
                    out.pieces.push(PlacementRect {
                        rect: Rect::new(seg + 2.0 * self.kerf, req.width + 2.0 * self.kerf),
                        id: PieceId {
                            room: req.room.clone(),
                            name: req.name.clone(),
                            segment: idx as u32 + 1,
                            segments: count,
                        },
                        allow_rotation: req.allow_rotation,
                    });
                    out.finished_area += seg * req.width;
                }
            }
        }
        Ok(out)
    }

    fn validate(&self, req: &PieceRequirement) -> Result<()> {
        let invalid = |reason: &str| PackError::InvalidPiece {
            name: req.name.clone(),
            reason: reason.to_string(),
        };
        if !(req.length.is_finite() && req.width.is_finite()) {
            return Err(invalid("length and width must be finite"));
        }
        if !(req.length > 0.0 && req.width > 0.0) {
            return Err(invalid("length and width must be positive"));
        }
        if req.quantity == 0 {
            return Err(invalid("quantity must be non-zero"));
        }
        if (req.length / self.max_cut_length()).ceil() > MAX_SEGMENTS as f64 {
            return Err(invalid(&format!(
                "length {} needs more than {MAX_SEGMENTS} segments",
                req.length
            )));
        }

        let padded = req.width + 2.0 * self.kerf;
        if !req.allow_rotation && padded > self.usable.width {
            tracing::warn!(name = %req.name, width = padded, usable = self.usable.width, "piece too wide");
            return Err(PackError::PieceTooWide {
                name: req.name.clone(),
                width: padded,
                usable_width: self.usable.width,
            });
        }
        Ok(())
    }

    /// Lengths of the pieces `length` is cut into along the sheet length.
    /// Never returns more than [`MAX_SEGMENTS`] parts; `expand` rejects longer pieces first.
    pub fn segments(&self, length: f64, center_seam: bool) -> Vec<f64> {
        let max_cut = self.max_cut_length();
        if length <= max_cut {
            return vec![length];
        }

        if center_seam {
            let n = ((length / max_cut).ceil() as usize).min(MAX_SEGMENTS);
            return vec![length / n as f64; n];
        }

        let min_seg = self.settings.min_segment_length;
        let mut parts = Vec::new();
        let mut rem = length;
        while rem > 0.0 && parts.len() < MAX_SEGMENTS {
            let mut cut = rem.min(max_cut);
            let future = rem - cut;
            if future > 0.0 && future < min_seg {
                // Leave exactly `min_seg` for the next segment instead of a sliver,
                // unless that would make this segment a sliver itself.
                let shrunk = cut - (min_seg - future);
                if shrunk >= min_seg {
                    cut = shrunk;
                }
            }
            let next = rem - cut;
            if next >= rem {
                // Too large for `cut` to register against `rem`.
                break;
            }
            parts.push(cut);
            rem = next;
            // Absorb float residue from the subtraction above.
            if rem <= self.settings.epsilon {
                if let Some(last) = parts.last_mut() {
                    *last += rem;
                }
                rem = 0.0;
            }
        }
        parts
    }
}
