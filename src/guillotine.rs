use crate::config::{PackSettings, SplitPolicy};
use crate::types::{PieceId, Placement, PlacementRect, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeRect {
    pub x: f64,
    pub y: f64,
    pub rect: Rect,
}

/// Placement state of one stock sheet. Coordinates are relative to the usable
/// top-left corner, i.e. edge trim is already removed.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    usable: Rect,
    eps: f64,
    split: SplitPolicy,
    pub free_rects: Vec<FreeRect>,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScoredPlacement {
    pub free_idx: usize,
    pub rotated: bool,
    pub score: f64,
}

impl GuillotineBin {
    pub fn new(usable: Rect, settings: &PackSettings) -> Self {
        Self {
            usable,
            eps: settings.epsilon,
            split: settings.split,
            free_rects: vec![FreeRect {
                x: 0.0,
                y: 0.0,
                rect: usable,
            }],
            placements: Vec::new(),
        }
    }

    pub fn usable(&self) -> Rect {
        self.usable
    }

    pub fn used_area(&self) -> f64 {
        self.placements.iter().map(|p| p.rect.area()).sum()
    }

    pub fn free_area(&self) -> f64 {
        self.free_rects.iter().map(|f| f.rect.area()).sum()
    }

    /// Places `piece` in the free region with the smallest short-side leftover.
    /// Returns `false` and leaves the bin untouched when nothing fits.
    pub fn try_place(&mut self, piece: &PlacementRect) -> bool {
        match self.find_best(piece.rect, piece.allow_rotation) {
            Some(scored) => {
                self.place(scored, piece.rect, piece.id.clone());
                true
            }
            None => false,
        }
    }

    /// Best short-side fit. Regions are scanned in insertion order and only a
    /// strictly better score replaces the current best, so ties go to the first found.
    pub fn find_best(&self, piece: Rect, allow_rotate: bool) -> Option<ScoredPlacement> {
        let mut best: Option<ScoredPlacement> = None;

        for (idx, free) in self.free_rects.iter().enumerate() {
            if piece.fits_in(&free.rect, self.eps) {
                let score = Self::score(piece, free.rect);
                if best.is_none_or(|b| score < b.score) {
                    best = Some(ScoredPlacement {
                        free_idx: idx,
                        rotated: false,
                        score,
                    });
                }
            }
            if allow_rotate {
                let rotated = piece.rotated();
                if rotated.fits_in(&free.rect, self.eps) {
                    let score = Self::score(rotated, free.rect);
                    if best.is_none_or(|b| score < b.score) {
                        best = Some(ScoredPlacement {
                            free_idx: idx,
                            rotated: true,
                            score,
                        });
                    }
                }
            }
        }

        best
    }

    fn score(piece: Rect, free: Rect) -> f64 {
        // Leftovers may dip below zero inside the epsilon band; that is an exact fit.
        let leftover_l = (free.length - piece.length).max(0.0);
        let leftover_w = (free.width - piece.width).max(0.0);
        leftover_l.min(leftover_w)
    }

    pub fn place(&mut self, scored: ScoredPlacement, piece: Rect, id: PieceId) -> Placement {
        let free = self.free_rects.remove(scored.free_idx);
        let placed = if scored.rotated {
            piece.rotated()
        } else {
            piece
        };

        let placement = Placement {
            rect: placed,
            x: free.x,
            y: free.y,
            rotated: scored.rotated,
            id,
        };

        self.split(free, placed);
        self.placements.push(placement.clone());

        placement
    }

    fn split(&mut self, free: FreeRect, placed: Rect) {
        // Clamp so an epsilon overhang never grows the leftover regions.
        let used = Rect::new(
            placed.length.min(free.rect.length),
            placed.width.min(free.rect.width),
        );
        let rem_l = free.rect.length - used.length;
        let rem_w = free.rect.width - used.width;

        let split_horizontal = match self.split {
            SplitPolicy::ShorterAxis => rem_l < rem_w,
            SplitPolicy::RowPriority { thin_threshold } => {
                used.width < thin_threshold
                    || free.rect.length * rem_w >= rem_l * free.rect.width
            }
        };

        let (right, below) = if split_horizontal {
            // Right remainder is only as tall as the piece, below spans the full region.
            (
                Rect::new(rem_l, used.width),
                Rect::new(free.rect.length, rem_w),
            )
        } else {
            (
                Rect::new(rem_l, free.rect.width),
                Rect::new(used.length, rem_w),
            )
        };

        if right.length > 0.0 && right.width > 0.0 {
            self.free_rects.push(FreeRect {
                x: free.x + used.length,
                y: free.y,
                rect: right,
            });
        }
        if below.length > 0.0 && below.width > 0.0 {
            self.free_rects.push(FreeRect {
                x: free.x,
                y: free.y + used.width,
                rect: below,
            });
        }
    }
}
