use crate::config::PackSettings;
use crate::error::{PackError, Result};
use crate::guillotine::GuillotineBin;
use crate::types::{PlacementRect, Rect};

/// Greedy first-fit packer over identical sheets.
pub struct Packer {
    usable: Rect,
    settings: PackSettings,
}

impl Packer {
    pub fn new(usable: Rect, settings: PackSettings) -> Self {
        Self { usable, settings }
    }

    /// Packs largest-area first into the first bin that accepts each piece,
    /// opening a new bin when none does. The returned order is the sheet numbering.
    pub fn pack(&self, mut pieces: Vec<PlacementRect>) -> Result<Vec<GuillotineBin>> {
        // Stable sort keeps input order among equal areas.
        pieces.sort_by(|a, b| b.rect.area().total_cmp(&a.rect.area()));

        let mut bins: Vec<GuillotineBin> = Vec::new();

        for piece in &pieces {
            if let Some(bi) = bins.iter_mut().position(|bin| bin.try_place(piece)) {
                tracing::debug!(id = %piece.id, size = %piece.rect, sheet = bi + 1, "placed");
                continue;
            }

            let mut bin = GuillotineBin::new(self.usable, &self.settings);
            if !bin.try_place(piece) {
                tracing::warn!(id = %piece.id, size = %piece.rect, "piece fits nowhere");
                return Err(PackError::PieceUnplaceable {
                    id: piece.id.clone(),
                    reason: format!(
                        "{} exceeds usable sheet size {}",
                        piece.rect, self.usable
                    ),
                });
            }
            bins.push(bin);
            tracing::debug!(id = %piece.id, size = %piece.rect, sheet = bins.len(), "opened sheet");
        }

        tracing::info!(pieces = pieces.len(), sheets = bins.len(), "pack complete");
        Ok(bins)
    }
}
