use crate::config::{PackSettings, SheetSpec};
use crate::error::{PackError, Result};
use crate::expand::Expander;
use crate::guillotine::GuillotineBin;
use crate::packer::Packer;
use crate::types::{PieceRequirement, Rect, SheetResult, Solution};

pub struct Solver {
    sheet: SheetSpec,
    settings: PackSettings,
    requirements: Vec<PieceRequirement>,
}

impl Solver {
    pub fn new(sheet: SheetSpec, settings: PackSettings, requirements: Vec<PieceRequirement>) -> Self {
        Self {
            sheet,
            settings,
            requirements,
        }
    }

    pub fn solve(&self) -> Result<Solution> {
        let usable = self.validate_sheet()?;

        let expansion =
            Expander::new(usable, self.sheet.kerf, &self.settings).expand(&self.requirements)?;
        if expansion.pieces.is_empty() {
            return Ok(Solution {
                sheets: vec![],
                sheet: self.sheet,
                finished_area: 0.0,
            });
        }

        tracing::info!(
            requirements = self.requirements.len(),
            pieces = expansion.pieces.len(),
            usable = %usable,
            kerf = self.sheet.kerf,
            "packing"
        );
        let bins = Packer::new(usable, self.settings).pack(expansion.pieces)?;

        Ok(self.bins_to_solution(bins, expansion.finished_area))
    }

    fn validate_sheet(&self) -> Result<Rect> {
        let sheet = &self.sheet;
        if ![sheet.length, sheet.width, sheet.edge_trim, sheet.kerf, sheet.cost_per_sheet]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(PackError::InvalidConfiguration(format!(
                "sheet settings must be finite numbers: {sheet:?}"
            )));
        }
        if self.sheet.edge_trim < 0.0 || self.sheet.kerf < 0.0 {
            return Err(PackError::InvalidConfiguration(format!(
                "edge trim ({}) and kerf ({}) must not be negative",
                self.sheet.edge_trim, self.sheet.kerf
            )));
        }
        let usable = self.sheet.usable();
        if !(usable.length > 0.0 && usable.width > 0.0) {
            return Err(PackError::InvalidConfiguration(format!(
                "edge trim {} leaves no usable area on a {} sheet",
                self.sheet.edge_trim,
                self.sheet.gross()
            )));
        }
        Ok(usable)
    }

    fn bins_to_solution(&self, bins: Vec<GuillotineBin>, finished_area: f64) -> Solution {
        let stock_area = self.sheet.gross().area();
        let kerf = self.sheet.kerf;
        let sheets = bins
            .into_iter()
            .map(|bin| {
                let finished: f64 = bin
                    .placements
                    .iter()
                    .map(|p| p.rect.inset(kerf).area())
                    .sum();
                SheetResult {
                    placements: bin.placements,
                    waste_area: stock_area - finished,
                }
            })
            .collect();

        Solution {
            sheets,
            sheet: self.sheet,
            finished_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_EPSILON, SplitPolicy};
    use crate::types::Placement;

    /// Validates a complete solution:
    /// 1. Every placement lies within the usable sheet
    /// 2. No two placements on the same sheet overlap
    /// 3. The total number of placed pieces matches expectations
    fn assert_solution_valid(sol: &Solution, expected_pieces: usize) {
        let usable = sol.sheet.usable();
        let total_placed: usize = sol.sheets.iter().map(|s| s.placements.len()).sum();
        assert_eq!(
            total_placed, expected_pieces,
            "expected {} pieces placed, got {}",
            expected_pieces, total_placed
        );

        for (si, sheet) in sol.sheets.iter().enumerate() {
            for p in &sheet.placements {
                assert!(
                    p.x >= 0.0 && p.x + p.rect.length <= usable.length + DEFAULT_EPSILON,
                    "sheet {si}, {} ({}) exceeds usable length: x={} + {} > {}",
                    p.id, p.rect, p.x, p.rect.length, usable.length
                );
                assert!(
                    p.y >= 0.0 && p.y + p.rect.width <= usable.width + DEFAULT_EPSILON,
                    "sheet {si}, {} ({}) exceeds usable width: y={} + {} > {}",
                    p.id, p.rect, p.y, p.rect.width, usable.width
                );
            }
            assert_no_overlaps(si, &sheet.placements);
        }
    }

    fn assert_no_overlaps(sheet_idx: usize, placements: &[Placement]) {
        for i in 0..placements.len() {
            for j in (i + 1)..placements.len() {
                let a = &placements[i];
                let b = &placements[j];
                assert!(
                    !a.overlaps(b, DEFAULT_EPSILON),
                    "sheet {sheet_idx}: {} @ ({},{}) overlaps {} @ ({},{})",
                    a.id, a.x, a.y, b.id, b.x, b.y
                );
            }
        }
    }

    fn sheet(length: f64, width: f64, trim: f64, kerf: f64) -> SheetSpec {
        SheetSpec::new(length, width).with_trim(trim).with_kerf(kerf)
    }

    fn solve(sheet: SheetSpec, reqs: Vec<PieceRequirement>) -> Result<Solution> {
        Solver::new(sheet, PackSettings::default(), reqs).solve()
    }

    #[test]
    fn test_single_piece_at_origin() {
        // 130x65 with 1" trim gives the 128x63 usable area
        let sol = solve(
            sheet(130.0, 65.0, 1.0, 0.0),
            vec![PieceRequirement::new("Kitchen", "Counter", 60.0, 30.0, 1)],
        )
        .unwrap();
        assert_solution_valid(&sol, 1);
        assert_eq!(sol.sheet_count(), 1);
        let p = &sol.sheets[0].placements[0];
        assert_eq!((p.x, p.y), (0.0, 0.0));
        assert_eq!(p.rect, Rect::new(60.0, 30.0));
        assert_eq!(p.id.to_string(), "Kitchen: Counter");
    }

    #[test]
    fn test_oversized_piece_split_in_two() {
        let sol = solve(
            sheet(100.0, 50.0, 0.0, 0.0),
            vec![PieceRequirement::new("Kitchen", "Island", 150.0, 40.0, 1)],
        )
        .unwrap();
        assert_solution_valid(&sol, 2);
        let mut lengths: Vec<f64> = sol
            .sheets
            .iter()
            .flat_map(|s| &s.placements)
            .map(|p| p.rect.length)
            .collect();
        lengths.sort_by(f64::total_cmp);
        assert_eq!(lengths, vec![50.0, 100.0]);
        // 100x40 leaves a 10" strip, so the 50x40 remainder needs its own sheet
        assert_eq!(sol.sheet_count(), 2);
        assert!(sol.sheets.iter().flat_map(|s| &s.placements).all(|p| p.id.segments == 2));
    }

    #[test]
    fn test_piece_larger_than_sheet() {
        let err = solve(
            sheet(50.0, 50.0, 0.0, 0.0),
            vec![PieceRequirement::new("Kitchen", "Slab", 60.0, 60.0, 1).rotatable()],
        )
        .unwrap_err();
        match err {
            PackError::PieceUnplaceable { id, .. } => {
                assert_eq!(id.room, "Kitchen");
                assert_eq!(id.name, "Slab");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_trim_consumes_sheet() {
        let err = solve(
            sheet(100.0, 50.0, 25.0, 0.0),
            vec![PieceRequirement::new("Kitchen", "Counter", 10.0, 10.0, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, PackError::InvalidConfiguration(_)));

        let err = solve(sheet(100.0, 50.0, 0.0, -1.0), vec![]).unwrap_err();
        assert!(matches!(err, PackError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rotation_changes_sheet_count() {
        let reqs = |rot: bool| {
            let b = PieceRequirement::new("Kitchen", "B", 45.0, 80.0, 1);
            vec![
                PieceRequirement::new("Kitchen", "A", 80.0, 45.0, 1),
                if rot { b.rotatable() } else { b },
            ]
        };
        let fixed = solve(sheet(100.0, 100.0, 0.0, 0.0), reqs(false)).unwrap();
        assert_solution_valid(&fixed, 2);
        assert_eq!(fixed.sheet_count(), 2);

        let rotated = solve(sheet(100.0, 100.0, 0.0, 0.0), reqs(true)).unwrap();
        assert_solution_valid(&rotated, 2);
        assert_eq!(rotated.sheet_count(), 1);
        assert!(rotated.sheets[0].placements[1].rotated);
    }

    #[test]
    fn test_too_wide_detected_before_packing() {
        let err = solve(
            sheet(130.0, 65.0, 1.0, 0.125),
            vec![PieceRequirement::new("Bar", "Top", 40.0, 63.0, 1)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            PackError::PieceTooWide {
                name: "Top".into(),
                width: 63.25,
                usable_width: 63.0
            }
        );
    }

    #[test]
    fn test_non_finite_sheet_rejected() {
        let reqs = vec![PieceRequirement::new("Kitchen", "Counter", 10.0, 10.0, 1)];
        for bad in [
            sheet(f64::INFINITY, 65.0, 1.0, 0.125),
            sheet(130.0, f64::NAN, 1.0, 0.125),
            sheet(130.0, 65.0, 1.0, f64::INFINITY),
        ] {
            let err = solve(bad, reqs.clone()).unwrap_err();
            assert!(matches!(err, PackError::InvalidConfiguration(_)), "{err:?}");
        }
    }

    #[test]
    fn test_no_requirements() {
        let sol = solve(SheetSpec::default(), vec![]).unwrap();
        assert_solution_valid(&sol, 0);
        assert_eq!(sol.total_waste_percent(), 0.0);
    }

    #[test]
    fn test_kerf_reduces_capacity() {
        let reqs = vec![PieceRequirement::new("Kitchen", "Panel", 50.0, 90.0, 2)];
        let no_kerf = solve(sheet(100.0, 100.0, 0.0, 0.0), reqs.clone()).unwrap();
        assert_solution_valid(&no_kerf, 2);
        assert_eq!(no_kerf.sheet_count(), 1);

        // 51 + 51 > 100 once kerf pads both sides
        let kerf = solve(sheet(100.0, 100.0, 0.0, 0.5), reqs).unwrap();
        assert_solution_valid(&kerf, 2);
        assert_eq!(kerf.sheet_count(), 2);
    }

    #[test]
    fn test_waste_percent() {
        let sol = solve(
            sheet(100.0, 100.0, 0.0, 0.0),
            vec![PieceRequirement::new("Kitchen", "Full", 100.0, 100.0, 1)],
        )
        .unwrap();
        assert!(sol.total_waste_percent().abs() < 0.01);
        assert!(sol.sheets[0].waste_area.abs() < 1e-9);

        // Trim is counted as waste against the gross sheet
        let sol = solve(
            sheet(102.0, 102.0, 1.0, 0.0),
            vec![PieceRequirement::new("Kitchen", "Full", 100.0, 100.0, 1)],
        )
        .unwrap();
        let expected = (102.0 * 102.0 - 10_000.0) / (102.0 * 102.0) * 100.0;
        assert!((sol.total_waste_percent() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cost() {
        let sol = solve(
            sheet(100.0, 100.0, 0.0, 0.0).with_cost(850.0),
            vec![PieceRequirement::new("Kitchen", "Big", 60.0, 60.0, 3)],
        )
        .unwrap();
        assert_eq!(sol.sheet_count(), 3);
        assert_eq!(sol.total_cost(), 2550.0);
    }

    /// A typical kitchen and bath job on 130x65 slabs with 1" trim and 1/8" kerf.
    #[test]
    fn test_kitchen_job() {
        let reqs = vec![
            PieceRequirement::new("Kitchen", "Perimeter", 144.0, 25.5, 1),
            PieceRequirement::new("Kitchen", "Island", 150.0, 42.0, 1).center_seam(),
            PieceRequirement::new("Kitchen", "Backsplash", 60.0, 4.0, 4).rotatable(),
            PieceRequirement::new("Kitchen", "Window Sill", 36.0, 5.0, 1).rotatable(),
            PieceRequirement::new("Bath", "Vanity", 61.0, 22.5, 2),
            PieceRequirement::new("Bath", "Side Splash", 22.5, 4.0, 4).rotatable(),
            PieceRequirement::new("Laundry", "Folding Top", 48.0, 25.5, 1),
        ];
        let expected_pieces = 2 + 2 + 4 + 1 + 2 + 4 + 1;
        for split in [SplitPolicy::ShorterAxis, SplitPolicy::default()] {
            let settings = PackSettings {
                split,
                ..PackSettings::default()
            };
            let sol = Solver::new(SheetSpec::default(), settings, reqs.clone())
                .solve()
                .unwrap();
            assert_solution_valid(&sol, expected_pieces);

            let usable_area = SheetSpec::default().usable().area();
            let min_sheets = (sol.finished_area / usable_area).ceil() as usize;
            assert!(sol.sheet_count() >= min_sheets);
            assert!(sol.total_waste_percent() > 0.0 && sol.total_waste_percent() < 100.0);

            // 150" exceeds the 127.75" cut length, so the island gets one centered seam
            let mut island: Vec<&Placement> = sol
                .sheets
                .iter()
                .flat_map(|s| &s.placements)
                .filter(|p| p.id.name == "Island")
                .collect();
            island.sort_by_key(|p| p.id.segment);
            let labels: Vec<String> = island.iter().map(|p| p.id.to_string()).collect();
            assert_eq!(labels, vec!["Kitchen: Island (1/2)", "Kitchen: Island (2/2)"]);
            for p in island {
                assert!(!p.rotated);
                assert_eq!(p.rect, Rect::new(75.25, 42.25));
            }
        }
    }

    /// Many small rotatable pieces with kerf; checks validity and determinism.
    #[test]
    fn test_large_batch_deterministic() {
        let reqs: Vec<PieceRequirement> = (0..12)
            .map(|i| {
                let l = 12.0 + (i * 7 % 40) as f64 * 2.25;
                let w = 4.0 + (i * 5 % 20) as f64 * 1.5;
                let req = PieceRequirement::new("Shop", &format!("Part {i}"), l, w, 1 + i % 4);
                if i % 2 == 0 { req.rotatable() } else { req }
            })
            .collect();
        let expected: u32 = reqs.iter().map(|r| r.quantity).sum();

        let a = solve(SheetSpec::default(), reqs.clone()).unwrap();
        let b = solve(SheetSpec::default(), reqs).unwrap();
        assert_solution_valid(&a, expected as usize);
        assert_eq!(a.sheet_count(), b.sheet_count());
        for (x, y) in a.sheets.iter().zip(&b.sheets) {
            assert_eq!(x.placements, y.placements);
        }
    }
}
