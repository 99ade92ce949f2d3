//! Cost, waste and square-footage rollups over a packed [`Solution`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Rect, Solution};

const SQ_IN_PER_SQ_FT: f64 = 144.0;

#[derive(Debug, Clone, Serialize)]
pub struct CutLine {
    pub sheet: usize,
    pub id: String,
    pub room: String,
    /// Finished size, kerf removed.
    pub size: Rect,
    pub sq_ft: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub sheet_count: usize,
    pub total_cost: f64,
    pub waste_percent: f64,
    pub finished_sq_ft: f64,
    /// Square feet per room, sorted by room name.
    pub rooms: BTreeMap<String, f64>,
    pub cut_list: Vec<CutLine>,
}

impl Report {
    pub fn new(solution: &Solution) -> Self {
        let kerf = solution.sheet.kerf;
        let mut rooms: BTreeMap<String, f64> = BTreeMap::new();
        let mut cut_list = Vec::new();

        for (si, sheet) in solution.sheets.iter().enumerate() {
            for p in &sheet.placements {
                let size = p.rect.inset(kerf);
                let sq_ft = size.area() / SQ_IN_PER_SQ_FT;
                *rooms.entry(p.id.room.clone()).or_default() += sq_ft;
                cut_list.push(CutLine {
                    sheet: si + 1,
                    id: p.id.to_string(),
                    room: p.id.room.clone(),
                    size,
                    sq_ft,
                });
            }
        }

        Self {
            sheet_count: solution.sheet_count(),
            total_cost: solution.total_cost(),
            waste_percent: solution.total_waste_percent(),
            finished_sq_ft: cut_list.iter().map(|c| c.sq_ft).sum(),
            rooms,
            cut_list,
        }
    }
}
