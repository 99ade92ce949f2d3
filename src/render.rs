use crate::types::{Placement, Rect};

const MAX_COLS: f64 = 96.0;
const MAX_ROWS: f64 = 32.0;
/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// ASCII preview of one sheet's usable area. Labels show the piece id, or its
/// finished size when the id does not fit.
pub fn render_sheet(usable: Rect, placements: &[Placement], kerf: f64) -> String {
    let scale = f64::min(
        MAX_COLS / usable.length,
        MAX_ROWS * CELL_ASPECT / usable.width,
    );
    let cols = (usable.length * scale).round() as usize;
    let rows = (usable.width * scale / CELL_ASPECT).round() as usize;

    if cols == 0 || rows == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; cols + 1]; rows + 1];
    draw_rect(&mut grid, 0, 0, cols, rows);

    for p in placements {
        let sx = (p.x * scale).round() as usize;
        let sy = (p.y * scale / CELL_ASPECT).round() as usize;
        let sw = (p.rect.length * scale).round() as usize;
        let sh = (p.rect.width * scale / CELL_ASPECT).round() as usize;
        if sw == 0 || sh == 0 {
            continue;
        }
        draw_rect(&mut grid, sx, sy, sw, sh);

        let id = p.id.to_string();
        let size = p.rect.inset(kerf).to_string();
        let label = if id.chars().count() < sw.saturating_sub(1) {
            id
        } else {
            size
        };
        write_label(&mut grid, &label, sx, sy, sw, sh);
    }

    let mut out = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn write_label(grid: &mut [Vec<char>], label: &str, x: usize, y: usize, w: usize, h: usize) {
    if w <= 2 || h < 2 {
        return;
    }
    let chars: Vec<char> = label.chars().collect();
    let cy = y + h / 2;
    let start = (x + w / 2).saturating_sub(chars.len() / 2);
    for (i, &ch) in chars.iter().enumerate() {
        let cx = start + i;
        if cx > x && cx < x + w && cy < grid.len() && cx < grid[cy].len() {
            grid[cy][cx] = ch;
        }
    }
}

/// Sets one border cell, turning crossings of horizontal and vertical edges into '+'.
fn mark(grid: &mut [Vec<char>], x: usize, y: usize, edge: char) {
    let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    *cell = match (*cell, edge) {
        ('+', _) => '+',
        ('-', '|') | ('|', '-') => '+',
        _ => edge,
    };
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for i in x..=x + w {
        mark(grid, i, y, '-');
        mark(grid, i, y + h, '-');
    }
    for j in y..=y + h {
        mark(grid, x, j, '|');
        mark(grid, x + w, j, '|');
    }
    for cx in [x, x + w] {
        for cy in [y, y + h] {
            mark(grid, cx, cy, '+');
        }
    }
}
