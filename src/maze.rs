//! Randomised depth-first maze carving over a half-resolution cell lattice,
//! followed by a best-effort pass that knocks out extra walls to create loops.
//!
//! Cell `(cx, cy)` of the lattice sits at tile `(2cx + 1, 2cy + 1)`; the tile
//! between two adjacent cells is the wall that gets carved to join them. The
//! outer ring of tiles is never touched.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::PERFORATION_RATIO;
use crate::grid::{Dir, Grid, Pos, Tile};

/// Generate a `cols × rows` tile grid.
pub fn generate(rng: &mut impl Rng, cols: usize, rows: usize) -> Grid {
    let mut grid = Grid::filled(cols, rows, Tile::Wall);
    if cols < 3 || rows < 3 {
        return grid;
    }
    let cells_w = (cols - 1) / 2;
    let cells_h = (rows - 1) / 2;

    carve_passages(&mut grid, cells_w, cells_h, rng);

    let opened = perforate(&mut grid, cells_w, cells_h, rng);
    log::debug!(
        "maze {}x{}: {} extra openings from {} attempts",
        cols,
        rows,
        opened,
        perforation_attempts(cells_w, cells_h)
    );
    grid
}

fn shuffled_dirs(rng: &mut impl Rng) -> [Dir; 4] {
    let mut dirs = Dir::ALL;
    dirs.shuffle(rng);
    dirs
}

/// Recursive backtracking from cell (0, 0), unrolled onto an explicit stack.
/// Each frame remembers its shuffled directions and how many it has tried,
/// so the visiting order matches the recursive formulation exactly.
fn carve_passages(grid: &mut Grid, cells_w: usize, cells_h: usize, rng: &mut impl Rng) {
    let mut visited = vec![vec![false; cells_w]; cells_h];
    let mut stack: Vec<(usize, usize, [Dir; 4], usize)> = Vec::new();

    visited[0][0] = true;
    carve_cell(grid, 0, 0);
    stack.push((0, 0, shuffled_dirs(rng), 0));

    while let Some(frame) = stack.last_mut() {
        let (cx, cy, dirs, tried) = *frame;
        if tried == dirs.len() {
            stack.pop();
            continue;
        }
        frame.3 += 1;

        let (dx, dy) = dirs[tried].delta();
        let (Some(nx), Some(ny)) = (cx.checked_add_signed(dx), cy.checked_add_signed(dy)) else {
            continue;
        };
        if nx >= cells_w || ny >= cells_h || visited[ny][nx] {
            continue;
        }

        carve_between(grid, cx, cy, nx, ny);
        visited[ny][nx] = true;
        carve_cell(grid, nx, ny);
        stack.push((nx, ny, shuffled_dirs(rng), 0));
    }
}

fn carve_cell(grid: &mut Grid, cx: usize, cy: usize) {
    grid.set(Pos::new(cx * 2 + 1, cy * 2 + 1), Tile::Empty);
}

fn carve_between(grid: &mut Grid, cx: usize, cy: usize, nx: usize, ny: usize) {
    let wall_x = (cx * 2 + 1 + nx * 2 + 1) / 2;
    let wall_y = (cy * 2 + 1 + ny * 2 + 1) / 2;
    grid.set(Pos::new(wall_x, wall_y), Tile::Empty);
}

fn perforation_attempts(cells_w: usize, cells_h: usize) -> usize {
    (cells_w as f32 * cells_h as f32 * PERFORATION_RATIO).floor() as usize
}

/// Opens random interior walls that already touch at least two open tiles.
/// Returns how many walls were removed.
fn perforate(grid: &mut Grid, cells_w: usize, cells_h: usize, rng: &mut impl Rng) -> usize {
    let mut opened = 0;
    for _ in 0..perforation_attempts(cells_w, cells_h) {
        let pos = Pos::new(
            rng.gen_range(1..=grid.width() - 2),
            rng.gen_range(1..=grid.height() - 2),
        );
        if grid.is_wall(pos) && grid.empty_neighbors(pos) >= 2 {
            grid.set(pos, Tile::Empty);
            opened += 1;
        }
    }
    opened
}
