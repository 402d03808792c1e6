use rand::Rng;

use crate::constants::TILE;

/// What the maze itself holds. Flags, the start and the exit live in `Stage`
/// and sit on `Empty` tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Centre of the tile in world units.
    pub fn center(self) -> (f32, f32) {
        (
            self.x as f32 * TILE + TILE / 2.0,
            self.y as f32 * TILE + TILE / 2.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn unit(self) -> (f32, f32) {
        let (dx, dy) = self.delta();
        (dx as f32, dy as f32)
    }

    pub fn random(rng: &mut impl Rng) -> Dir {
        Dir::ALL[rng.gen_range(0..Dir::ALL.len())]
    }
}

/// The fine tile grid, indexed `cells[y][x]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![tile; width]; height],
        }
    }

    /// Builds a grid from text rows: `#` is a wall, anything else is empty.
    /// Rows shorter than the first one are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        let mut grid = Self::filled(width, rows.len(), Tile::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(width).enumerate() {
                if ch != '#' {
                    grid.cells[y][x] = Tile::Empty;
                }
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile(&self, pos: Pos) -> Option<Tile> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) {
        if let Some(cell) = self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x)) {
            *cell = tile;
        }
    }

    pub fn is_wall(&self, pos: Pos) -> bool {
        self.tile(pos) == Some(Tile::Wall)
    }

    pub fn is_empty(&self, pos: Pos) -> bool {
        self.tile(pos) == Some(Tile::Empty)
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height
    }

    /// The neighbouring cell in `dir`, if it is inside the grid and not a wall.
    pub fn step(&self, pos: Pos, dir: Dir) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x.checked_add_signed(dx)?;
        let ny = pos.y.checked_add_signed(dy)?;
        let next = Pos::new(nx, ny);
        match self.tile(next) {
            Some(Tile::Empty) => Some(next),
            Some(Tile::Wall) | None => None,
        }
    }

    /// Tile containing the world-space point, or `None` when it lies outside the grid.
    pub fn tile_at_point(&self, x: f32, y: f32) -> Option<Pos> {
        let gx = (x / TILE).floor();
        let gy = (y / TILE).floor();
        if gx < 0.0 || gy < 0.0 {
            return None;
        }
        let pos = Pos::new(gx as usize, gy as usize);
        (pos.x < self.width && pos.y < self.height).then_some(pos)
    }

    pub fn empty_neighbors(&self, pos: Pos) -> usize {
        Dir::ALL
            .iter()
            .filter(|&&dir| {
                let (dx, dy) = dir.delta();
                match (pos.x.checked_add_signed(dx), pos.y.checked_add_signed(dy)) {
                    (Some(x), Some(y)) => self.is_empty(Pos::new(x, y)),
                    _ => false,
                }
            })
            .count()
    }

    pub fn empty_cells(&self) -> Vec<Pos> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y][x] != Tile::Wall {
                    cells.push(Pos { x, y });
                }
            }
        }
        cells
    }
}
