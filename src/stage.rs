//! Per-stage world: a fresh maze plus everything placed in it.

use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::{
    BASE_FLAGS, ENEMY_BASE_DELAY, ENEMY_DELAY_PER_STAGE, ENEMY_MIN_START_DISTANCE,
    ENEMY_PLACE_ATTEMPTS, FLAGS_PER_STAGE, FLAG_PLACE_ATTEMPTS, MAX_ENEMIES, MIN_ENEMY_MOVE_DELAY,
};
use crate::effects::{Particle, ScorePopup};
use crate::entities::{Bullet, Enemy, Flag, PLAYER_START};
use crate::grid::{Dir, Grid, Pos, Tile};
use crate::maze;

/// Everything that is thrown away when a stage ends.
#[derive(Clone, Debug)]
pub struct Stage {
    pub grid: Grid,
    pub exit: Pos,
    pub exit_open: bool,
    pub flags: Vec<Flag>,
    /// Flags actually placed; the exit opens once this many are collected.
    pub total_flags: u32,
    pub collected_flags: u32,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub popups: Vec<ScorePopup>,
}

impl Stage {
    /// A stage over a prepared grid with nothing placed in it yet.
    pub fn bare(grid: Grid) -> Self {
        let exit = exit_pos(&grid);
        Self {
            grid,
            exit,
            exit_open: false,
            flags: Vec::new(),
            total_flags: 0,
            collected_flags: 0,
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            popups: Vec::new(),
        }
    }

    pub fn flag_at(&self, pos: Pos) -> bool {
        self.flags.iter().any(|f| !f.collected && f.pos == pos)
    }

    pub fn enemy_at(&self, pos: Pos) -> bool {
        self.enemies.iter().any(|e| e.pos == pos)
    }
}

pub fn exit_pos(grid: &Grid) -> Pos {
    Pos::new(grid.width().saturating_sub(2), grid.height().saturating_sub(2))
}

pub fn flag_target(stage: u32) -> u32 {
    BASE_FLAGS + FLAGS_PER_STAGE * stage
}

pub fn enemy_target(stage: u32) -> u32 {
    (1 + stage).min(MAX_ENEMIES)
}

/// Seconds between enemy steps; shrinks with the stage but never below
/// `MIN_ENEMY_MOVE_DELAY`.
pub fn enemy_move_delay(stage: u32) -> f32 {
    (ENEMY_BASE_DELAY - ENEMY_DELAY_PER_STAGE * stage as f32).max(MIN_ENEMY_MOVE_DELAY)
}

/// Build stage `stage` on a freshly generated `cols × rows` maze.
pub fn init_stage(rng: &mut impl Rng, stage: u32, cols: usize, rows: usize) -> Stage {
    let mut grid = maze::generate(rng, cols, rows);
    grid.set(PLAYER_START, Tile::Empty);
    let exit = exit_pos(&grid);
    grid.set(exit, Tile::Empty);

    let mut world = Stage::bare(grid);

    let wanted_flags = flag_target(stage);
    world.flags = place_flags(&world.grid, wanted_flags, rng);
    world.total_flags = world.flags.len() as u32;
    if world.total_flags < wanted_flags {
        log::debug!("placed {} of {} flags", world.total_flags, wanted_flags);
    }
    // Nothing to collect: the way out is open from the start.
    world.exit_open = world.total_flags == 0;

    let wanted_enemies = enemy_target(stage);
    let delay = enemy_move_delay(stage);
    for _ in 0..wanted_enemies {
        if let Some(enemy) = spawn_enemy(&world.grid, delay, rng) {
            world.enemies.push(enemy);
        }
    }
    if world.enemies.len() < wanted_enemies as usize {
        log::debug!("spawned {} of {} enemies", world.enemies.len(), wanted_enemies);
    }

    log::info!(
        "stage {} ready: {} flags, {} enemies",
        stage,
        world.total_flags,
        world.enemies.len()
    );
    world
}

/// Rejection-samples up to `count` flags on open tiles other than the start,
/// the exit, or a tile that already has one.
pub fn place_flags(grid: &Grid, count: u32, rng: &mut impl Rng) -> Vec<Flag> {
    let mut flags: Vec<Flag> = Vec::new();
    if grid.width() < 3 || grid.height() < 3 {
        return flags;
    }
    let exit = exit_pos(grid);
    let mut attempts = 0;
    while (flags.len() as u32) < count && attempts < FLAG_PLACE_ATTEMPTS {
        attempts += 1;
        let pos = Pos::new(
            rng.gen_range(1..=grid.width() - 2),
            rng.gen_range(1..=grid.height() - 2),
        );
        if !grid.is_empty(pos) || pos == PLAYER_START || pos == exit {
            continue;
        }
        if flags.iter().any(|f| f.pos == pos) {
            continue;
        }
        flags.push(Flag {
            pos,
            collected: false,
            phase: rng.gen::<f32>() * TAU,
        });
    }
    flags
}

/// Rejection-samples an open tile at least `ENEMY_MIN_START_DISTANCE` steps
/// (Manhattan) from the player start. `None` when the budget runs out.
pub fn spawn_enemy(grid: &Grid, move_delay: f32, rng: &mut impl Rng) -> Option<Enemy> {
    if grid.width() < 6 || grid.height() < 6 {
        return None;
    }
    for _ in 0..ENEMY_PLACE_ATTEMPTS {
        let pos = Pos::new(
            rng.gen_range(3..=grid.width() - 3),
            rng.gen_range(3..=grid.height() - 3),
        );
        if grid.is_empty(pos) && pos.manhattan(PLAYER_START) >= ENEMY_MIN_START_DISTANCE {
            return Some(Enemy {
                pos,
                dir: Dir::random(rng),
                move_timer: 0.0,
                move_delay,
                change_timer: rng.gen_range(2..=5) as f32,
            });
        }
    }
    None
}
