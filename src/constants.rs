/// World units per tile. Bullets and effects live in this continuous space.
pub const TILE: f32 = 32.0;
pub const COLS: usize = 25;
pub const ROWS: usize = 19;

pub const START_LIVES: u32 = 3;
/// Upper bound on a single step, so frame hitches do not tunnel bullets.
pub const MAX_FRAME_DT: f32 = 0.05;

// Player
pub const PLAYER_MOVE_DELAY: f32 = 0.12;
pub const SHOOT_COOLDOWN: f32 = 0.4;
pub const HIT_INVINCIBILITY: f32 = 2.0;
pub const EXHAUST_LIFE: f32 = 0.5;

// Bullets
pub const BULLET_SPEED: f32 = 280.0;
pub const BULLET_LIFE: f32 = 2.0;
pub const BULLET_HIT_RADIUS: f32 = TILE * 0.7;
pub const TRAIL_LIFE: f32 = 0.2;

// Enemies
pub const MAX_ENEMIES: u32 = 8;
pub const ENEMY_BASE_DELAY: f32 = 0.4;
pub const ENEMY_DELAY_PER_STAGE: f32 = 0.02;
pub const MIN_ENEMY_MOVE_DELAY: f32 = 0.05;
pub const ENEMY_MIN_START_DISTANCE: usize = 5;
pub const ENEMY_PLACE_ATTEMPTS: u32 = 500;

// Flags
pub const BASE_FLAGS: u32 = 4;
pub const FLAGS_PER_STAGE: u32 = 2;
pub const FLAG_PLACE_ATTEMPTS: u32 = 1000;

// Maze
pub const PERFORATION_RATIO: f32 = 0.15;

// Scoring (multiplied by the stage number)
pub const FLAG_SCORE: u32 = 100;
pub const ENEMY_SCORE: u32 = 200;
pub const STAGE_CLEAR_BONUS: u32 = 500;

// Effects
pub const POPUP_LIFE: f32 = 0.6;
pub const POPUP_RISE_SPEED: f32 = 60.0;
