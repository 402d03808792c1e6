//! Plain entity records. Behaviour lives in `step` and `stage`.

use crate::constants::{BULLET_LIFE, BULLET_SPEED, EXHAUST_LIFE, PLAYER_MOVE_DELAY, TRAIL_LIFE};
use crate::grid::{Dir, Pos};

pub const PLAYER_START: Pos = Pos::new(1, 1);

/// A fading puff left behind on the tile the player just vacated.
#[derive(Clone, Debug, PartialEq)]
pub struct Exhaust {
    pub pos: Pos,
    pub life: f32,
}

impl Exhaust {
    pub fn new(pos: Pos) -> Self {
        Self { pos, life: EXHAUST_LIFE }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Pos,
    pub facing: Dir,
    pub move_timer: f32,
    pub move_delay: f32,
    pub shoot_cooldown: f32,
    /// Seconds of immunity to enemy contact left.
    pub invincible: f32,
    pub exhaust: Vec<Exhaust>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: PLAYER_START,
            facing: Dir::Right,
            move_timer: 0.0,
            move_delay: PLAYER_MOVE_DELAY,
            shoot_cooldown: 0.0,
            invincible: 0.0,
            exhaust: Vec::new(),
        }
    }

    /// Back to the start tile with fresh timers, as at the start of a stage.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible > 0.0
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub pos: Pos,
    pub dir: Dir,
    pub move_timer: f32,
    pub move_delay: f32,
    /// Seconds until the heading is re-randomised.
    pub change_timer: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flag {
    pub pos: Pos,
    pub collected: bool,
    /// Animation phase in radians; cosmetic only.
    pub phase: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub x: f32,
    pub y: f32,
    pub life: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub trail: Vec<TrailPoint>,
}

impl Bullet {
    /// A bullet leaving the centre of `from`, travelling in `dir`.
    pub fn fired(from: Pos, dir: Dir) -> Self {
        let (x, y) = from.center();
        let (ux, uy) = dir.unit();
        Self {
            x,
            y,
            vx: ux * BULLET_SPEED,
            vy: uy * BULLET_SPEED,
            life: BULLET_LIFE,
            trail: Vec::new(),
        }
    }

    /// Records the current position in the trail and ages older points.
    pub fn age_trail(&mut self, dt: f32) {
        self.trail.push(TrailPoint {
            x: self.x,
            y: self.y,
            life: TRAIL_LIFE,
        });
        self.trail.retain_mut(|t| {
            t.life -= dt;
            t.life > 0.0
        });
    }
}
