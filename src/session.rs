//! Stage progression, lives and score around the per-frame step.
//!
//! ```text
//! Title --confirm--> Running --exit reached--> StageClear --confirm--> Running
//!                       |
//!                       +--last life lost--> GameOver --confirm--> Running (stage 1)
//! ```

use rand::Rng;

use crate::constants::{MAX_FRAME_DT, START_LIVES};
use crate::entities::Player;
use crate::event::FrameEvent;
use crate::grid::{Grid, Tile};
use crate::input::InputState;
use crate::stage::{self, Stage};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing generated yet; waiting for the first confirm.
    Title,
    Running,
    StageClear,
    GameOver,
}

/// The whole simulation. Hosts read it between steps and never write to it.
#[derive(Clone, Debug)]
pub struct Session {
    pub cols: usize,
    pub rows: usize,
    pub stage_number: u32,
    pub score: u32,
    pub lives: u32,
    pub phase: Phase,
    pub player: Player,
    pub world: Stage,
    /// Simulated seconds since the session was created; drives blinking and bobbing.
    pub clock: f32,
}

impl Session {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            stage_number: 1,
            score: 0,
            lives: START_LIVES,
            phase: Phase::Title,
            player: Player::new(),
            world: Stage::bare(Grid::filled(cols, rows, Tile::Wall)),
            clock: 0.0,
        }
    }

    /// A running session on a hand-built stage.
    pub fn with_world(stage_number: u32, world: Stage) -> Self {
        Self {
            cols: world.grid.width(),
            rows: world.grid.height(),
            stage_number,
            phase: Phase::Running,
            world,
            ..Self::new(0, 0)
        }
    }

    /// Fresh game from stage 1 with full lives.
    pub fn start(&mut self, rng: &mut impl Rng) {
        self.stage_number = 1;
        self.score = 0;
        self.lives = START_LIVES;
        log::info!("new game");
        self.init_stage(rng);
    }

    pub fn restart(&mut self, rng: &mut impl Rng) {
        self.start(rng);
    }

    /// Moves on from a cleared stage. Does nothing in any other phase.
    pub fn next_stage(&mut self, rng: &mut impl Rng) {
        if self.phase != Phase::StageClear {
            return;
        }
        self.stage_number += 1;
        self.init_stage(rng);
    }

    /// The confirm key: starts from the title, advances past a cleared stage,
    /// restarts after game over. Ignored while running.
    pub fn confirm(&mut self, rng: &mut impl Rng) {
        match self.phase {
            Phase::Title => self.start(rng),
            Phase::StageClear => self.next_stage(rng),
            Phase::GameOver => self.restart(rng),
            Phase::Running => {}
        }
    }

    fn init_stage(&mut self, rng: &mut impl Rng) {
        self.world = stage::init_stage(rng, self.stage_number, self.cols, self.rows);
        self.player.reset();
        self.phase = Phase::Running;
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_stage_clear(&self) -> bool {
        self.phase == Phase::StageClear
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Advance the simulation by `dt` seconds (clamped to `MAX_FRAME_DT`).
    /// Outside `Phase::Running` this is a no-op.
    pub fn step(&mut self, dt: f32, input: &InputState, rng: &mut impl Rng) -> Vec<FrameEvent> {
        let mut events = Vec::new();
        if self.phase != Phase::Running {
            return events;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        log::trace!("step dt={:.4} stage={}", dt, self.stage_number);
        self.clock += dt;

        self.update_player(dt, input, rng);
        self.update_bullets(dt, rng, &mut events);
        self.update_enemies(dt, rng);
        self.update_effects(dt);
        self.check_collisions(rng, &mut events);

        if self.player.invincible > 0.0 {
            self.player.invincible = (self.player.invincible - dt).max(0.0);
        }
        events
    }
}
