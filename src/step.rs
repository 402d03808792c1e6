//! The per-frame update passes. `Session::step` runs them in order:
//! player, bullets, enemies, effects, then collisions.

use rand::Rng;

use crate::constants::{
    BULLET_HIT_RADIUS, ENEMY_SCORE, FLAG_SCORE, HIT_INVINCIBILITY, SHOOT_COOLDOWN,
    STAGE_CLEAR_BONUS,
};
use crate::effects::{self, ScorePopup};
use crate::entities::{Bullet, Exhaust, PLAYER_START};
use crate::event::FrameEvent;
use crate::grid::Dir;
use crate::input::InputState;
use crate::session::{Phase, Session};

impl Session {
    pub(crate) fn update_player(&mut self, dt: f32, input: &InputState, rng: &mut impl Rng) {
        let player = &mut self.player;
        player.move_timer -= dt;
        player.shoot_cooldown -= dt;

        if player.move_timer <= 0.0 {
            if let Some(dir) = input.direction() {
                player.facing = dir;
                // A blocked move keeps the timer expired so the next step retries.
                if let Some(next) = self.world.grid.step(player.pos, dir) {
                    player.exhaust.push(Exhaust::new(player.pos));
                    player.pos = next;
                    player.move_timer = player.move_delay;
                }
            }
        }

        if input.fire && player.shoot_cooldown <= 0.0 {
            player.shoot_cooldown = SHOOT_COOLDOWN;
            self.shoot(rng);
        }

        self.player.exhaust.retain_mut(|e| {
            e.life -= dt;
            e.life > 0.0
        });
    }

    pub(crate) fn shoot(&mut self, rng: &mut impl Rng) {
        let from = self.player.pos;
        let dir = self.player.facing;
        self.world.bullets.push(Bullet::fired(from, dir));
        let (x, y) = from.center();
        effects::recoil(&mut self.world.particles, x, y, dir, rng);
    }

    /// Moves every bullet and resolves, in order: leaving the grid or hitting
    /// a wall, hitting an enemy, running out of life. Each bullet dies of at
    /// most one of these.
    pub(crate) fn update_bullets(&mut self, dt: f32, rng: &mut impl Rng, events: &mut Vec<FrameEvent>) {
        let stage = self.stage_number;
        let world = &mut self.world;
        let mut survivors = Vec::with_capacity(world.bullets.len());

        for mut bullet in std::mem::take(&mut world.bullets) {
            bullet.age_trail(dt);
            bullet.x += bullet.vx * dt;
            bullet.y += bullet.vy * dt;
            bullet.life -= dt;

            let on_wall = match world.grid.tile_at_point(bullet.x, bullet.y) {
                Some(pos) => world.grid.is_wall(pos),
                None => true,
            };
            if on_wall {
                effects::wall_burst(&mut world.particles, bullet.x, bullet.y, rng);
                continue;
            }

            let hit = world.enemies.iter().rposition(|enemy| {
                let (ex, ey) = enemy.pos.center();
                (bullet.x - ex).hypot(bullet.y - ey) < BULLET_HIT_RADIUS
            });
            if let Some(idx) = hit {
                let enemy = world.enemies.remove(idx);
                let points = ENEMY_SCORE * stage;
                self.score += points;
                let (ex, ey) = enemy.pos.center();
                effects::explosion(&mut world.particles, ex, ey, 0.7, rng);
                world.popups.push(ScorePopup::new(ex, ey, points));
                log::debug!("enemy destroyed at ({}, {})", enemy.pos.x, enemy.pos.y);
                events.push(FrameEvent::EnemyDestroyed {
                    pos: enemy.pos,
                    points,
                });
                continue;
            }

            if bullet.life > 0.0 {
                survivors.push(bullet);
            }
        }
        world.bullets = survivors;
    }

    /// Random walk: a timed heading change, and a gated step that picks a new
    /// heading on the spot when blocked.
    pub(crate) fn update_enemies(&mut self, dt: f32, rng: &mut impl Rng) {
        let world = &mut self.world;
        for enemy in world.enemies.iter_mut() {
            enemy.move_timer -= dt;
            enemy.change_timer -= dt;

            if enemy.change_timer <= 0.0 {
                enemy.dir = Dir::random(rng);
                enemy.change_timer = rng.gen_range(2..=5) as f32;
            }

            if enemy.move_timer <= 0.0 {
                match world.grid.step(enemy.pos, enemy.dir) {
                    Some(next) => enemy.pos = next,
                    None => enemy.dir = Dir::random(rng),
                }
                enemy.move_timer = enemy.move_delay;
            }
        }
    }

    pub(crate) fn update_effects(&mut self, dt: f32) {
        effects::update_particles(&mut self.world.particles, dt);
        effects::update_popups(&mut self.world.popups, dt);
    }

    pub(crate) fn check_collisions(&mut self, rng: &mut impl Rng, events: &mut Vec<FrameEvent>) {
        let pos = self.player.pos;
        let stage = self.stage_number;
        let world = &mut self.world;

        for flag in world.flags.iter_mut() {
            if flag.collected || flag.pos != pos {
                continue;
            }
            flag.collected = true;
            world.collected_flags += 1;
            let points = FLAG_SCORE * stage;
            self.score += points;

            let (fx, fy) = flag.pos.center();
            effects::sparkle(&mut world.particles, fx, fy, rng);
            world.popups.push(ScorePopup::new(fx, fy, points));
            log::debug!("flag {}/{} collected", world.collected_flags, world.total_flags);
            events.push(FrameEvent::FlagCollected { pos, points });

            if !world.exit_open && world.collected_flags >= world.total_flags {
                world.exit_open = true;
                log::debug!("exit open");
                events.push(FrameEvent::ExitOpened);
            }
        }

        if world.exit_open && pos == world.exit {
            self.clear_stage(events);
            return;
        }

        if !self.player.is_invincible() && self.world.enemy_at(pos) {
            self.player_hit(rng, events);
        }
    }

    fn player_hit(&mut self, rng: &mut impl Rng, events: &mut Vec<FrameEvent>) {
        self.lives = self.lives.saturating_sub(1);
        let (x, y) = self.player.pos.center();
        effects::explosion(&mut self.world.particles, x, y, 0.8, rng);
        log::debug!("player hit, {} lives left", self.lives);
        events.push(FrameEvent::PlayerHit {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.phase = Phase::GameOver;
            log::info!("game over on stage {} with {} points", self.stage_number, self.score);
            events.push(FrameEvent::GameOver {
                final_score: self.score,
            });
        } else {
            self.player.pos = PLAYER_START;
            self.player.invincible = HIT_INVINCIBILITY;
        }
    }

    fn clear_stage(&mut self, events: &mut Vec<FrameEvent>) {
        let bonus = STAGE_CLEAR_BONUS * self.stage_number;
        self.score += bonus;
        self.phase = Phase::StageClear;
        log::info!("stage {} clear, bonus {}", self.stage_number, bonus);
        events.push(FrameEvent::StageClear {
            stage: self.stage_number,
            bonus,
        });
    }
}
