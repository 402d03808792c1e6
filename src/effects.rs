//! Cosmetic particles and score popups. Nothing in here feeds back into the
//! simulation; the renderer reads these and they expire on their own.

use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::{POPUP_LIFE, POPUP_RISE_SPEED};
use crate::grid::Dir;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spark {
    Smoke,
    Gas,
    Fire,
    Sparkle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub max_life: f32,
    pub kind: Spark,
    pub size: f32,
}

impl Particle {
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScorePopup {
    pub x: f32,
    pub y: f32,
    pub age: f32,
    pub text: String,
}

impl ScorePopup {
    pub fn new(x: f32, y: f32, points: u32) -> Self {
        Self {
            x,
            y,
            age: 0.0,
            text: format!("+{points}"),
        }
    }

    /// Current height above the spawn point, in world units.
    pub fn rise(&self) -> f32 {
        self.age * POPUP_RISE_SPEED
    }
}

fn radial(x: f32, y: f32, angle: f32, speed: f32, life: f32, kind: Spark, size: f32) -> Particle {
    Particle {
        x,
        y,
        vx: angle.cos() * speed,
        vy: angle.sin() * speed,
        life,
        max_life: life,
        kind,
        size,
    }
}

/// Puffs at the cannon tip when the player fires.
pub fn recoil(out: &mut Vec<Particle>, x: f32, y: f32, dir: Dir, rng: &mut impl Rng) {
    let (ux, uy) = dir.unit();
    for _ in 0..5 {
        out.push(Particle {
            x: x + ux * 16.0,
            y: y + uy * 16.0,
            vx: ux * 30.0 + (rng.gen::<f32>() - 0.5) * 40.0,
            vy: uy * 30.0 + (rng.gen::<f32>() - 0.5) * 40.0,
            life: 0.3,
            max_life: 0.3,
            kind: Spark::Smoke,
            size: rng.gen_range(3..=6) as f32,
        });
    }
}

pub fn wall_burst(out: &mut Vec<Particle>, x: f32, y: f32, rng: &mut impl Rng) {
    for _ in 0..8 {
        let angle = rng.gen::<f32>() * TAU;
        let size = rng.gen_range(2..=5) as f32;
        out.push(radial(x, y, angle, 80.0, 0.4, Spark::Gas, size));
    }
}

pub fn explosion(out: &mut Vec<Particle>, x: f32, y: f32, life: f32, rng: &mut impl Rng) {
    for _ in 0..20 {
        let angle = rng.gen::<f32>() * TAU;
        let speed = 50.0 + rng.gen::<f32>() * 150.0;
        let size = rng.gen_range(3..=8) as f32;
        out.push(radial(x, y, angle, speed, life, Spark::Fire, size));
    }
}

/// An even ring of twelve sparks.
pub fn sparkle(out: &mut Vec<Particle>, x: f32, y: f32, rng: &mut impl Rng) {
    for i in 0..12 {
        let angle = TAU * i as f32 / 12.0;
        let size = rng.gen_range(2..=5) as f32;
        out.push(radial(x, y, angle, 120.0, 0.5, Spark::Sparkle, size));
    }
}

pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    particles.retain_mut(|p| {
        p.x += p.vx * dt;
        p.y += p.vy * dt;
        p.life -= dt;
        p.life > 0.0
    });
}

pub fn update_popups(popups: &mut Vec<ScorePopup>, dt: f32) {
    popups.retain_mut(|p| {
        p.age += dt;
        p.age < POPUP_LIFE
    });
}
