use banggucha::constants::{MAX_FRAME_DT, PLAYER_MOVE_DELAY, SHOOT_COOLDOWN, TILE};
use banggucha::effects::Spark;
use banggucha::entities::{Bullet, Enemy, Flag};
use banggucha::stage::Stage;
use banggucha::{Dir, FrameEvent, Grid, InputState, Key, Phase, Pos, Session};

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = MAX_FRAME_DT;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Player starts at (1, 1); the exit is (5, 3).
fn loop_session(stage: u32) -> Session {
    let grid = Grid::from_rows(&[
        "#######", //
        "#.....#",
        "#.###.#",
        "#.....#",
        "#######",
    ]);
    Session::with_world(stage, Stage::bare(grid))
}

/// A long straight corridor along row 1.
fn corridor_session() -> Session {
    let row = format!("#{}#", ".".repeat(23));
    let wall = "#".repeat(25);
    let grid = Grid::from_rows(&[&wall, &row, &wall]);
    Session::with_world(1, Stage::bare(grid))
}

/// An enemy that stays put and keeps its heading for the whole test.
fn parked_enemy(pos: Pos) -> Enemy {
    Enemy {
        pos,
        dir: Dir::Down,
        move_timer: 1000.0,
        move_delay: 1000.0,
        change_timer: 1000.0,
    }
}

fn flag(pos: Pos) -> Flag {
    Flag {
        pos,
        collected: false,
        phase: 0.0,
    }
}

fn held(keys: &[Key]) -> InputState {
    let mut input = InputState::default();
    for &key in keys {
        input.press(key);
    }
    input
}

/// Steps until the player leaves its current tile, collecting all events.
fn step_until_moved(s: &mut Session, input: &InputState, rng: &mut StdRng) -> Vec<FrameEvent> {
    let from = s.player.pos;
    let mut events = Vec::new();
    for _ in 0..10 {
        events.extend(s.step(DT, input, rng));
        if s.player.pos != from {
            return events;
        }
    }
    panic!("player never left {from:?}");
}

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn move_into_wall_is_a_no_op() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.step(DT, &held(&[Key::Up]), &mut rng);
    assert_eq!(s.player.pos, Pos::new(1, 1));
    assert_eq!(s.player.facing, Dir::Up);
    // Cooldown was not reset, so the player can move right away.
    assert!(s.player.move_timer <= 0.0);
    assert!(s.player.exhaust.is_empty());

    s.step(DT, &held(&[Key::Right]), &mut rng);
    assert_eq!(s.player.pos, Pos::new(2, 1));
}

#[test]
fn move_one_tile_then_wait_for_cooldown() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    let right = held(&[Key::Right]);

    s.step(DT, &right, &mut rng);
    assert_eq!(s.player.pos, Pos::new(2, 1));
    assert!((s.player.move_timer - PLAYER_MOVE_DELAY).abs() < 1e-6);
    assert_eq!(s.player.exhaust.len(), 1);
    assert_eq!(s.player.exhaust[0].pos, Pos::new(1, 1));

    // 0.12 s of cooldown spans two more 0.05 s steps.
    for _ in 0..2 {
        s.step(DT, &right, &mut rng);
        assert_eq!(s.player.pos, Pos::new(2, 1));
    }
    s.step(DT, &right, &mut rng);
    assert_eq!(s.player.pos, Pos::new(3, 1));
}

#[test]
fn up_beats_right_even_when_blocked() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.step(DT, &held(&[Key::Right, Key::Up]), &mut rng);
    assert_eq!(s.player.pos, Pos::new(1, 1));
    assert_eq!(s.player.facing, Dir::Up);

    s.step(DT, &held(&[Key::Right, Key::Down]), &mut rng);
    assert_eq!(s.player.pos, Pos::new(1, 2));
}

#[test]
fn exhaust_fades() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.step(DT, &held(&[Key::Right]), &mut rng);
    assert_eq!(s.player.exhaust.len(), 1);
    for _ in 0..10 {
        s.step(DT, &InputState::default(), &mut rng);
    }
    assert!(s.player.exhaust.is_empty());
}

// ── Shooting & bullets ────────────────────────────────────────────────────────

#[test]
fn fire_is_gated_by_cooldown() {
    let mut s = corridor_session();
    let mut rng = seeded_rng();
    let fire = held(&[Key::Fire]);

    s.step(DT, &fire, &mut rng);
    assert_eq!(s.world.bullets.len(), 1);
    assert!((s.player.shoot_cooldown - SHOOT_COOLDOWN).abs() < 1e-6);
    let b = &s.world.bullets[0];
    assert!((b.x - (1.5 * TILE + 280.0 * DT)).abs() < 1e-3);
    assert!((b.y - 1.5 * TILE).abs() < 1e-3);
    assert!(s.world.particles.iter().any(|p| p.kind == Spark::Smoke));

    s.step(DT, &fire, &mut rng);
    assert_eq!(s.world.bullets.len(), 1);

    // 0.4 s of cooldown is over by the tenth step.
    for _ in 0..8 {
        s.step(DT, &fire, &mut rng);
    }
    assert_eq!(s.world.bullets.len(), 2);
}

#[test]
fn bullet_dies_on_wall() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.player.facing = Dir::Up;
    s.step(DT, &held(&[Key::Fire]), &mut rng);
    // Spawned at y = 48, moving up 14 per step; the wall row starts at y < 32.
    assert_eq!(s.world.bullets.len(), 1);
    s.step(DT, &InputState::default(), &mut rng);
    assert!(s.world.bullets.is_empty());
    assert!(s.world.particles.iter().any(|p| p.kind == Spark::Gas));
}

#[test]
fn bullet_expires_after_its_lifetime() {
    let mut s = corridor_session();
    let mut rng = seeded_rng();
    let idle = InputState::default();
    s.step(DT, &held(&[Key::Fire]), &mut rng);

    let mut last_life = s.world.bullets[0].life;
    for _ in 0..38 {
        s.step(DT, &idle, &mut rng);
        let life = s.world.bullets[0].life;
        assert!(life < last_life);
        last_life = life;
    }
    s.step(DT, &idle, &mut rng);
    s.step(DT, &idle, &mut rng);
    assert!(s.world.bullets.is_empty());
    assert!(!s.world.particles.iter().any(|p| p.kind == Spark::Gas));
}

#[test]
fn bullet_destroys_enemy_on_stage_one() {
    let mut s = corridor_session();
    let mut rng = seeded_rng();
    s.world.enemies.push(parked_enemy(Pos::new(3, 1)));

    let mut events = s.step(DT, &held(&[Key::Fire]), &mut rng);
    for _ in 0..4 {
        events.extend(s.step(DT, &InputState::default(), &mut rng));
    }

    assert!(s.world.enemies.is_empty());
    assert!(s.world.bullets.is_empty());
    assert_eq!(s.score, 200);
    assert_eq!(
        events,
        vec![FrameEvent::EnemyDestroyed {
            pos: Pos::new(3, 1),
            points: 200
        }]
    );
    assert_eq!(s.world.popups.len(), 1);
    assert_eq!(s.world.popups[0].text, "+200");
}

#[test]
fn one_bullet_kills_one_enemy() {
    let mut s = corridor_session();
    s.stage_number = 3;
    let mut rng = seeded_rng();
    s.world.enemies.push(parked_enemy(Pos::new(3, 1)));
    s.world.enemies.push(parked_enemy(Pos::new(3, 1)));

    s.step(DT, &held(&[Key::Fire]), &mut rng);
    for _ in 0..4 {
        s.step(DT, &InputState::default(), &mut rng);
    }
    assert_eq!(s.world.enemies.len(), 1);
    assert_eq!(s.score, 600);
}

#[test]
fn wall_stops_bullet_before_it_reaches_an_enemy() {
    let mut s = corridor_session();
    let mut rng = seeded_rng();
    s.world.enemies.push(parked_enemy(Pos::new(5, 1)));
    // Ends the step at (176, 30): inside the top wall, 18 units from the enemy centre.
    s.world.bullets.push(Bullet {
        x: 5.0 * TILE + TILE / 2.0,
        y: 44.0,
        vx: 0.0,
        vy: -280.0,
        life: 2.0,
        trail: Vec::new(),
    });

    let events = s.step(DT, &InputState::default(), &mut rng);
    assert!(events.is_empty());
    assert_eq!(s.world.enemies.len(), 1);
    assert_eq!(s.score, 0);
    assert!(s.world.bullets.is_empty());
    assert!(s.world.particles.iter().any(|p| p.kind == Spark::Gas));
}

#[test]
fn bullet_on_its_last_step_still_hits() {
    let mut s = corridor_session();
    let mut rng = seeded_rng();
    s.world.enemies.push(parked_enemy(Pos::new(5, 1)));
    // Ends the step 16 units left of the enemy centre with its life spent.
    s.world.bullets.push(Bullet {
        x: 146.0,
        y: TILE + TILE / 2.0,
        vx: 280.0,
        vy: 0.0,
        life: 0.03,
        trail: Vec::new(),
    });

    let events = s.step(DT, &InputState::default(), &mut rng);
    assert!(s.world.enemies.is_empty());
    assert!(s.world.bullets.is_empty());
    assert_eq!(s.score, 200);
    assert_eq!(
        events,
        vec![FrameEvent::EnemyDestroyed {
            pos: Pos::new(5, 1),
            points: 200
        }]
    );
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[test]
fn blocked_enemy_turns_without_moving() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.world.enemies.push(Enemy {
        pos: Pos::new(1, 3),
        dir: Dir::Left,
        move_timer: 0.0,
        move_delay: 0.4,
        change_timer: 100.0,
    });
    s.step(DT, &InputState::default(), &mut rng);
    let enemy = &s.world.enemies[0];
    assert_eq!(enemy.pos, Pos::new(1, 3));
    assert!((enemy.move_timer - 0.4).abs() < 1e-6);
}

#[test]
fn enemy_walks_on_its_tick() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.world.enemies.push(Enemy {
        pos: Pos::new(3, 3),
        dir: Dir::Right,
        move_timer: 0.0,
        move_delay: 0.2,
        change_timer: 100.0,
    });
    s.step(DT, &InputState::default(), &mut rng);
    assert_eq!(s.world.enemies[0].pos, Pos::new(4, 3));
    s.step(DT, &InputState::default(), &mut rng);
    assert_eq!(s.world.enemies[0].pos, Pos::new(4, 3));
}

#[test]
fn enemy_heading_timer_rerolls() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.world.enemies.push(Enemy {
        pos: Pos::new(3, 3),
        dir: Dir::Right,
        move_timer: 100.0,
        move_delay: 100.0,
        change_timer: 0.01,
    });
    s.step(DT, &InputState::default(), &mut rng);
    let timer = s.world.enemies[0].change_timer;
    assert!([2.0, 3.0, 4.0, 5.0].contains(&timer), "got {timer}");
}

// ── Flags & exit ──────────────────────────────────────────────────────────────

#[test]
fn last_flag_opens_exit_in_the_same_step() {
    let mut s = loop_session(2);
    let mut rng = seeded_rng();
    s.world.flags = vec![flag(Pos::new(2, 1)), flag(Pos::new(3, 1))];
    s.world.total_flags = 2;
    let right = held(&[Key::Right]);

    let events = step_until_moved(&mut s, &right, &mut rng);
    assert_eq!(s.world.collected_flags, 1);
    assert_eq!(s.score, 200);
    assert!(!s.world.exit_open);
    assert_eq!(
        events,
        vec![FrameEvent::FlagCollected {
            pos: Pos::new(2, 1),
            points: 200
        }]
    );

    let events = step_until_moved(&mut s, &right, &mut rng);
    assert_eq!(s.world.collected_flags, 2);
    assert!(s.world.exit_open);
    assert_eq!(events.last(), Some(&FrameEvent::ExitOpened));

    // Walking back over collected flags changes nothing.
    let left = held(&[Key::Left]);
    let events = step_until_moved(&mut s, &left, &mut rng);
    assert!(events.is_empty());
    assert_eq!(s.world.collected_flags, 2);
    assert!(s.world.exit_open);
}

#[test]
fn closed_exit_is_just_floor() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.world.total_flags = 1;
    s.world.flags = vec![flag(Pos::new(1, 3))];
    s.player.pos = Pos::new(5, 2);
    s.step(DT, &held(&[Key::Down]), &mut rng);
    assert_eq!(s.player.pos, s.world.exit);
    assert_eq!(s.phase, Phase::Running);
}

#[test]
fn reaching_open_exit_clears_stage() {
    let mut s = loop_session(3);
    let mut rng = seeded_rng();
    s.world.exit_open = true;
    s.player.pos = Pos::new(5, 2);
    s.score = 100;

    let events = s.step(DT, &held(&[Key::Down]), &mut rng);
    assert_eq!(s.phase, Phase::StageClear);
    assert!(s.is_stage_clear());
    assert_eq!(s.score, 100 + 1500);
    assert_eq!(events, vec![FrameEvent::StageClear { stage: 3, bonus: 1500 }]);

    // Frozen until the host moves on.
    let events = s.step(DT, &held(&[Key::Up]), &mut rng);
    assert!(events.is_empty());
    assert_eq!(s.player.pos, Pos::new(5, 3));
}

// ── Enemy contact ─────────────────────────────────────────────────────────────

#[test]
fn last_life_lost_is_game_over() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.lives = 1;
    s.world.enemies.push(parked_enemy(Pos::new(2, 1)));

    let events = s.step(DT, &held(&[Key::Right]), &mut rng);
    assert_eq!(s.lives, 0);
    assert_eq!(s.phase, Phase::GameOver);
    assert!(s.is_game_over());
    assert_eq!(
        events,
        vec![
            FrameEvent::PlayerHit { lives_left: 0 },
            FrameEvent::GameOver { final_score: 0 },
        ]
    );
    assert!(s.world.particles.iter().any(|p| p.kind == Spark::Fire));
}

#[test]
fn hit_resets_player_with_invincibility() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.world.enemies.push(parked_enemy(Pos::new(2, 1)));
    s.world.enemies.push(parked_enemy(Pos::new(1, 1)));

    s.step(DT, &held(&[Key::Right]), &mut rng);
    assert_eq!(s.lives, 2);
    assert_eq!(s.player.pos, Pos::new(1, 1));
    assert!(s.player.invincible > 1.9 && s.player.invincible <= 2.0);

    // Standing on an enemy while invincible does no damage.
    let idle = InputState::default();
    let mut last = s.player.invincible;
    while s.player.invincible > 0.0 {
        s.step(DT, &idle, &mut rng);
        assert_eq!(s.lives, 2);
        assert!(s.player.invincible < last);
        last = s.player.invincible;
    }
    assert_eq!(s.player.invincible, 0.0);

    s.step(DT, &idle, &mut rng);
    assert_eq!(s.lives, 1);
}

// ── Step bookkeeping ──────────────────────────────────────────────────────────

#[test]
fn large_deltas_are_clamped() {
    let mut s = loop_session(1);
    let mut rng = seeded_rng();
    s.step(1.0, &InputState::default(), &mut rng);
    assert!((s.clock - MAX_FRAME_DT).abs() < 1e-6);
    s.step(-1.0, &InputState::default(), &mut rng);
    assert!((s.clock - MAX_FRAME_DT).abs() < 1e-6);
}
