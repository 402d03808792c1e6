use std::io::{self, BufWriter, Stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::rngs::StdRng;
use rand::SeedableRng;

use banggucha::constants::{COLS, ROWS};
use banggucha::render::{self, Renderer};
use banggucha::{FrameEvent, GameResult, HeldKeys, Key, Session, Settings};

fn main() -> GameResult<()> {
    let _ = env_logger::Builder::from_default_env().try_init();
    let settings = Settings::from_env();

    let mut stdout = BufWriter::new(io::stdout());
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;
    let keyboard_enhanced = stdout
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let result = run(&mut stdout, &settings);

    if keyboard_enhanced {
        let _ = stdout.execute(PopKeyboardEnhancementFlags);
    }
    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Enter => Some(Key::Confirm),
        KeyCode::Char(c) => Key::from_char(c),
        _ => None,
    }
}

fn run(stdout: &mut BufWriter<Stdout>, settings: &Settings) -> GameResult<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_time = Duration::from_micros(1_000_000 / settings.fps.max(1));
    let hold = Duration::from_millis(settings.hold_ms);

    let mut session = Session::new(COLS, ROWS);
    let mut renderer = Renderer::new(COLS, ROWS);
    let mut keys = HeldKeys::default();
    let mut last_step = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                _ => {}
            }
            let Some(mapped) = map_key(key.code) else {
                continue;
            };
            match key.kind {
                KeyEventKind::Press if mapped == Key::Confirm => {
                    session.confirm(&mut rng);
                    last_step = Instant::now();
                }
                KeyEventKind::Press | KeyEventKind::Repeat => keys.press(mapped, Instant::now()),
                KeyEventKind::Release => keys.release(mapped),
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_step).as_secs_f32();
        last_step = now;
        let input = keys.snapshot(now, hold);
        for event in session.step(dt, &input, &mut rng) {
            if let FrameEvent::StageClear { .. } | FrameEvent::GameOver { .. } = event {
                keys = HeldKeys::default();
            }
            log::debug!("{event:?}");
        }

        render::render(stdout, &session, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
