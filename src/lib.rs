//! 방구차 (Banggucha): drive a tank through a generated maze, collect every
//! flag, gas the enemies, and leave through the exit.
//!
//! The simulation (`session`, `step`, `stage`, `maze`) is independent of the
//! terminal; `render` only reads a `Session` and the binary feeds it input.

pub mod constants;
pub mod effects;
pub mod entities;
pub mod error;
pub mod event;
pub mod grid;
pub mod input;
pub mod maze;
pub mod render;
pub mod session;
pub mod settings;
pub mod stage;
mod step;

pub use error::{GameError, GameResult, SettingsError};
pub use event::FrameEvent;
pub use grid::{Dir, Grid, Pos, Tile};
pub use input::{HeldKeys, InputState, Key};
pub use session::{Phase, Session};
pub use settings::Settings;
