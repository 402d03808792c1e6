use crate::grid::Pos;

/// Things that happened during one simulation step, in the order they
/// happened. The host drains these once per frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameEvent {
    FlagCollected { pos: Pos, points: u32 },
    ExitOpened,
    EnemyDestroyed { pos: Pos, points: u32 },
    PlayerHit { lives_left: u32 },
    StageClear { stage: u32, bonus: u32 },
    GameOver { final_score: u32 },
}
