use serde::{Deserialize, Serialize};

use crate::game_trait::GameMode;

/// Read-only stats published to the status bar once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub ammo: u32,
    pub hearts: u32,
    pub mode: GameMode,
    pub game_over: bool,
}

/// Consumer of HUD snapshots. Nothing flows back into the simulation.
pub trait HudSink {
    fn publish(&mut self, hud: &HudSnapshot);
}
