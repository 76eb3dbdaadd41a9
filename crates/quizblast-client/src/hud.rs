use std::io::Write;

use quizblast_core::hud::{HudSink, HudSnapshot};

/// Logs the HUD through `tracing`, only when it changes.
#[derive(Debug, Default)]
pub struct LogHud {
    last: Option<HudSnapshot>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&HudSnapshot> {
        self.last.as_ref()
    }
}

impl HudSink for LogHud {
    fn publish(&mut self, hud: &HudSnapshot) {
        if self.last.as_ref() == Some(hud) {
            return;
        }
        tracing::info!(
            ammo = hud.ammo,
            hearts = hud.hearts,
            mode = ?hud.mode,
            game_over = hud.game_over,
            "HUD"
        );
        self.last = Some(*hud);
    }
}

/// Writes one JSON object per changed snapshot, newline-delimited.
pub struct JsonHud<W> {
    out: W,
    last: Option<HudSnapshot>,
}

impl<W: Write> JsonHud<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> HudSink for JsonHud<W> {
    fn publish(&mut self, hud: &HudSnapshot) {
        if self.last.as_ref() == Some(hud) {
            return;
        }
        self.last = Some(*hud);
        let line = match serde_json::to_string(hud) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode HUD");
                return;
            },
        };
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::warn!(error = %e, "Failed to write HUD");
        }
    }
}
