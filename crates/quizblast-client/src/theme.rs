use serde::{Deserialize, Serialize};

/// Client visual theme. All colors are stored as `[f32; 4]` (RGBA) or
/// `[f32; 3]` (RGB).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub arena: ArenaTheme,
    pub tank: TankTheme,
    pub quiz: QuizTheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTheme {
    pub background: [f32; 3],
    pub brick: [f32; 3],
    pub brick_mortar: [f32; 3],
    pub steel: [f32; 3],
    pub steel_highlight: [f32; 3],
    pub steel_shadow: [f32; 3],
    /// Bush canopy; alpha controls how much of the tank shows through.
    pub bush: [f32; 4],
    pub bush_leaf: [f32; 4],
    /// Per-tile brightness jitter for procedural patterns, 0..=1.
    pub pattern_jitter: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTheme {
    pub body: [f32; 3],
    pub tread: [f32; 3],
    pub barrel: [f32; 3],
    pub bullet: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizTheme {
    pub trigger: [f32; 3],
    pub pulse_min_alpha: f32,
    pub pulse_max_alpha: f32,
    pub pulse_period_secs: f32,
    /// Dim veil over the whole frame while a question is open.
    pub paused_veil: [f32; 4],
}

impl Default for ArenaTheme {
    fn default() -> Self {
        Self {
            background: [0.08, 0.08, 0.1],
            brick: [0.66, 0.3, 0.16],
            brick_mortar: [0.35, 0.2, 0.14],
            steel: [0.62, 0.64, 0.68],
            steel_highlight: [0.85, 0.87, 0.9],
            steel_shadow: [0.36, 0.37, 0.4],
            bush: [0.18, 0.55, 0.2, 0.75],
            bush_leaf: [0.3, 0.75, 0.3, 0.9],
            pattern_jitter: 0.12,
        }
    }
}

impl Default for TankTheme {
    fn default() -> Self {
        Self {
            body: [0.9, 0.78, 0.2],
            tread: [0.45, 0.38, 0.12],
            barrel: [0.98, 0.95, 0.8],
            bullet: [1.0, 1.0, 1.0],
        }
    }
}

impl Default for QuizTheme {
    fn default() -> Self {
        Self {
            trigger: [0.3, 0.6, 1.0],
            pulse_min_alpha: 0.2,
            pulse_max_alpha: 0.7,
            pulse_period_secs: 1.5,
            paused_veil: [0.0, 0.0, 0.05, 0.55],
        }
    }
}

impl Theme {
    /// Load the theme from a JSON file, falling back to defaults.
    ///
    /// Checks env var `QUIZBLAST_THEME` (default `config/theme.json`).
    pub fn load() -> Self {
        let path =
            std::env::var("QUIZBLAST_THEME").unwrap_or_else(|_| "config/theme.json".to_string());
        match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using default theme");
                Theme::default()
            }),
            Err(_) => Theme::default(),
        }
    }
}

/// Opaque RGBA from an RGB theme color.
pub fn rgb(c: &[f32; 3]) -> [f32; 4] {
    [c[0], c[1], c[2], 1.0]
}

/// Scale an RGB color's brightness.
pub fn shade(c: &[f32; 3], factor: f32) -> [f32; 4] {
    [c[0] * factor, c[1] * factor, c[2] * factor, 1.0]
}
