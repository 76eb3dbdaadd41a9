use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use quizblast_core::input::Direction;
use quizblast_core::question::QuestionId;

use crate::error::WorldError;
use crate::trigger::TriggerSpec;
use crate::world::Tile;

/// Tile position in a layout file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePos {
    pub tx: u32,
    pub ty: u32,
}

/// World configuration supplied at initialization: terrain rows, spawn and
/// trigger placement with their question links.
///
/// Rows use one character per tile: `.` empty, `B` brick, `S` steel, `G` bush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldLayout {
    pub name: String,
    pub rows: Vec<String>,
    pub spawn: TilePos,
    #[serde(default = "default_facing")]
    pub facing: Direction,
    #[serde(default)]
    pub triggers: Vec<TriggerSpec>,
}

fn default_facing() -> Direction {
    Direction::Right
}

/// Generated layouts are this many tiles wide.
pub const LAYOUT_WIDTH: u32 = 24;
/// Generated layouts are this many tiles tall.
pub const LAYOUT_HEIGHT: u32 = 20;
/// Triggers placed by [`generate_layout`].
const GENERATED_TRIGGERS: u32 = 4;
/// Generated triggers keep at least this Chebyshev distance from the spawn.
const TRIGGER_SPAWN_CLEARANCE: u32 = 4;

const DEFAULT_ROWS: [&str; 20] = [
    "SSSSSSSSSSSSSSSSSSSSSSSS",
    "S......................S",
    "S......................S",
    "S...BBBB.....GGG.......S",
    "S...B..........G..SS...S",
    "S...B..........G..SS...S",
    "S.........B............S",
    "S..SSS....B....BBBBB...S",
    "S..........GG..........S",
    "S..........GG....B.....S",
    "S.BBBBB..........B.....S",
    "S................B.....S",
    "S......SS.....GGGG.....S",
    "S......SS..............S",
    "S....B.......BBB...S...S",
    "S....B.............S...S",
    "S....B..GGG............S",
    "S..............BBBB....S",
    "S......................S",
    "SSSSSSSSSSSSSSSSSSSSSSSS",
];

/// The built-in 24x20 training ground.
pub fn default_layout() -> WorldLayout {
    let trigger = |tx, ty, q| TriggerSpec {
        tx,
        ty,
        question: QuestionId(q),
    };
    WorldLayout {
        name: "Training Ground".to_string(),
        rows: DEFAULT_ROWS.iter().map(|r| r.to_string()).collect(),
        spawn: TilePos { tx: 2, ty: 2 },
        facing: Direction::Right,
        triggers: vec![
            trigger(10, 5, 1),
            trigger(18, 2, 2),
            trigger(3, 13, 3),
            trigger(20, 16, 4),
            trigger(12, 10, 5),
        ],
    }
}

impl WorldLayout {
    /// Parse a layout from JSON text.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        serde_json::from_str(json).map_err(|e| WorldError::Parse(e.to_string()))
    }
}

/// Load a named layout, preferring a JSON file from the layouts directory.
///
/// Checks env var `QUIZBLAST_LAYOUTS_DIR` (default `config/layouts`) for
/// `{name}.json`. Falls back to [`default_layout`] if the file is missing or
/// unparseable. Structural validation happens when the game is built.
pub fn load_layout(name: &str) -> WorldLayout {
    let dir =
        std::env::var("QUIZBLAST_LAYOUTS_DIR").unwrap_or_else(|_| "config/layouts".to_string());
    load_layout_in(&dir, name)
}

fn load_layout_in(dir: &str, name: &str) -> WorldLayout {
    let path = format!("{dir}/{name}.json");
    let Ok(json) = std::fs::read_to_string(&path) else {
        tracing::debug!(path = %path, "No layout file, using built-in default");
        return default_layout();
    };
    WorldLayout::from_json(&json).unwrap_or_else(|e| {
        tracing::warn!(path = %path, error = %e, "Bad layout file, using built-in default");
        default_layout()
    })
}

/// Generate a deterministic layout from a seed.
///
/// Steel only appears as isolated 2x2 blocks so it can never wall off a
/// region; every brick wall can be shot through.
pub fn generate_layout(seed: u64) -> WorldLayout {
    let (w, h) = (LAYOUT_WIDTH, LAYOUT_HEIGHT);
    let mut grid = vec![Tile::Empty; (w * h) as usize];
    let set = |grid: &mut Vec<Tile>, x: u32, y: u32, tile: Tile| {
        if x > 0 && y > 0 && x < w - 1 && y < h - 1 {
            grid[(y * w + x) as usize] = tile;
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);

    // Brick walls
    for _ in 0..rng.random_range(6u32..10) {
        let len = rng.random_range(2u32..6);
        let x = rng.random_range(1..w - 1);
        let y = rng.random_range(1..h - 1);
        let horizontal = rng.random_bool(0.5);
        for i in 0..len {
            let (px, py) = if horizontal { (x + i, y) } else { (x, y + i) };
            set(&mut grid, px, py, Tile::Brick);
        }
    }

    // Steel blocks
    for _ in 0..rng.random_range(2u32..5) {
        let x = rng.random_range(2..w - 3);
        let y = rng.random_range(2..h - 3);
        for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            set(&mut grid, x + dx, y + dy, Tile::Steel);
        }
    }

    // Bush patches
    for _ in 0..rng.random_range(3u32..6) {
        let x = rng.random_range(1..w - 1);
        let y = rng.random_range(1..h - 1);
        for dy in 0..2 {
            for dx in 0..3 {
                set(&mut grid, x + dx, y + dy, Tile::Bush);
            }
        }
    }

    // Spawn pocket
    let spawn = TilePos { tx: 2, ty: 2 };
    for y in 1..=3 {
        for x in 1..=3 {
            set(&mut grid, x, y, Tile::Empty);
        }
    }

    // Triggers on open ground away from the spawn
    let mut triggers: Vec<TriggerSpec> = Vec::new();
    let mut attempts = 0;
    while (triggers.len() as u32) < GENERATED_TRIGGERS && attempts < 500 {
        attempts += 1;
        let tx = rng.random_range(1..w - 1);
        let ty = rng.random_range(1..h - 1);
        let tile = grid[(ty * w + tx) as usize];
        let clearance = tx.abs_diff(spawn.tx).max(ty.abs_diff(spawn.ty));
        if tile.blocks()
            || clearance < TRIGGER_SPAWN_CLEARANCE
            || triggers.iter().any(|t| t.tx == tx && t.ty == ty)
        {
            continue;
        }
        triggers.push(TriggerSpec {
            tx,
            ty,
            question: QuestionId(triggers.len() as u32 + 1),
        });
    }

    // Boundary ring
    for x in 0..w {
        grid[x as usize] = Tile::Steel;
        grid[((h - 1) * w + x) as usize] = Tile::Steel;
    }
    for y in 0..h {
        grid[(y * w) as usize] = Tile::Steel;
        grid[(y * w + w - 1) as usize] = Tile::Steel;
    }

    WorldLayout {
        name: format!("Generated #{seed}"),
        rows: grid
            .chunks(w as usize)
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect(),
        spawn,
        facing: Direction::Right,
        triggers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileWorld;

    #[test]
    fn default_layout_is_valid_world() {
        let layout = default_layout();
        let world = TileWorld::from_rows(&layout.rows, 32.0).unwrap();
        assert_eq!((world.width(), world.height()), (24, 20));
        for t in &layout.triggers {
            assert!(!world.tile(t.tx, t.ty).blocks());
        }
    }

    #[test]
    fn deterministic_generation() {
        assert_eq!(generate_layout(42), generate_layout(42));
    }

    #[test]
    fn different_seeds_different_layouts() {
        assert_ne!(generate_layout(42).rows, generate_layout(123).rows);
    }

    #[test]
    fn generated_spawn_pocket_is_clear() {
        let layout = generate_layout(7);
        let world = TileWorld::from_rows(&layout.rows, 32.0).unwrap();
        for y in 1..=3 {
            for x in 1..=3 {
                assert_eq!(world.tile(x, y), Tile::Empty);
            }
        }
    }

    #[test]
    fn generated_triggers_have_unique_questions() {
        let layout = generate_layout(99);
        let mut ids: Vec<_> = layout.triggers.iter().map(|t| t.question).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), layout.triggers.len());
        assert!(!layout.triggers.is_empty());
    }

    #[test]
    fn json_roundtrip_preserves_layout() {
        let layout = default_layout();
        let json = serde_json::to_string(&layout).unwrap();
        let loaded: WorldLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, layout);
    }

    #[test]
    fn facing_defaults_when_omitted() {
        let json = r#"{"name":"tiny","rows":["SSS","S.S","SSS"],"spawn":{"tx":1,"ty":1}}"#;
        let layout: WorldLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.facing, Direction::Right);
        assert!(layout.triggers.is_empty());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            WorldLayout::from_json("{\"name\": 3}"),
            Err(WorldError::Parse(_))
        ));
    }

    #[test]
    fn layout_file_is_read_from_dir() {
        let dir = std::env::temp_dir().join(format!("quizblast-layouts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut custom = default_layout();
        custom.name = "custom".to_string();
        std::fs::write(dir.join("custom.json"), serde_json::to_string(&custom).unwrap()).unwrap();
        std::fs::write(dir.join("broken.json"), "{\"rows\": ").unwrap();

        let dir = dir.to_str().unwrap();
        assert_eq!(load_layout_in(dir, "custom"), custom);
        assert_eq!(load_layout_in(dir, "broken"), default_layout());
        assert_eq!(load_layout_in(dir, "absent"), default_layout());
    }

    #[test]
    fn load_layout_falls_back_to_default() {
        assert_eq!(load_layout("definitely-not-a-layout-name"), default_layout());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn generated_boundary_never_empty(seed in any::<u64>()) {
                let layout = generate_layout(seed);
                prop_assert!(TileWorld::from_rows(&layout.rows, 32.0).is_ok());
                let world = TileWorld::from_rows(&layout.rows, 32.0).unwrap();
                for (tx, ty, tile) in world.iter() {
                    if world.is_boundary(tx, ty) {
                        prop_assert_eq!(tile, Tile::Steel);
                    }
                }
            }
        }
    }
}
