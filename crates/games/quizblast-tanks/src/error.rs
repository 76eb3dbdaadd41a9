/// World or config data rejected at construction time, before the loop starts.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldError {
    EmptyGrid,
    RaggedRow { row: usize, expected: usize, found: usize },
    UnknownTileCode { row: usize, col: usize, code: char },
    OpenBoundary { tx: u32, ty: u32 },
    SpawnOutOfBounds { tx: u32, ty: u32 },
    SpawnBlocked { tx: u32, ty: u32 },
    TriggerOutOfBounds { tx: u32, ty: u32 },
    TriggerOnBoundary { tx: u32, ty: u32 },
    TriggerOnSteel { tx: u32, ty: u32 },
    DuplicateTrigger { tx: u32, ty: u32 },
    InvalidConfig(&'static str),
    Parse(String),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "world grid has no rows"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} tiles, expected {expected}"),
            Self::UnknownTileCode { row, col, code } => {
                write!(f, "unknown tile code {code:?} at row {row}, column {col}")
            },
            Self::OpenBoundary { tx, ty } => {
                write!(f, "boundary tile ({tx}, {ty}) is not steel")
            },
            Self::SpawnOutOfBounds { tx, ty } => {
                write!(f, "player spawn ({tx}, {ty}) is outside the grid")
            },
            Self::SpawnBlocked { tx, ty } => {
                write!(f, "player spawn ({tx}, {ty}) overlaps blocking terrain")
            },
            Self::TriggerOutOfBounds { tx, ty } => {
                write!(f, "trigger ({tx}, {ty}) is outside the grid")
            },
            Self::TriggerOnBoundary { tx, ty } => {
                write!(f, "trigger ({tx}, {ty}) sits on the boundary ring")
            },
            Self::TriggerOnSteel { tx, ty } => {
                write!(f, "trigger ({tx}, {ty}) sits on steel and can never be reached")
            },
            Self::DuplicateTrigger { tx, ty } => {
                write!(f, "more than one trigger at ({tx}, {ty})")
            },
            Self::InvalidConfig(m) => write!(f, "invalid config: {m}"),
            Self::Parse(m) => write!(f, "layout parse error: {m}"),
        }
    }
}

impl std::error::Error for WorldError {}
