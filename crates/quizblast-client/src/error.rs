use quizblast_tanks::error::WorldError;

/// Errors surfaced by the host binary.
#[derive(Debug)]
pub enum ClientError {
    Io { path: String, source: std::io::Error },
    Json(String),
    World(WorldError),
    BadFlag { flag: String, value: String },
    UnknownFlag(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{path}: {source}"),
            Self::Json(m) => write!(f, "invalid JSON: {m}"),
            Self::World(e) => write!(f, "world setup failed: {e}"),
            Self::BadFlag { flag, value } => write!(f, "bad value for --{flag}: {value:?}"),
            Self::UnknownFlag(flag) => write!(f, "unknown flag: {flag}"),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::World(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WorldError> for ClientError {
    fn from(e: WorldError) -> Self {
        Self::World(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

/// Read a file, tagging failures with the path.
pub fn read_file(path: &str) -> Result<String, ClientError> {
    std::fs::read_to_string(path).map_err(|source| ClientError::Io {
        path: path.to_string(),
        source,
    })
}
