use thiserror::Error;

/// Errors raised while loading or building from plan data.
///
/// Plan data is validated before any geometry is produced; degenerate
/// rectangles are refused rather than drawn.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Rectangle '{id}' has non-positive size {w}×{h}")]
    InvalidDimensions { id: String, w: f32, h: f32 },

    #[error("Rectangle '{id}' has a non-finite coordinate")]
    NonFinite { id: String },

    #[error("Duplicate room id '{0}'")]
    DuplicateRoomId(String),

    #[error("Edge ({x1}, {y1}) → ({x2}, {y2}) is not axis-aligned")]
    DiagonalEdge { x1: f32, y1: f32, x2: f32, y2: f32 },

    #[error("Edge at ({x}, {y}) has zero length")]
    DegenerateEdge { x: f32, y: f32 },

    #[error("Plan must have at least one floor")]
    NoFloors,

    #[error("Invalid color '{0}' (expected #rrggbb)")]
    InvalidColor(String),

    #[error("Plan JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plan I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading viewer configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}
