use thiserror::Error;

/// Failure to turn embedded or stored data into game state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no level named {0:?}")]
    UnknownLevel(String),
    #[error("campaign has no levels")]
    NoLevels,
    #[error("malformed level grid: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level grid is empty")]
    EmptyGrid,
    #[error("unknown tile symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: String, row: usize, col: usize },
    #[error("level grid must contain exactly one {0}, found {1}")]
    Marker(&'static str, usize),
    #[error("{what} spawn at row {row}, column {col} is not on open ground")]
    BadSpawn { what: String, row: i32, col: i32 },
    #[error("cannot read saved progress: {0}")]
    Io(#[from] std::io::Error),
}
