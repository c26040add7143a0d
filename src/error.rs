use thiserror::Error;

/// The jet momentum admits no perpendicular axis of the required form
#[derive(Debug, Copy, Clone, PartialEq, Error)]
#[error("Invalid input for perpendicular axis: delta = {delta}, a = {a}")]
pub struct InvalidGeometry {
    pub delta: f64,
    pub a: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HistError {
    #[error("Binning needs at least two edges, got {0}")]
    TooFewEdges(usize),
    #[error("Bin edges are not strictly increasing at index {0}")]
    UnorderedEdges(usize),
    #[error("Expected {expected:?} bin contents, got {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("Non-finite bin content in bin ({0}, {1})")]
    NonFiniteContent(usize, usize),
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Failed to read {path:?}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path:?}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No histogram {name:?} in {path:?}")]
    MissingObject { path: String, name: String },
}
