use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while reducing, formatting, or rendering analysis data.
///
/// The validation variants exist so that bad inputs fail at the crate boundary with a
/// description of the precondition they broke, instead of surfacing as a panic deep inside
/// a numeric or rendering call.
#[derive(Error, Debug)]
pub enum Error {
    #[error("series '{name}' is empty")]
    EmptySeries { name: &'static str },

    #[error("series '{left}' has {left_len} values but '{right}' has {right_len}")]
    LengthMismatch {
        left: &'static str,
        left_len: usize,
        right: &'static str,
        right_len: usize,
    },

    #[error("series '{name}' holds a non-finite value at index {index}")]
    NonFinite { name: &'static str, index: usize },

    #[error("frame {frame} holds {natoms} atoms, expected {expected}")]
    AtomCountMismatch {
        frame: usize,
        natoms: usize,
        expected: usize,
    },

    #[error("no atoms match the selection")]
    EmptySelection,

    #[error("at least {required} frames are required, found {nframes}")]
    TooFewFrames { required: usize, nframes: usize },

    #[error("grid value {value} at row {row}, column {col} cannot be mapped onto a logarithmic color scale")]
    NonPositiveGrid { value: f64, row: usize, col: usize },

    #[error("grid has {rows} rows of {cols} values, expected {expected_rows} rows of {expected_cols}")]
    GridShape {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("bin width must be positive, got {0}")]
    BadBinWidth(f64),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to render plot: {0}")]
    Render(String),
}

impl Error {
    /// Wrap a rendering backend failure.
    pub(crate) fn render(err: impl std::fmt::Display) -> Self {
        Error::Render(err.to_string())
    }
}
