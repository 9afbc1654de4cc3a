use super::{DType};

/// Errors that can occur while building or wrapping an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WrapError {
    /// The container is neither a flat nor a tiled implementation.
    #[error("container kind '{kind}' is not supported")]
    UnsupportedContainerKind { kind: &'static str },

    /// A wide dimension does not fit in the narrow representation.
    #[error("dimension {value} on axis {axis} does not fit in 32 bits")]
    DimensionOverflow { axis: usize, value: u64 },

    #[error("dimension {value} on axis {axis} is negative")]
    NegativeDimension { axis: usize, value: i64 },

    /// The stored element type differs from the requested one.
    #[error("type mismatch: expected {expected} but the container stores {found}")]
    TypeMismatch { expected: DType, found: DType },

    /// The number of elements in an extent does not fit in a `usize`.
    #[error("extent {dims:?} has too many elements")]
    ExtentTooLarge { dims: Box<[u64]> },

    #[error("buffer length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("tile count mismatch: expected {expected}, found {found}")]
    TileCountMismatch { expected: usize, found: usize },

    #[error("rank mismatch: expected {expected} axes, found {found}")]
    RankMismatch { expected: usize, found: usize },

    #[error("tile size is zero on axis {axis}")]
    ZeroTileSize { axis: usize },

    /// A cell's offset or size disagrees with the grid.
    #[error("cell {index} does not match the grid geometry")]
    CellGeometryMismatch { index: usize },
}

/// Convenience alias for `Result<T, WrapError>`.
pub type Result<T> = std::result::Result<T, WrapError>;
