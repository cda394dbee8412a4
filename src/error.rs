use derive_more::{Display, From};

pub type Result<T> = core::result::Result<T, MarchingCubesError>;

#[derive(Debug, Display, From)]
#[display("{self:?}")]
pub enum MarchingCubesError {
    /// A corner-sample slice did not contain exactly 8 values.
    InvalidCorners,
    /// A vertex buffer's length was not a multiple of 3.
    PartialTriangle,
    /// The triangle table referenced an edge with no computed crossing.
    MissingCrossing,
}

impl std::error::Error for MarchingCubesError {}
