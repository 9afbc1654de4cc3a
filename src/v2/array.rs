use super::{ImgStorage, Layout};
use super::super::{extent, index, AnyBuffer, DType, Result, WrapError};

/// An [`ImgStorage`] that holds every element in one buffer.
#[derive(Debug, Clone)]
pub struct ArrayStorage {
    dims: Box<[u64]>,
    data: AnyBuffer,
}

impl ArrayStorage {
    /// Wraps `data`, which must hold exactly the elements of an image of size
    /// `dims`, first axis fastest. The buffer is shared, not copied.
    pub fn new(dims: &[u64], data: AnyBuffer) -> Result<Self> {
        let expected = extent::length(dims)?;
        if data.len() != expected {
            return Err(WrapError::LengthMismatch {expected, found: data.len()});
        }
        Ok(Self {dims: dims.into(), data})
    }

    pub fn data(&self) -> &AnyBuffer { &self.data }
}

impl ImgStorage for ArrayStorage {
    fn dims(&self) -> &[u64] { &self.dims }
    fn dtype(&self) -> DType { self.data.dtype() }
    fn kind_name(&self) -> &'static str { "ArrayStorage" }
    fn layout(&self) -> Layout<'_> { Layout::Array(self) }
    fn buffers(&self) -> Vec<&AnyBuffer> { vec![&self.data] }

    fn locate(&self, coordinates: &[u64]) -> (usize, usize) {
        (0, index::position(coordinates, &self.dims[..]))
    }
}

// ----------------------------------------------------------------------------
