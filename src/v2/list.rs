use super::{ImgStorage, Layout};
use super::super::{extent, index, AnyBuffer, DType, Result};

/// An [`ImgStorage`] that holds each element in its own buffer.
#[derive(Debug, Clone)]
pub struct ListStorage {
    dims: Box<[u64]>,
    dtype: DType,
    items: Vec<AnyBuffer>,
}

impl ListStorage {
    /// Allocates a zeroed element for every pixel of an image of size `dims`.
    pub fn new(dims: &[u64], dtype: DType) -> Result<Self> {
        let items = (0..extent::length(dims)?).map(|_| AnyBuffer::zeroed(dtype, 1)).collect();
        Ok(Self {dims: dims.into(), dtype, items})
    }
}

impl ImgStorage for ListStorage {
    fn dims(&self) -> &[u64] { &self.dims }
    fn dtype(&self) -> DType { self.dtype }
    fn kind_name(&self) -> &'static str { "ListStorage" }
    fn layout(&self) -> Layout<'_> { Layout::Other }
    fn buffers(&self) -> Vec<&AnyBuffer> { self.items.iter().collect() }

    fn locate(&self, coordinates: &[u64]) -> (usize, usize) {
        (index::position(coordinates, &self.dims[..]), 0)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_buffer_per_pixel() {
        let s = ListStorage::new(&[3, 2], DType::I32).unwrap();
        assert_eq!(s.buffers().len(), 6);
        assert_eq!(s.locate(&[2, 1]), (5, 0));
        assert!(matches!(s.layout(), Layout::Other));
    }
}
