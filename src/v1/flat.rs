use super::{check_dims, Container, Layout};
use super::super::{extent, index, AnyBuffer, DType, Result, WrapError};

/// A [`Container`] that stores every element in one buffer.
#[derive(Debug, Clone)]
pub struct FlatContainer {
    dims: Box<[i32]>,
    data: AnyBuffer,
}

impl FlatContainer {
    /// Wraps `data`, which must hold exactly the elements of an image of size
    /// `dims`, first axis fastest. The buffer is shared, not copied.
    pub fn new(dims: &[i32], data: AnyBuffer) -> Result<Self> {
        let expected = extent::length(&check_dims(dims)?)?;
        if data.len() != expected {
            return Err(WrapError::LengthMismatch {expected, found: data.len()});
        }
        Ok(Self {dims: dims.into(), data})
    }

    pub fn data(&self) -> &AnyBuffer { &self.data }
}

impl Container for FlatContainer {
    fn dims(&self) -> &[i32] { &self.dims }
    fn dtype(&self) -> DType { self.data.dtype() }
    fn kind_name(&self) -> &'static str { "FlatContainer" }
    fn layout(&self) -> Layout<'_> { Layout::Flat(self) }
    fn buffers(&self) -> Vec<&AnyBuffer> { vec![&self.data] }

    fn locate(&self, coordinates: &[i32]) -> (usize, usize) {
        (0, index::position(coordinates, &self.dims[..]))
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate() {
        let c = FlatContainer::new(&[3, 2], AnyBuffer::zeroed(DType::U8, 6)).unwrap();
        assert_eq!(c.locate(&[0, 0]), (0, 0));
        assert_eq!(c.locate(&[2, 0]), (0, 2));
        assert_eq!(c.locate(&[1, 1]), (0, 4));
        assert!(matches!(c.layout(), Layout::Flat(_)));
    }

    #[test]
    fn validates() {
        assert_eq!(
            FlatContainer::new(&[3, 2], AnyBuffer::zeroed(DType::U8, 5)).unwrap_err(),
            WrapError::LengthMismatch {expected: 6, found: 5},
        );
        assert_eq!(
            FlatContainer::new(&[-3], AnyBuffer::zeroed(DType::U8, 0)).unwrap_err(),
            WrapError::NegativeDimension {axis: 0, value: -3},
        );
    }

    #[test]
    #[should_panic]
    fn out_of_bounds() {
        let c = FlatContainer::new(&[3, 2], AnyBuffer::zeroed(DType::U8, 6)).unwrap();
        c.locate(&[3, 0]);
    }
}
