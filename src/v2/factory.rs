use std::rc::{Rc};

use super::{ArrayStorage, CellStorage, Img, ListStorage};
use super::super::{extent, AnyBuffer, Element, Result, TileGrid};

/// The cell size used by [`ImgFactory::default_cell()`].
pub const DEFAULT_CELL_SIZE: u32 = 10;

/// Chooses the kind of storage for newly allocated images.
///
/// ```
/// use imgwrap::v2::{ImgFactory};
/// let img = ImgFactory::default().create::<u8>(&[640, 480]).unwrap();
/// assert_eq!(img.storage().kind_name(), "ArrayStorage");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImgFactory {
    /// Allocate an [`ArrayStorage`].
    #[default]
    Array,

    /// Allocate a [`CellStorage`]. A `cell_size` with a single entry applies
    /// to every axis.
    Cell { cell_size: Vec<u32> },

    /// Allocate a [`ListStorage`].
    List,
}

impl ImgFactory {
    /// Cells of `cell_size` along every axis.
    pub fn cell(cell_size: u32) -> Self { Self::Cell {cell_size: vec![cell_size]} }

    /// Cells of [`DEFAULT_CELL_SIZE`] along every axis.
    pub fn default_cell() -> Self { Self::cell(DEFAULT_CELL_SIZE) }

    /// Allocates a zeroed image of size `dims`.
    pub fn create<T: Element>(&self, dims: &[u64]) -> Result<Img<T>> {
        match self {
            Self::Array => {
                let data = AnyBuffer::zeroed(T::DTYPE, extent::length(dims)?);
                Img::new(Rc::new(ArrayStorage::new(dims, data)?))
            },
            Self::Cell {cell_size} => {
                let cell_size = match cell_size.as_slice() {
                    &[n] => vec![n; dims.len()],
                    _ => cell_size.clone(),
                };
                let grid = TileGrid::new(dims, &cell_size)?;
                Img::new(Rc::new(CellStorage::zeroed(grid, T::DTYPE)?))
            },
            Self::List => Img::new(Rc::new(ListStorage::new(dims, T::DTYPE)?)),
        }
    }
}

// ----------------------------------------------------------------------------
