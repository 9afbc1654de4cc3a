use super::{ImgStorage, Layout};
use super::super::{extent, AnyBuffer, DType, Result, TileGrid, WrapError};

/// One cell of a [`CellStorage`].
#[derive(Debug, Clone)]
pub struct Cell {
    min: Box<[u64]>,
    dims: Box<[u32]>,
    data: AnyBuffer,
}

impl Cell {
    /// Wraps `data`, which must hold exactly the elements of a cell of size
    /// `dims`, first axis fastest. The buffer is shared, not copied.
    pub fn new(min: &[u64], dims: &[u32], data: AnyBuffer) -> Result<Self> {
        let wide: Box<[u64]> = dims.iter().map(|&d| u64::from(d)).collect();
        let expected = extent::length(&wide)?;
        if data.len() != expected {
            return Err(WrapError::LengthMismatch {expected, found: data.len()});
        }
        Ok(Self {min: min.into(), dims: dims.into(), data})
    }

    /// The coordinates of the first element of the cell.
    pub fn min(&self) -> &[u64] { &self.min }

    pub fn dims(&self) -> &[u32] { &self.dims }

    pub fn data(&self) -> &AnyBuffer { &self.data }
}

// ----------------------------------------------------------------------------

/// An [`ImgStorage`] that partitions the image into the tiles of a
/// [`TileGrid`], each stored in its own buffer.
///
/// ```
/// use imgwrap::v2::{ImgFactory, ImgStorage, Layout};
/// let img = ImgFactory::cell(5).create::<f32>(&[19, 8, 3]).unwrap();
/// let Layout::Cell(cells) = img.storage().layout() else { unreachable!() };
/// assert_eq!(cells.cells().len(), 8);
/// assert_eq!(cells.cells()[7].dims(), &[4, 3, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct CellStorage {
    grid: TileGrid,
    dtype: DType,
    cells: Vec<Cell>,
}

impl CellStorage {
    /// Assembles a storage from its cells, which must be listed in grid order
    /// and must match the grid geometry exactly.
    pub fn new(grid: TileGrid, dtype: DType, cells: Vec<Cell>) -> Result<Self> {
        if cells.len() != grid.num_tiles() {
            return Err(WrapError::TileCountMismatch {expected: grid.num_tiles(), found: cells.len()});
        }
        for (index, cell) in cells.iter().enumerate() {
            let (min, size) = grid.tile(index);
            if cell.min != min || cell.dims != size {
                return Err(WrapError::CellGeometryMismatch {index});
            }
            if cell.data.dtype() != dtype {
                return Err(WrapError::TypeMismatch {expected: dtype, found: cell.data.dtype()});
            }
        }
        Ok(Self {grid, dtype, cells})
    }

    /// Allocates zeroed cells for every tile of `grid`.
    pub fn zeroed(grid: TileGrid, dtype: DType) -> Result<Self> {
        let cells = (0..grid.num_tiles()).map(|index| {
            let (min, size) = grid.tile(index);
            let length = size.iter().map(|&s| s as usize).product();
            Cell::new(&min, &size, AnyBuffer::zeroed(dtype, length))
        }).collect::<Result<Vec<_>>>()?;
        Self::new(grid, dtype, cells)
    }

    pub fn grid(&self) -> &TileGrid { &self.grid }

    /// The nominal size of a cell.
    pub fn cell_size(&self) -> &[u32] { self.grid.tile_size() }

    pub fn cells(&self) -> &[Cell] { &self.cells }
}

impl ImgStorage for CellStorage {
    fn dims(&self) -> &[u64] { self.grid.dims() }
    fn dtype(&self) -> DType { self.dtype }
    fn kind_name(&self) -> &'static str { "CellStorage" }
    fn layout(&self) -> Layout<'_> { Layout::Cell(self) }
    fn buffers(&self) -> Vec<&AnyBuffer> { self.cells.iter().map(Cell::data).collect() }

    fn locate(&self, coordinates: &[u64]) -> (usize, usize) {
        self.grid.locate(coordinates)
    }
}

// ----------------------------------------------------------------------------
