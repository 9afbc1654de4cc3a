use super::{check_dims, wide_coordinates, Container, Layout};
use super::super::{extent, AnyBuffer, DType, Result, TileGrid, WrapError};

/// One cell of a [`CellContainer`].
#[derive(Debug, Clone)]
pub struct Cell {
    offset: Box<[i32]>,
    dims: Box<[i32]>,
    data: AnyBuffer,
}

impl Cell {
    /// Wraps `data`, which must hold exactly the elements of a cell of size
    /// `dims`, first axis fastest. The buffer is shared, not copied.
    pub fn new(offset: &[i32], dims: &[i32], data: AnyBuffer) -> Result<Self> {
        let expected = extent::length(&check_dims(dims)?)?;
        if data.len() != expected {
            return Err(WrapError::LengthMismatch {expected, found: data.len()});
        }
        Ok(Self {offset: offset.into(), dims: dims.into(), data})
    }

    /// The coordinates of the first element of the cell.
    pub fn offset(&self) -> &[i32] { &self.offset }

    pub fn dims(&self) -> &[i32] { &self.dims }

    pub fn data(&self) -> &AnyBuffer { &self.data }
}

// ----------------------------------------------------------------------------

/// A [`Container`] that partitions the image into cells of a fixed size, each
/// stored in its own buffer.
///
/// Cells are ordered with the first grid axis varying fastest. Cells on the
/// far boundary are clipped to the image.
#[derive(Debug, Clone)]
pub struct CellContainer {
    dims: Box<[i32]>,
    cell_size: Box<[i32]>,
    dtype: DType,
    cells: Vec<Cell>,
    grid: TileGrid,
}

impl CellContainer {
    /// Assembles a container from its cells, which must be listed in grid
    /// order and must match the grid geometry exactly.
    pub fn new(dims: &[i32], cell_size: &[i32], dtype: DType, cells: Vec<Cell>) -> Result<Self> {
        let grid = TileGrid::new(&check_dims(dims)?, &extent::widen_tile(cell_size)?)?;
        if cells.len() != grid.num_tiles() {
            return Err(WrapError::TileCountMismatch {expected: grid.num_tiles(), found: cells.len()});
        }
        for (index, cell) in cells.iter().enumerate() {
            let (min, size) = grid.tile(index);
            let offset_matches = extent::widen(&cell.offset).map_or(false, |o| o == min);
            let size_matches = extent::widen_tile(&cell.dims).map_or(false, |s| s == size);
            if !(offset_matches && size_matches) {
                return Err(WrapError::CellGeometryMismatch {index});
            }
            if cell.data.dtype() != dtype {
                return Err(WrapError::TypeMismatch {expected: dtype, found: cell.data.dtype()});
            }
        }
        Ok(Self {dims: dims.into(), cell_size: cell_size.into(), dtype, cells, grid})
    }

    /// The nominal size of a cell.
    pub fn cell_size(&self) -> &[i32] { &self.cell_size }

    pub fn num_cells(&self) -> usize { self.cells.len() }

    pub fn cells(&self) -> &[Cell] { &self.cells }

    pub fn grid(&self) -> &TileGrid { &self.grid }
}

impl Container for CellContainer {
    fn dims(&self) -> &[i32] { &self.dims }
    fn dtype(&self) -> DType { self.dtype }
    fn kind_name(&self) -> &'static str { "CellContainer" }
    fn layout(&self) -> Layout<'_> { Layout::Cell(self) }
    fn buffers(&self) -> Vec<&AnyBuffer> { self.cells.iter().map(Cell::data).collect() }

    fn locate(&self, coordinates: &[i32]) -> (usize, usize) {
        self.grid.locate(&wide_coordinates(coordinates, &self.dims))
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(dims: &[i32], cell_size: &[i32]) -> Vec<Cell> {
        let grid = TileGrid::new(&extent::widen(dims).unwrap(), &extent::widen_tile(cell_size).unwrap()).unwrap();
        (0..grid.num_tiles()).map(|i| {
            let (min, size) = grid.tile(i);
            let len = size.iter().map(|&s| s as usize).product();
            Cell::new(
                &extent::narrow(&min).unwrap(),
                &extent::narrow_tile(&size).unwrap(),
                AnyBuffer::zeroed(DType::I16, len),
            ).unwrap()
        }).collect()
    }

    #[test]
    fn locate() {
        let c = CellContainer::new(&[5, 3], &[2, 2], DType::I16, cells(&[5, 3], &[2, 2])).unwrap();
        assert_eq!(c.num_cells(), 6);
        assert_eq!(c.locate(&[0, 0]), (0, 0));
        assert_eq!(c.locate(&[3, 1]), (1, 3));
        assert_eq!(c.locate(&[4, 1]), (2, 1));
        assert_eq!(c.locate(&[4, 2]), (5, 0));
        assert_eq!(c.cells()[2].dims(), &[1, 2]);
    }

    #[test]
    fn wrong_count() {
        let mut cs = cells(&[5, 3], &[2, 2]);
        cs.pop();
        assert_eq!(
            CellContainer::new(&[5, 3], &[2, 2], DType::I16, cs).unwrap_err(),
            WrapError::TileCountMismatch {expected: 6, found: 5},
        );
    }

    #[test]
    fn wrong_order() {
        let mut cs = cells(&[5, 3], &[2, 2]);
        cs.swap(0, 1);
        assert_eq!(
            CellContainer::new(&[5, 3], &[2, 2], DType::I16, cs).unwrap_err(),
            WrapError::CellGeometryMismatch {index: 0},
        );
    }

    #[test]
    fn wrong_type() {
        assert_eq!(
            CellContainer::new(&[5, 3], &[2, 2], DType::U16, cells(&[5, 3], &[2, 2])).unwrap_err(),
            WrapError::TypeMismatch {expected: DType::U16, found: DType::I16},
        );
    }
}
