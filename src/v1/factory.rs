use std::rc::{Rc};

use super::{check_dims, planar, Cell, CellContainer, FlatContainer, Image, PlanarContainer};
use super::super::{extent, AnyBuffer, Element, Result, TileGrid};

/// Chooses the kind of container for newly allocated images.
///
/// ```
/// use imgwrap::View;
/// use imgwrap::v1::{ContainerFactory};
/// let image = ContainerFactory::default().create::<f64>(&[4, 4]).unwrap();
/// assert_eq!(image.container().kind_name(), "FlatContainer");
/// assert_eq!(image.len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContainerFactory {
    /// Allocate a [`FlatContainer`].
    #[default]
    Flat,

    /// Allocate a [`CellContainer`]. A `cell_size` with a single entry
    /// applies to every axis.
    Cell { cell_size: Vec<i32> },

    /// Allocate a [`PlanarContainer`].
    Planar,
}

impl ContainerFactory {
    /// Cells of `cell_size` along every axis.
    pub fn cell(cell_size: i32) -> Self { Self::Cell {cell_size: vec![cell_size]} }

    /// Allocates a zeroed image of size `dims`.
    pub fn create<T: Element>(&self, dims: &[i32]) -> Result<Image<T>> {
        let wide = check_dims(dims)?;
        match self {
            Self::Flat => {
                let data = AnyBuffer::zeroed(T::DTYPE, extent::length(&wide)?);
                Image::new(Rc::new(FlatContainer::new(dims, data)?))
            },
            Self::Cell {cell_size} => {
                let cell_size = match cell_size.as_slice() {
                    &[n] => vec![n; dims.len()],
                    _ => cell_size.clone(),
                };
                let grid = TileGrid::new(&wide, &extent::widen_tile(&cell_size)?)?;
                let cells = (0..grid.num_tiles()).map(|index| {
                    let (min, size) = grid.tile(index);
                    let data = AnyBuffer::zeroed(T::DTYPE, size.iter().map(|&s| s as usize).product());
                    Cell::new(&extent::narrow(&min)?, &extent::narrow_tile(&size)?, data)
                }).collect::<Result<Vec<_>>>()?;
                Image::new(Rc::new(CellContainer::new(dims, &cell_size, T::DTYPE, cells)?))
            },
            Self::Planar => {
                let (grid, plane_length) = planar::plane_grid(&wide)?;
                let planes = (0..grid.num_tiles()).map(|_| AnyBuffer::zeroed(T::DTYPE, plane_length)).collect();
                Image::new(Rc::new(PlanarContainer::new(dims, T::DTYPE, planes)?))
            },
        }
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::{Layout};
    use super::super::super::{WrapError};

    #[test]
    fn uniform_cell_size() {
        let image = ContainerFactory::cell(5).create::<u8>(&[19, 8, 3]).unwrap();
        match image.container().layout() {
            Layout::Cell(c) => {
                assert_eq!(c.cell_size(), &[5, 5, 5]);
                assert_eq!(c.num_cells(), 8);
            },
            _ => panic!("expected a CellContainer"),
        }
    }

    #[test]
    fn per_axis_cell_size() {
        let factory = ContainerFactory::Cell {cell_size: vec![4, 1]};
        let image = factory.create::<i64>(&[8, 3]).unwrap();
        assert_eq!(image.linked_type().buffers().len(), 6);
        let factory = ContainerFactory::Cell {cell_size: vec![4, 1, 1]};
        assert_eq!(
            factory.create::<i64>(&[8, 3]).unwrap_err(),
            WrapError::RankMismatch {expected: 2, found: 3},
        );
    }

    #[test]
    fn planar() {
        let image = ContainerFactory::Planar.create::<u32>(&[2, 2, 5]).unwrap();
        assert_eq!(image.container().buffers().len(), 5);
        image.set(&[1, 1, 4], 9);
        assert_eq!(image.get(&[1, 1, 4]), 9);
        assert_eq!(image.get(&[1, 1, 3]), 0);
    }

    #[test]
    fn planar_without_planes() {
        let image = ContainerFactory::Planar.create::<u8>(&[0, 3]).unwrap();
        assert_eq!(image.container().buffers().len(), 0);
        let image = ContainerFactory::Planar.create::<u8>(&[4, 0, 2]).unwrap();
        assert_eq!(image.container().buffers().len(), 0);
        let image = ContainerFactory::Planar.create::<u8>(&[4, 3]).unwrap();
        assert_eq!(image.container().buffers().len(), 1);
    }

    #[test]
    fn negative_extent() {
        assert!(ContainerFactory::Flat.create::<u8>(&[2, -1]).is_err());
    }
}
