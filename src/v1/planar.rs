use super::{check_dims, wide_coordinates, Container, Layout};
use super::super::{extent, AnyBuffer, DType, Result, TileGrid, WrapError};

/// A [`Container`] that stores each xy plane in its own buffer.
///
/// Planes are ordered with the third axis varying fastest.
#[derive(Debug, Clone)]
pub struct PlanarContainer {
    dims: Box<[i32]>,
    dtype: DType,
    planes: Vec<AnyBuffer>,
    grid: TileGrid,
}

/// Returns the grid whose tiles are the xy planes of an image of extent
/// `wide`, and the number of elements in each plane.
pub(super) fn plane_grid(wide: &[u64]) -> Result<(TileGrid, usize)> {
    // Zero-sized axes still get a nonzero tile so that the grid is
    // well-defined.
    let plane_size: Box<[u32]> = wide.iter().enumerate()
        .map(|(axis, &d)| if axis < 2 { d.clamp(1, u32::MAX.into()) as u32 } else { 1 })
        .collect();
    let grid = TileGrid::new(wide, &plane_size)?;
    let plane_length = extent::length(&wide[..wide.len().min(2)])?;
    Ok((grid, plane_length))
}

impl PlanarContainer {
    pub fn new(dims: &[i32], dtype: DType, planes: Vec<AnyBuffer>) -> Result<Self> {
        let (grid, plane_length) = plane_grid(&check_dims(dims)?)?;
        if planes.len() != grid.num_tiles() {
            return Err(WrapError::TileCountMismatch {expected: grid.num_tiles(), found: planes.len()});
        }
        for plane in &planes {
            if plane.dtype() != dtype {
                return Err(WrapError::TypeMismatch {expected: dtype, found: plane.dtype()});
            }
            if plane.len() != plane_length {
                return Err(WrapError::LengthMismatch {expected: plane_length, found: plane.len()});
            }
        }
        Ok(Self {dims: dims.into(), dtype, planes, grid})
    }

    pub fn num_planes(&self) -> usize { self.planes.len() }

    pub fn planes(&self) -> &[AnyBuffer] { &self.planes }
}

impl Container for PlanarContainer {
    fn dims(&self) -> &[i32] { &self.dims }
    fn dtype(&self) -> DType { self.dtype }
    fn kind_name(&self) -> &'static str { "PlanarContainer" }
    fn layout(&self) -> Layout<'_> { Layout::Other }
    fn buffers(&self) -> Vec<&AnyBuffer> { self.planes.iter().collect() }

    fn locate(&self, coordinates: &[i32]) -> (usize, usize) {
        self.grid.locate(&wide_coordinates(coordinates, &self.dims))
    }
}

// ----------------------------------------------------------------------------
