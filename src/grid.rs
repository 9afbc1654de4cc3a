//! Geometry of tiled images.

use super::{extent, Index, Result, WrapError};

/// Partitions an extent into tiles of a fixed nominal size.
///
/// Tiles are numbered in the grid with the first axis varying fastest. The
/// last tile along each axis is clipped to the extent, so the tiles cover the
/// extent exactly with no overlap.
///
/// ```
/// use imgwrap::{TileGrid};
/// let grid = TileGrid::new(&[19, 8, 3], &[5, 5, 5]).unwrap();
/// assert_eq!(&*grid.grid_dims(), &[4, 2, 1]);
/// assert_eq!(grid.num_tiles(), 8);
/// let (min, size) = grid.tile(3);
/// assert_eq!((&*min, &*size), (&[15u64, 0, 0][..], &[4u32, 5, 3][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    dims: Box<[u64]>,
    tile_size: Box<[u32]>,
    grid_dims: Box<[u64]>,
}

impl TileGrid {
    pub fn new(dims: &[u64], tile_size: &[u32]) -> Result<Self> {
        if dims.len() != tile_size.len() {
            return Err(WrapError::RankMismatch {expected: dims.len(), found: tile_size.len()});
        }
        if let Some(axis) = tile_size.iter().position(|&t| t == 0) {
            return Err(WrapError::ZeroTileSize {axis});
        }
        let grid_dims = dims.iter().zip(tile_size.iter())
            .map(|(&d, &t)| { let t = u64::from(t); d / t + u64::from(d % t != 0) })
            .collect();
        // There are never more tiles than elements.
        extent::length(dims)?;
        Ok(Self {dims: dims.into(), tile_size: tile_size.into(), grid_dims})
    }

    /// The extent being tiled.
    pub fn dims(&self) -> &[u64] { &self.dims }

    /// The nominal size of a tile.
    pub fn tile_size(&self) -> &[u32] { &self.tile_size }

    /// The number of tiles along each axis.
    pub fn grid_dims(&self) -> Box<[u64]> { self.grid_dims.clone() }

    pub fn num_tiles(&self) -> usize { <Box<[u64]>>::length(&self.grid_dims) }

    /// Returns the minimum coordinate and the (clipped) size of tile `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn tile(&self, index: usize) -> (Box<[u64]>, Box<[u32]>) {
        assert!(index < self.num_tiles(), "Tile {} is out of bounds for grid {:?}", index, self.grid_dims);
        let (_, position) = <Box<[u64]>>::from_usize(&self.grid_dims, index);
        let min: Box<[u64]> = position.iter().zip(self.tile_size.iter())
            .map(|(&p, &t)| p * u64::from(t))
            .collect();
        let size = min.iter().zip(self.dims.iter()).zip(self.tile_size.iter())
            .map(|((&m, &d), &t)| u64::from(t).min(d - m) as u32)
            .collect();
        (min, size)
    }

    /// Returns the tile containing `coordinates` and the position of
    /// `coordinates` within the tile's storage.
    ///
    /// Panics if `coordinates` is out of bounds.
    pub fn locate(&self, coordinates: &[u64]) -> (usize, usize) {
        assert_eq!(coordinates.len(), self.dims.len());
        let mut tile = 0;
        let mut offset = 0;
        for axis in (0..self.dims.len()).rev() {
            let (c, d, t) = (coordinates[axis], self.dims[axis], u64::from(self.tile_size[axis]));
            assert!(c < d, "Index {:?} is out of bounds for size {:?}", coordinates, self.dims);
            let p = c / t;
            let extent = t.min(d - p * t);
            tile = tile * self.grid_dims[axis] as usize + p as usize;
            offset = offset * extent as usize + (c % t) as usize;
        }
        (tile, offset)
    }
}

// ----------------------------------------------------------------------------
