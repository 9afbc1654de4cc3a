//! Zero-copy conversion of images between the two library generations.
//!
//! A conversion never copies, allocates or frees element storage. It reads
//! the buffer handles out of the source container, checks their element type,
//! and threads the same handles into a freshly built destination container.
//! The source and destination images then alias the same memory: a write
//! through either is visible through both, and the storage lives until the
//! last of them is dropped.
//!
//! The single-threaded precondition on aliased images is enforced by the
//! type system: buffers are neither `Send` nor `Sync`.
//!
//! ```
//! use imgwrap::{wrap, Index, View};
//! use imgwrap::v2::{ImgFactory};
//!
//! let img = ImgFactory::cell(5).create::<f32>(&[19, 8, 3]).unwrap();
//! let mut i = 0.0;
//! <Box<[u64]>>::each(&img.size(), |c| { img.set(&c, i); i += 1.0; });
//!
//! let image = wrap::to_v1(&img).unwrap();
//! assert_eq!(image.dims(), &[19, 8, 3]);
//! assert_eq!(image.get(&[18, 7, 2]), img.get(&[18, 7, 2]));
//!
//! image.set(&[0, 0, 0], -1.0);
//! assert_eq!(img.get(&[0, 0, 0]), -1.0);
//! ```

use std::rc::{Rc};

use tracing::{debug, trace};

use super::{extent, v1, v2, Buffer, DType, Element, Result, TileGrid, WrapError};
use super::v1::{Container as _};
use super::v2::{ImgStorage as _};

/// The storage layouts that can be converted.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum LayoutTag {
    /// One contiguous buffer holds every element.
    Flat,
    /// Each tile of a regular grid is held in its own buffer.
    Tiled,
}

/// A library-neutral description of an image's storage.
///
/// Extents are wide. Buffers are shared with the image they came from.
#[derive(Debug, Clone)]
pub enum Parts<T> {
    Flat {
        extent: Box<[u64]>,
        buffer: Buffer<T>,
    },
    Tiled {
        extent: Box<[u64]>,
        tile_size: Box<[u32]>,
        /// One buffer per tile, in grid order.
        tiles: Vec<Buffer<T>>,
    },
}

impl<T> Parts<T> {
    pub fn layout(&self) -> LayoutTag {
        match self {
            Self::Flat {..} => LayoutTag::Flat,
            Self::Tiled {..} => LayoutTag::Tiled,
        }
    }

    pub fn extent(&self) -> &[u64] {
        match self {
            Self::Flat {extent, ..} | Self::Tiled {extent, ..} => extent,
        }
    }

    /// The buffers, in storage order.
    pub fn buffers(&self) -> &[Buffer<T>] {
        match self {
            Self::Flat {buffer, ..} => std::slice::from_ref(buffer),
            Self::Tiled {tiles, ..} => tiles,
        }
    }
}

// ----------------------------------------------------------------------------

/// Implemented by the marker type of each library generation.
///
/// This trait has no methods that take `self`. It is implemented for types
/// that cannot be instantiated: [`V1`] and [`V2`].
pub trait Library {
    /// A short name, for diagnostics.
    const NAME: &'static str;

    /// The type-erased container of this generation.
    type Container: ?Sized;

    /// The typed image of this generation.
    type Image<T: Element>;

    fn container<T: Element>(image: &Self::Image<T>) -> &Self::Container;

    /// Determines which conversion path applies to `container`.
    ///
    /// Fails with `UnsupportedContainerKind` if it is neither flat nor tiled.
    fn layout(container: &Self::Container) -> Result<LayoutTag>;

    /// Extracts the storage of `container` without copying it.
    ///
    /// Fails with `UnsupportedContainerKind` or `TypeMismatch`.
    fn disassemble<T: Element>(container: &Self::Container) -> Result<Parts<T>>;

    /// Builds an image around `parts` without copying them.
    ///
    /// Tile geometry is recomputed from the extent and tile size; it must
    /// agree with the number and lengths of the buffers.
    fn assemble<T: Element>(parts: Parts<T>) -> Result<Self::Image<T>>;
}

/// Fails unless `found` is `T`.
fn check_dtype<T: Element>(found: DType) -> Result<()> {
    if found != T::DTYPE {
        return Err(WrapError::TypeMismatch {expected: T::DTYPE, found});
    }
    Ok(())
}

/// Recomputes the grid for `extent` and `tile_size`.
///
/// Fails with `TileCountMismatch` if the grid does not have exactly one tile
/// per buffer.
fn tile_geometry(extent: &[u64], tile_size: &[u32], num_tiles: usize) -> Result<TileGrid> {
    let grid = TileGrid::new(extent, tile_size)?;
    if grid.num_tiles() != num_tiles {
        return Err(WrapError::TileCountMismatch {expected: grid.num_tiles(), found: num_tiles});
    }
    Ok(grid)
}

// ----------------------------------------------------------------------------

/// Marker for library generation 1.
pub enum V1 {}

impl Library for V1 {
    const NAME: &'static str = "v1";
    type Container = dyn v1::Container;
    type Image<T: Element> = v1::Image<T>;

    fn container<T: Element>(image: &Self::Image<T>) -> &Self::Container { &**image.container() }

    fn layout(container: &Self::Container) -> Result<LayoutTag> {
        match container.layout() {
            v1::Layout::Flat(_) => Ok(LayoutTag::Flat),
            v1::Layout::Cell(_) => Ok(LayoutTag::Tiled),
            v1::Layout::Other => Err(WrapError::UnsupportedContainerKind {kind: container.kind_name()}),
        }
    }

    fn disassemble<T: Element>(container: &Self::Container) -> Result<Parts<T>> {
        match container.layout() {
            v1::Layout::Flat(flat) => {
                check_dtype::<T>(flat.dtype())?;
                Ok(Parts::Flat {
                    extent: extent::widen(flat.dims())?,
                    buffer: flat.data().typed::<T>()?.clone(),
                })
            },
            v1::Layout::Cell(cells) => {
                check_dtype::<T>(cells.dtype())?;
                let tiles = cells.cells().iter()
                    .map(|cell| cell.data().typed::<T>().cloned())
                    .collect::<Result<_>>()?;
                Ok(Parts::Tiled {
                    extent: extent::widen(cells.dims())?,
                    tile_size: extent::widen_tile(cells.cell_size())?,
                    tiles,
                })
            },
            v1::Layout::Other => Err(WrapError::UnsupportedContainerKind {kind: container.kind_name()}),
        }
    }

    fn assemble<T: Element>(parts: Parts<T>) -> Result<Self::Image<T>> {
        match parts {
            Parts::Flat {extent, buffer} => {
                let dims = extent::narrow(&extent)?;
                let container = v1::FlatContainer::new(&dims, T::erase(buffer))?;
                v1::Image::new(Rc::new(container))
            },
            Parts::Tiled {extent, tile_size, tiles} => {
                let grid = tile_geometry(&extent, &tile_size, tiles.len())?;
                let dims = extent::narrow(&extent)?;
                let cell_size = extent::narrow_tile(&tile_size)?;
                let cells = tiles.into_iter().enumerate().map(|(index, buffer)| {
                    let (min, size) = grid.tile(index);
                    trace!(index, ?min, ?size, "wrapping cell");
                    v1::Cell::new(&extent::narrow(&min)?, &extent::narrow_tile(&size)?, T::erase(buffer))
                }).collect::<Result<Vec<_>>>()?;
                let container = v1::CellContainer::new(&dims, &cell_size, T::DTYPE, cells)?;
                v1::Image::new(Rc::new(container))
            },
        }
    }
}

// ----------------------------------------------------------------------------

/// Marker for library generation 2.
pub enum V2 {}

impl Library for V2 {
    const NAME: &'static str = "v2";
    type Container = dyn v2::ImgStorage;
    type Image<T: Element> = v2::Img<T>;

    fn container<T: Element>(image: &Self::Image<T>) -> &Self::Container { &**image.storage() }

    fn layout(container: &Self::Container) -> Result<LayoutTag> {
        match container.layout() {
            v2::Layout::Array(_) => Ok(LayoutTag::Flat),
            v2::Layout::Cell(_) => Ok(LayoutTag::Tiled),
            v2::Layout::Other => Err(WrapError::UnsupportedContainerKind {kind: container.kind_name()}),
        }
    }

    fn disassemble<T: Element>(container: &Self::Container) -> Result<Parts<T>> {
        match container.layout() {
            v2::Layout::Array(array) => {
                check_dtype::<T>(array.dtype())?;
                Ok(Parts::Flat {
                    extent: array.dims().into(),
                    buffer: array.data().typed::<T>()?.clone(),
                })
            },
            v2::Layout::Cell(cells) => {
                check_dtype::<T>(cells.dtype())?;
                let tiles = cells.cells().iter()
                    .map(|cell| cell.data().typed::<T>().cloned())
                    .collect::<Result<_>>()?;
                Ok(Parts::Tiled {
                    extent: cells.dims().into(),
                    tile_size: cells.cell_size().into(),
                    tiles,
                })
            },
            v2::Layout::Other => Err(WrapError::UnsupportedContainerKind {kind: container.kind_name()}),
        }
    }

    fn assemble<T: Element>(parts: Parts<T>) -> Result<Self::Image<T>> {
        match parts {
            Parts::Flat {extent, buffer} => {
                let storage = v2::ArrayStorage::new(&extent, T::erase(buffer))?;
                v2::Img::new(Rc::new(storage))
            },
            Parts::Tiled {extent, tile_size, tiles} => {
                let grid = tile_geometry(&extent, &tile_size, tiles.len())?;
                let cells = tiles.into_iter().enumerate().map(|(index, buffer)| {
                    let (min, size) = grid.tile(index);
                    trace!(index, ?min, ?size, "wrapping cell");
                    v2::Cell::new(&min, &size, T::erase(buffer))
                }).collect::<Result<Vec<_>>>()?;
                let storage = v2::CellStorage::new(grid, T::DTYPE, cells)?;
                v2::Img::new(Rc::new(storage))
            },
        }
    }
}

// ----------------------------------------------------------------------------

/// Wraps the storage of a container of library `S` in a new image of library
/// `D`.
///
/// Either the whole destination image is built, or an error is returned and
/// nothing is.
pub fn convert_container<S: Library, D: Library, T: Element>(
    container: &S::Container,
) -> Result<D::Image<T>> {
    let parts = S::disassemble::<T>(container)?;
    let dtype = T::DTYPE;
    debug!(
        from = S::NAME,
        to = D::NAME,
        %dtype,
        layout = ?parts.layout(),
        extent = ?parts.extent(),
        buffers = parts.buffers().len(),
        "wrapping image"
    );
    D::assemble(parts)
}

/// Wraps the storage of an image of library `S` in a new image of library
/// `D`.
pub fn convert<S: Library, D: Library, T: Element>(image: &S::Image<T>) -> Result<D::Image<T>> {
    convert_container::<S, D, T>(S::container(image))
}

/// Wraps a generation 1 image as a generation 2 image.
///
/// ```
/// use imgwrap::{wrap, Buffer, Element};
/// use imgwrap::v1::{FlatContainer, Image};
/// use std::rc::Rc;
///
/// let data = Buffer::from_vec(vec![1.0f32, 2.0, 3.0]);
/// let image: Image<f32> = Image::new(Rc::new(FlatContainer::new(&[3], f32::erase(data.clone())).unwrap())).unwrap();
/// let img = wrap::to_v2(&image).unwrap();
/// assert_eq!(img.dims(), &[3]);
/// assert!(img.linked_type().buffers()[0].ptr_eq(&data));
/// ```
pub fn to_v2<T: Element>(image: &v1::Image<T>) -> Result<v2::Img<T>> {
    convert::<V1, V2, T>(image)
}

/// Wraps a generation 2 image as a generation 1 image.
///
/// Fails with `DimensionOverflow` if the image is too large for generation 1.
pub fn to_v1<T: Element>(img: &v2::Img<T>) -> Result<v1::Image<T>> {
    convert::<V2, V1, T>(img)
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::{Array, CellView, DType, Index, View};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    const DIMS: [i32; 3] = [19, 8, 3];

    /// Fills `view` with `f(0)`, `f(1)`, ... in pixel order.
    fn fill<V: CellView>(view: &V, f: impl Fn(usize) -> V::T) {
        let mut i = 0;
        V::I::each(&view.size(), |c| { view.set_at(c, f(i)); i += 1; });
    }

    fn factories() -> [v1::ContainerFactory; 2] {
        [v1::ContainerFactory::Flat, v1::ContainerFactory::cell(5)]
    }

    fn bytes<T: Element>(buffers: &[Buffer<T>]) -> Vec<u8> {
        buffers.iter().flat_map(Buffer::to_bytes).collect()
    }

    fn assert_round_trip<T: Element>(f: impl Fn(usize) -> T) {
        for factory in factories() {
            let image = factory.create::<T>(&DIMS).unwrap();
            fill(&image, &f);
            let before: Array<Box<[i32]>, T> = image.collect();

            let img = to_v2(&image).unwrap();
            let back = to_v1(&img).unwrap();
            let after: Array<Box<[i32]>, T> = back.collect();
            assert_eq!(before, after, "{:?} {}", factory, T::DTYPE);
            assert_eq!(
                bytes(image.linked_type().buffers()),
                bytes(back.linked_type().buffers()),
            );
            for (a, b) in image.linked_type().buffers().iter().zip(back.linked_type().buffers()) {
                assert!(a.ptr_eq(b));
            }
        }
    }

    #[test]
    fn round_trip_every_type() {
        init_tracing();
        assert_round_trip(|i| i as i8);
        assert_round_trip(|i| i as u8);
        assert_round_trip(|i| -(i as i16));
        assert_round_trip(|i| i as u16 * 100);
        assert_round_trip(|i| i as i32 - 200);
        assert_round_trip(|i| u32::MAX - i as u32);
        assert_round_trip(|i| i as i64 * i64::from(i32::MAX));
        assert_round_trip(|i| u64::MAX - i as u64);
        assert_round_trip(|i| i as f32 * 0.5);
        assert_round_trip(|i| (i as f64).sqrt());
    }

    #[test]
    fn round_trip_from_v2() {
        for factory in [v2::ImgFactory::Array, v2::ImgFactory::cell(5)] {
            let img = factory.create::<f64>(&[19, 8, 3]).unwrap();
            fill(&img, |i| i as f64);
            let before: Array<Box<[u64]>, f64> = img.collect();
            let back = to_v2(&to_v1(&img).unwrap()).unwrap();
            let after: Array<Box<[u64]>, f64> = back.collect();
            assert_eq!(before, after);
            assert_eq!(img.storage().kind_name(), back.storage().kind_name());
        }
    }

    #[test]
    fn flat_minimal() {
        let data = Buffer::from_vec(vec![1.0f32, 2.0, 3.0]);
        let container = v1::FlatContainer::new(&[3], f32::erase(data.clone())).unwrap();
        let image: v1::Image<f32> = v1::Image::new(Rc::new(container)).unwrap();
        let img = to_v2(&image).unwrap();
        assert_eq!(img.storage().kind_name(), "ArrayStorage");
        assert_eq!(img.dims(), &[3]);
        assert_eq!([img.get(&[0]), img.get(&[1]), img.get(&[2])], [1.0, 2.0, 3.0]);
        let v2::Layout::Array(array) = img.storage().layout() else { panic!("expected an array") };
        assert_eq!(array.data().as_ptr(), data.as_ptr() as *const u8);
        assert_eq!(data.holders(), 5);
    }

    #[test]
    fn writes_are_shared() {
        for factory in factories() {
            let image = factory.create::<u16>(&DIMS).unwrap();
            let img = to_v2(&image).unwrap();
            img.set(&[17, 6, 2], 1234);
            assert_eq!(image.get(&[17, 6, 2]), 1234);
            image.set(&[4, 5, 1], 4321);
            assert_eq!(img.get(&[4, 5, 1]), 4321);
            let mut total = 0u32;
            image.each(|x| total += u32::from(x));
            assert_eq!(total, 1234 + 4321);
        }
    }

    #[test]
    fn storage_outlives_source() {
        let image = v1::ContainerFactory::cell(4).create::<i64>(&[9, 9]).unwrap();
        image.set(&[8, 8], -5);
        let img = to_v2(&image).unwrap();
        let cell = img.linked_type().buffers()[0].clone();
        drop(image);
        assert_eq!(img.get(&[8, 8]), -5);
        // `cell`, the `img` storage and its linked type.
        assert_eq!(cell.holders(), 3);
    }

    #[test]
    fn tile_count_is_preserved() {
        let img = v2::ImgFactory::cell(5).create::<f32>(&[19, 8, 3]).unwrap();
        let image = to_v1(&img).unwrap();
        let v2::Layout::Cell(source) = img.storage().layout() else { panic!("expected cells") };
        let v1::Layout::Cell(dest) = image.container().layout() else { panic!("expected cells") };
        assert_eq!(V1::layout(&**image.container()), Ok(LayoutTag::Tiled));
        assert_eq!(source.cells().len(), 4 * 2 * 1);
        assert_eq!(dest.num_cells(), 8);
        assert_eq!(dest.cell_size(), &[5, 5, 5]);
        for (s, d) in source.cells().iter().zip(dest.cells()) {
            assert_eq!(&*extent::widen_tile(d.dims()).unwrap(), s.dims());
            assert_eq!(&*extent::widen(d.offset()).unwrap(), s.min());
            assert!(s.data().ptr_eq(d.data()));
        }
    }

    #[test]
    fn unsupported_kinds() {
        let image = v1::ContainerFactory::Planar.create::<u8>(&[4, 4, 2]).unwrap();
        let expected = WrapError::UnsupportedContainerKind {kind: "PlanarContainer"};
        assert_eq!(to_v2(&image).unwrap_err(), expected);
        assert_eq!(V1::layout(&**image.container()), Err(expected));

        let img = v2::ImgFactory::List.create::<u8>(&[4, 4]).unwrap();
        let expected = WrapError::UnsupportedContainerKind {kind: "ListStorage"};
        assert_eq!(to_v1(&img).unwrap_err(), expected);
        assert_eq!(V2::layout(&**img.storage()), Err(expected));
    }

    #[test]
    fn signed_storage_is_not_reinterpreted() {
        for factory in factories() {
            let image = factory.create::<i32>(&DIMS).unwrap();
            let holders = image.linked_type().buffers()[0].holders();
            let result = convert_container::<V1, V2, u32>(V1::container(&image));
            assert_eq!(result.unwrap_err(), WrapError::TypeMismatch {expected: DType::U32, found: DType::I32});
            assert_eq!(image.linked_type().buffers()[0].holders(), holders);
        }
        let img = v2::ImgFactory::Array.create::<f32>(&[2]).unwrap();
        assert_eq!(
            convert_container::<V2, V1, i32>(&**img.storage()).unwrap_err(),
            WrapError::TypeMismatch {expected: DType::I32, found: DType::F32},
        );
    }

    #[test]
    fn empty_tiled_image_checks_type() {
        let img = v2::ImgFactory::cell(3).create::<u8>(&[0, 7]).unwrap();
        assert!(img.linked_type().buffers().is_empty());
        assert_eq!(
            convert_container::<V2, V1, i8>(&**img.storage()).unwrap_err(),
            WrapError::TypeMismatch {expected: DType::I8, found: DType::U8},
        );
        assert_eq!(to_v1(&img).unwrap().dims(), &[0, 7]);
    }

    #[test]
    fn dimension_overflow() {
        let img = v2::ImgFactory::Array.create::<u8>(&[3_000_000_000, 0]).unwrap();
        assert_eq!(
            to_v1(&img).unwrap_err(),
            WrapError::DimensionOverflow {axis: 0, value: 3_000_000_000},
        );
        let img = v2::ImgFactory::cell(5).create::<u8>(&[0, 1 << 40]).unwrap();
        assert_eq!(
            to_v1(&img).unwrap_err(),
            WrapError::DimensionOverflow {axis: 1, value: 1 << 40},
        );
    }

    #[test]
    fn tiles_must_match_grid() {
        let parts = Parts::Tiled {
            extent: vec![10].into(),
            tile_size: vec![5].into(),
            tiles: vec![Buffer::<u8>::new(5)],
        };
        assert_eq!(
            V1::assemble(parts.clone()).unwrap_err(),
            WrapError::TileCountMismatch {expected: 2, found: 1},
        );
        assert_eq!(
            V2::assemble(parts).unwrap_err(),
            WrapError::TileCountMismatch {expected: 2, found: 1},
        );
        let parts = Parts::Tiled {
            extent: vec![7].into(),
            tile_size: vec![5].into(),
            tiles: vec![Buffer::<u8>::new(5), Buffer::new(5)],
        };
        assert_eq!(
            V2::assemble(parts).unwrap_err(),
            WrapError::LengthMismatch {expected: 2, found: 5},
        );
    }

    #[test]
    fn parts() {
        let image = v1::ContainerFactory::cell(5).create::<i16>(&DIMS).unwrap();
        let parts = V1::disassemble::<i16>(&**image.container()).unwrap();
        assert_eq!(parts.layout(), LayoutTag::Tiled);
        assert_eq!(parts.extent(), &[19, 8, 3]);
        assert_eq!(parts.buffers().len(), 8);
        let image = v1::ContainerFactory::Flat.create::<i16>(&DIMS).unwrap();
        let parts = V1::disassemble::<i16>(&**image.container()).unwrap();
        assert_eq!(parts.layout(), LayoutTag::Flat);
        assert_eq!(parts.buffers()[0].len(), 19 * 8 * 3);
    }
}
