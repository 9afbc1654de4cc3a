//! Generation 1 of the image library.
//!
//! Extents and coordinates are `i32`s. An [`Image`] binds an element type to
//! a type-erased [`Container`]. The container kinds are a [`FlatContainer`]
//! (one buffer), a [`CellContainer`] (one buffer per cell of a regular grid)
//! and a [`PlanarContainer`] (one buffer per xy plane).

use std::fmt::{Debug};
use std::rc::{Rc};

use super::{extent, AnyBuffer, CellView, DType, Element, LinkedType, Result, View, WrapError};

mod flat;
pub use flat::{FlatContainer};

mod cell;
pub use cell::{Cell, CellContainer};

mod planar;
pub use planar::{PlanarContainer};

mod factory;
pub use factory::{ContainerFactory};

/// The concrete kind of a [`Container`], as far as other code can know it.
#[derive(Debug, Copy, Clone)]
pub enum Layout<'a> {
    Flat(&'a FlatContainer),
    Cell(&'a CellContainer),
    /// Any other kind of container.
    Other,
}

/// Storage for an image whose element type is known only at run-time.
pub trait Container: Debug {
    /// The size of the image along each axis.
    fn dims(&self) -> &[i32];

    /// The type of every element.
    fn dtype(&self) -> DType;

    /// A human-readable name of the concrete container type.
    fn kind_name(&self) -> &'static str;

    fn layout(&self) -> Layout<'_>;

    /// The buffers holding the elements, in storage order.
    fn buffers(&self) -> Vec<&AnyBuffer>;

    /// Returns the buffer holding the element at `coordinates` and its
    /// position within that buffer.
    ///
    /// Panics if `coordinates` is out of bounds.
    fn locate(&self, coordinates: &[i32]) -> (usize, usize);
}

/// Checks that `dims` is a valid extent.
fn check_dims(dims: &[i32]) -> Result<Box<[u64]>> { extent::widen(dims) }

/// Converts in-bounds coordinates to `u64`s.
fn wide_coordinates(coordinates: &[i32], dims: &[i32]) -> Box<[u64]> {
    coordinates.iter().map(|&c| {
        assert!(c >= 0, "Index {:?} is out of bounds for size {:?}", coordinates, dims);
        c as u64
    }).collect()
}

// ----------------------------------------------------------------------------

/// An image of `T`s.
///
/// Cloning an `Image` does not clone its storage.
///
/// ```
/// use imgwrap::v1::{ContainerFactory};
/// let image = ContainerFactory::cell(2).create::<u16>(&[3, 3]).unwrap();
/// image.set(&[2, 1], 7);
/// assert_eq!(image.get(&[2, 1]), 7);
/// assert_eq!(image.container().kind_name(), "CellContainer");
/// ```
#[derive(Debug, Clone)]
pub struct Image<T: Element> {
    container: Rc<dyn Container>,
    linked: LinkedType<T>,
}

impl<T: Element> Image<T> {
    /// Binds the element type `T` to `container`.
    ///
    /// Fails with `TypeMismatch` if `container` does not store `T`s.
    pub fn new(container: Rc<dyn Container>) -> Result<Self> {
        if container.dtype() != T::DTYPE {
            return Err(WrapError::TypeMismatch {expected: T::DTYPE, found: container.dtype()});
        }
        let linked = LinkedType::bind(container.buffers())?;
        Ok(Self {container, linked})
    }

    pub fn dims(&self) -> &[i32] { self.container.dims() }

    pub fn container(&self) -> &Rc<dyn Container> { &self.container }

    pub fn linked_type(&self) -> &LinkedType<T> { &self.linked }

    /// Panics if `coordinates` is out of bounds.
    pub fn get(&self, coordinates: &[i32]) -> T {
        self.linked.get(self.container.locate(coordinates))
    }

    /// Panics if `coordinates` is out of bounds.
    pub fn set(&self, coordinates: &[i32], value: T) {
        self.linked.set(self.container.locate(coordinates), value)
    }
}

impl<T: Element> View for Image<T> {
    type I = Box<[i32]>;
    type T = T;
    fn size(&self) -> Box<[i32]> { self.dims().into() }
    fn at(&self, index: Box<[i32]>) -> T { self.get(&index) }
}

impl<T: Element> CellView for Image<T> {
    fn set_at(&self, index: Box<[i32]>, t: T) { self.set(&index, t) }
}
