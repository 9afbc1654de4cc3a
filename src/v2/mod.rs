//! Generation 2 of the image library.
//!
//! Extents and coordinates are `u64`s. An [`Img`] binds an element type to a
//! type-erased [`ImgStorage`]. The storage kinds are an [`ArrayStorage`] (one
//! buffer), a [`CellStorage`] (one buffer per cell of a [`TileGrid`]) and a
//! [`ListStorage`] (one single-element buffer per pixel).
//!
//! [`TileGrid`]: super::TileGrid

use std::fmt::{Debug};
use std::rc::{Rc};

use super::{AnyBuffer, CellView, DType, Element, LinkedType, Result, View, WrapError};

mod array;
pub use array::{ArrayStorage};

mod cell;
pub use cell::{Cell, CellStorage};

mod list;
pub use list::{ListStorage};

mod factory;
pub use factory::{ImgFactory, DEFAULT_CELL_SIZE};

/// The concrete kind of an [`ImgStorage`], as far as other code can know it.
#[derive(Debug, Copy, Clone)]
pub enum Layout<'a> {
    Array(&'a ArrayStorage),
    Cell(&'a CellStorage),
    /// Any other kind of storage.
    Other,
}

/// Storage for an image whose element type is known only at run-time.
pub trait ImgStorage: Debug {
    /// The size of the image along each axis.
    fn dims(&self) -> &[u64];

    /// The type of every element.
    fn dtype(&self) -> DType;

    /// A human-readable name of the concrete storage type.
    fn kind_name(&self) -> &'static str;

    fn layout(&self) -> Layout<'_>;

    /// The buffers holding the elements, in storage order.
    fn buffers(&self) -> Vec<&AnyBuffer>;

    /// Returns the buffer holding the element at `coordinates` and its
    /// position within that buffer.
    ///
    /// Panics if `coordinates` is out of bounds.
    fn locate(&self, coordinates: &[u64]) -> (usize, usize);
}

// ----------------------------------------------------------------------------

/// An image of `T`s.
///
/// Cloning an `Img` does not clone its storage.
///
/// ```
/// use imgwrap::{View, Array};
/// use imgwrap::v2::{ImgFactory};
/// let img = ImgFactory::Array.create::<i8>(&[2, 2]).unwrap();
/// img.set(&[1, 0], -1);
/// let a: Array<Box<[u64]>, i8> = img.collect();
/// assert_eq!(a.as_ref(), [0, -1, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Img<T: Element> {
    storage: Rc<dyn ImgStorage>,
    linked: LinkedType<T>,
}

impl<T: Element> Img<T> {
    /// Binds the element type `T` to `storage`.
    ///
    /// Fails with `TypeMismatch` if `storage` does not hold `T`s.
    pub fn new(storage: Rc<dyn ImgStorage>) -> Result<Self> {
        if storage.dtype() != T::DTYPE {
            return Err(WrapError::TypeMismatch {expected: T::DTYPE, found: storage.dtype()});
        }
        let linked = LinkedType::bind(storage.buffers())?;
        Ok(Self {storage, linked})
    }

    pub fn dims(&self) -> &[u64] { self.storage.dims() }

    pub fn storage(&self) -> &Rc<dyn ImgStorage> { &self.storage }

    pub fn linked_type(&self) -> &LinkedType<T> { &self.linked }

    /// Panics if `coordinates` is out of bounds.
    pub fn get(&self, coordinates: &[u64]) -> T {
        self.linked.get(self.storage.locate(coordinates))
    }

    /// Panics if `coordinates` is out of bounds.
    pub fn set(&self, coordinates: &[u64], value: T) {
        self.linked.set(self.storage.locate(coordinates), value)
    }
}

impl<T: Element> View for Img<T> {
    type I = Box<[u64]>;
    type T = T;
    fn size(&self) -> Box<[u64]> { self.dims().into() }
    fn at(&self, index: Box<[u64]>) -> T { self.get(&index) }
}

impl<T: Element> CellView for Img<T> {
    fn set_at(&self, index: Box<[u64]>, t: T) { self.set(&index, t) }
}
