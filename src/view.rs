use std::fmt::{Debug};
use std::ops::{Deref};

use super::{Index};

/// A buffer that accumulates items of type `T`.
pub trait Push<T> {
    /// Append `t` to `self`.
    fn push(&mut self, t: T);
}

// ----------------------------------------------------------------------------

/// Construct a multi-dimensional collection. This is used to implement
/// [`View::collect()`].
pub trait NewView: View {
    /// The type of a partially constructed `Self`.
    type Buffer: Push<Self::T>;

    /// Construct a `Self` of size `size`.
    ///
    /// - callback - This will be called once, passing a `Self::Buffer` large
    /// enough to hold `size` items. It must fill the buffer by calling
    /// `Push::push()` once for each item, in the order defined by
    /// [`Index::to_usize()`].
    ///
    /// # Panics
    ///
    /// Panics if `callback` does, or if it pushes the wrong number of items.
    fn new_view(
        size: <Self::I as Index>::Size,
        callback: impl FnOnce(&mut Self::Buffer),
    ) -> Self;
}

// ----------------------------------------------------------------------------

/// Implemented by types that behave like an array of `Self::T`s indexed by
/// `Self::I`.
///
/// Images of both library generations implement `View`, as do [`Buffer`]s
/// and [`Array`]s. A `View` of an image reads the image's storage on demand:
/// it never copies it.
///
/// If `V` implements `View`, then so do `&V`, `Box<V>`, `Rc<V>` and all other
/// types that [`Deref`] to `V`.
///
/// ```
/// use imgwrap::{View, Buffer, Array};
/// let b = Buffer::from_vec(vec![3u8, 1, 4]);
/// let a: Array<usize, u8> = (&b).map(|x| x * 2).collect();
/// assert_eq!(a.as_ref(), [6, 2, 8]);
/// ```
///
/// [`Buffer`]: super::Buffer
/// [`Array`]: super::Array
pub trait View: Sized {
    /// The index type.
    type I: Index;

    /// The element type.
    type T: Clone;

    /// The size of the array.
    fn size(&self) -> <Self::I as Index>::Size;

    /// The number of elements in `Self`.
    fn len(&self) -> usize { <Self::I as Index>::length(&self.size()) }

    /// Read the element at `index`.
    fn at(&self, index: Self::I) -> Self::T;

    /// Materialises this `View` into a collection of type `A`, e.g. an
    /// [`Array`].
    ///
    /// This method guarantees to call [`self.at()`] exactly once for each
    /// index.
    ///
    /// [`Array`]: super::Array
    /// [`self.at()`]: Self::at()
    fn collect<A>(&self) -> A where
        A: NewView<I=Self::I, T=Self::T>,
    {
        A::new_view(self.size(), |buffer| { self.each(|t| buffer.push(t)); })
    }

    /// Apply `f` to every element of this `View` in turn.
    fn each(self, mut f: impl FnMut(Self::T)) {
        Self::I::each(&self.size(), |i| f(self.at(i)));
    }

    /// Creates a `View` with the same `Index` type as `self` such that `at(i)`
    /// returns `(i, self.at(i))`.
    fn enumerate(self) -> Enumerate<Self> {
        Enumerate(self)
    }

    /// Creates a `View` that applies `f` to the elements of `Self`.
    ///
    /// There is no guarantee that the elements will be passed to `f` in a
    /// particular order, only once, or at all.
    fn map<U: Clone, F>(self, f: F) -> Map<Self, F> where
        F: Fn(Self::T) -> U,
    {
        Map(self, f)
    }
}

impl<V: View, T: Deref<Target=V>> View for T {
    type I = V::I;
    type T = V::T;
    #[inline(always)]
    fn size(&self) -> <Self::I as Index>::Size { V::size(self) }
    #[inline(always)]
    fn at(&self, index: Self::I) -> Self::T { V::at(self, index) }
}

// ----------------------------------------------------------------------------

/// Implemented by [`View`]s whose elements live in shared storage, and can
/// therefore be written through a shared reference.
///
/// A write is visible immediately through every `View` that aliases the same
/// storage.
pub trait CellView: View {
    /// Overwrite the element at `index`.
    fn set_at(&self, index: Self::I, t: Self::T);
}

impl<V: CellView, T: Deref<Target=V>> CellView for T {
    #[inline(always)]
    fn set_at(&self, index: Self::I, t: Self::T) { V::set_at(self, index, t) }
}

// ----------------------------------------------------------------------------

/// The return type of [`View::enumerate()`].
#[derive(Debug, Copy, Clone)]
pub struct Enumerate<V>(V);

impl<V: View> View for Enumerate<V> {
    type I = V::I;
    type T = (V::I, V::T);
    #[inline(always)]
    fn size(&self) -> <Self::I as Index>::Size { self.0.size() }
    #[inline(always)]
    fn at(&self, index: Self::I) -> Self::T { (index.clone(), self.0.at(index)) }
}

// ----------------------------------------------------------------------------

/// The return type of [`View::map()`].
#[derive(Copy, Clone)]
pub struct Map<V, F>(V, F);

impl<V: Debug, F> Debug for Map<V, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Map").field(&self.0).finish()
    }
}

impl<V: View, U: Clone, F: Fn(V::T) -> U> View for Map<V, F> {
    type I = V::I;
    type T = U;
    #[inline(always)]
    fn size(&self) -> <Self::I as Index>::Size { self.0.size() }
    #[inline(always)]
    fn at(&self, index: Self::I) -> Self::T { self.1(self.0.at(index)) }
}
