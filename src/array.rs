use super::{Index, View, Push, NewView};

/// A dense array of `T`s indexed by `I`.
///
/// Unlike an image, an `Array` owns its elements. It is mainly useful as a
/// snapshot of a [`View`].
#[derive(Debug, Clone, PartialEq)]
pub struct Array<I: Index, T> {
    size: I::Size,
    items: Box<[T]>,
}

impl<I: Index, T> Array<I, T> {
    fn new_inner(size: I::Size, items: Box<[T]>) -> Self {
        assert_eq!(I::length(&size), items.len());
        Self {size, items}
    }

    /// Constructs an `Array` of size `size` given its elements.
    ///
    /// ```
    /// use imgwrap::{View, Array};
    /// let a: Array<Box<[u64]>, f32> = Array::new(vec![2, 2].into(), [0.0, 1.0, -1.0, 2.0]);
    /// assert_eq!(a.at(vec![1, 0].into()), 1.0);
    /// assert_eq!(a.at(vec![0, 1].into()), -1.0);
    /// ```
    pub fn new(size: I::Size, items: impl Into<Box<[T]>>) -> Self {
        Self::new_inner(size, items.into())
    }

    /// Construct an `Array` of size `size` from a function.
    ///
    /// ```
    /// use imgwrap::{Array};
    /// let a: Array<usize, _> = Array::from_fn(10, |x| x % 3 == 0);
    /// assert_eq!(a.as_ref(), [true, false, false, true, false, false, true, false, false, true]);
    /// ```
    pub fn from_fn(size: I::Size, mut f: impl FnMut(I) -> T) -> Self {
        let mut items = Vec::with_capacity(I::length(&size));
        I::each(&size, |i| items.push(f(i)));
        Self::new_inner(size, items.into())
    }

    /// Returns the raw array elements.
    pub fn to_raw(self) -> Box<[T]> { self.items }
}

impl<I: Index, T> std::convert::AsRef<[T]> for Array<I, T> {
    fn as_ref(&self) -> &[T] { &self.items }
}

impl<I: Index, T> std::convert::AsMut<[T]> for Array<I, T> {
    fn as_mut(&mut self) -> &mut [T] { &mut self.items }
}

impl<I: Index, T: Clone> View for Array<I, T> {
    type I = I;
    type T = T;
    #[inline(always)]
    fn size(&self) -> I::Size { self.size.clone() }
    #[inline(always)]
    fn len(&self) -> usize { self.items.len() }
    #[inline(always)]
    fn at(&self, index: I) -> T { self.items[index.to_usize(&self.size)].clone() }
}

// ----------------------------------------------------------------------------

impl<T> Push<T> for Vec<T> {
    fn push(&mut self, t: T) { Vec::push(self, t); }
}

impl<I: Index, T: Clone> NewView for Array<I, T> {
    type Buffer = Vec<T>;

    fn new_view(
        size: I::Size,
        callback: impl FnOnce(&mut Self::Buffer),
    ) -> Self {
        let mut buffer = Vec::with_capacity(I::length(&size));
        callback(&mut buffer);
        Self::new_inner(size, buffer.into())
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_preserves_order() {
        let a: Array<Box<[i32]>, (i32, i32)> = Array::from_fn(vec![2, 3].into(), |c: Box<[i32]>| (c[0], c[1]));
        let b: Array<Box<[i32]>, _> = (&a).collect();
        assert_eq!(a, b);
        assert_eq!(b.as_ref()[..3], [(0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn enumerate() {
        let a: Array<usize, char> = Array::new(3, ['x', 'y', 'z']);
        let e: Array<usize, (usize, char)> = (&a).enumerate().collect();
        assert_eq!(e.as_ref(), [(0, 'x'), (1, 'y'), (2, 'z')]);
    }

    #[test]
    #[should_panic]
    fn wrong_length() {
        let _: Array<usize, u8> = Array::new(3, [1, 2]);
    }
}
