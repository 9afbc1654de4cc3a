use std::fmt::{Debug};

/// Implemented by types that can be used to index an image or an [`Array`].
///
/// Every `Index` type defines a total order on the valid indices for a given
/// size, and hence a bijection with `0..length(size)`. For per-axis
/// coordinates the first axis varies fastest: this is the order of the pixels
/// in a flat buffer, inside each tile, and of the tiles in a grid.
///
/// [`Array`]: super::Array
pub trait Index: Clone + Debug {
    /// The run-time representation of the size of an image.
    type Size: Clone + PartialEq + Debug;

    /// Returns the number of elements in an image of size `size`.
    ///
    /// Panics if the number does not fit in a `usize`.
    fn length(size: &Self::Size) -> usize;

    /// Returns the position (in `0..length()`) of `self`.
    ///
    /// Panics if `self` is not a valid index into an image of size `size`.
    fn to_usize(&self, size: &Self::Size) -> usize;

    /// Returns `index / length(size)` and the `Self` for which `to_usize()`
    /// returns `index % length(size)`.
    fn from_usize(size: &Self::Size, index: usize) -> (usize, Self);

    /// Equivalent to, but often more efficient than,
    /// ```text
    /// for i in 0..Self::length(size) { f(Self::from_usize(size, i).1); }
    /// ```
    fn each(size: &Self::Size, mut f: impl FnMut(Self)) {
        for i in 0..Self::length(size) { f(Self::from_usize(size, i).1); }
    }
}

impl Index for usize {
    type Size = usize;

    fn length(size: &Self::Size) -> usize { *size }

    fn to_usize(&self, size: &Self::Size) -> usize {
        assert!(self < size, "Index {:?} is out of bounds for size {:?}", self, size);
        *self
    }

    fn from_usize(size: &Self::Size, index: usize) -> (usize, Self) {
        if *size == 0 { return (index, 0); }
        (index / size, index % size)
    }

    fn each(size: &Self::Size, mut f: impl FnMut(Self)) {
        for i in 0..*size { f(i); }
    }
}

// ----------------------------------------------------------------------------

/// Returns the position of `coordinates` in an image of size `size`, with the
/// first axis varying fastest.
///
/// Panics if `coordinates` is out of bounds.
pub(crate) fn position<D: Copy + Debug + Into<i128>>(coordinates: &[D], size: &[D]) -> usize {
    assert_eq!(coordinates.len(), size.len(), "Index {:?} has the wrong rank for size {:?}", coordinates, size);
    let mut index = 0;
    for (&i, &n) in coordinates.iter().zip(size.iter()).rev() {
        let (i, n): (i128, i128) = (i.into(), n.into());
        assert!(0 <= i && i < n, "Index {:?} is out of bounds for size {:?}", coordinates, size);
        index = index * (n as usize) + (i as usize);
    }
    index
}

/// Implements [`Index`] for per-axis coordinates of the given integer type.
macro_rules! impl_index_for_coordinates {
    ($($d:ty),*) => {$(
        impl Index for Box<[$d]> {
            type Size = Box<[$d]>;

            fn length(size: &Self::Size) -> usize {
                if size.iter().any(|&n| n == 0) { return 0; }
                size.iter()
                    .try_fold(1usize, |l, &n| usize::try_from(n).ok().and_then(|n| l.checked_mul(n)))
                    .unwrap_or_else(|| panic!("Size {:?} has too many elements", size))
            }

            fn to_usize(&self, size: &Self::Size) -> usize { position(&self[..], &size[..]) }

            fn from_usize(size: &Self::Size, mut index: usize) -> (usize, Self) {
                let coordinates = size.iter().map(|&n| {
                    let n = n as usize;
                    if n == 0 { return 0; }
                    let i = index % n;
                    index /= n;
                    i as $d
                }).collect();
                (index, coordinates)
            }

            fn each(size: &Self::Size, mut f: impl FnMut(Self)) {
                let length = Self::length(size);
                if length == 0 { return; }
                let mut coordinates: Self = vec![0; size.len()].into();
                for _ in 0..length {
                    f(coordinates.clone());
                    for (i, &n) in coordinates.iter_mut().zip(size.iter()) {
                        *i += 1;
                        if *i < n { break; }
                        *i = 0;
                    }
                }
            }
        }
    )*}
}

impl_index_for_coordinates!(i32, u64);

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_axis_fastest() {
        let size: Box<[u64]> = vec![3, 2].into();
        let mut seen = Vec::new();
        <Box<[u64]>>::each(&size, |c| seen.push(c.to_vec()));
        assert_eq!(seen, [
            [0, 0], [1, 0], [2, 0],
            [0, 1], [1, 1], [2, 1],
        ]);
    }

    #[test]
    fn to_from_usize() {
        let size: Box<[i32]> = vec![4, 3, 2].into();
        assert_eq!(<Box<[i32]>>::length(&size), 24);
        for i in 0..24 {
            let (q, c) = <Box<[i32]>>::from_usize(&size, i);
            assert_eq!(q, 0);
            assert_eq!(c.to_usize(&size), i);
        }
        let c: Box<[i32]> = vec![1, 2, 1].into();
        assert_eq!(c.to_usize(&size), 1 + 4 * (2 + 3 * 1));
        assert_eq!(<Box<[i32]>>::from_usize(&size, 25).0, 1);
    }

    #[test]
    fn empty() {
        let size: Box<[u64]> = vec![5, 0].into();
        assert_eq!(<Box<[u64]>>::length(&size), 0);
        <Box<[u64]>>::each(&size, |_| panic!("no elements"));
    }

    #[test]
    #[should_panic(expected = "too many elements")]
    fn length_overflow() {
        let size: Box<[u64]> = vec![u64::MAX, 2].into();
        <Box<[u64]>>::length(&size);
    }

    #[test]
    #[should_panic]
    fn negative_coordinate() {
        let size: Box<[i32]> = vec![4].into();
        let c: Box<[i32]> = vec![-1].into();
        c.to_usize(&size);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds() {
        5usize.to_usize(&5);
    }
}
