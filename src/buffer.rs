//! Shared primitive storage.
//!
//! A [`Buffer`] is a fixed-length run of one primitive type. Cloning a
//! `Buffer` clones a handle, not the contents, so any number of containers can
//! hold the same storage. Writes through one handle are immediately visible
//! through every other. The storage lives as long as its longest holder.
//!
//! Buffers are reference-counted with [`Rc`] and mutated through [`Cell`], so
//! they are neither `Send` nor `Sync`: two holders of one buffer can only ever
//! be used from one thread.

use std::cell::{Cell};
use std::fmt::{Debug};
use std::rc::{Rc};

use super::{DType, Element, View, CellView};

/// A shared, fixed-length, mutable run of `T`s.
///
/// ```
/// use imgwrap::{Buffer};
/// let a = Buffer::from_vec(vec![1u8, 2, 3]);
/// let b = a.clone();
/// b.set(1, 20);
/// assert_eq!(a.to_vec(), [1, 20, 3]);
/// assert!(a.ptr_eq(&b));
/// assert_eq!(a.holders(), 2);
/// ```
pub struct Buffer<T>(Rc<[Cell<T>]>);

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Debug for Buffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.0.len())
            .field("ptr", &self.0.as_ptr())
            .finish()
    }
}

impl<T: Copy> Buffer<T> {
    /// Allocates a buffer of `len` default values.
    pub fn new(len: usize) -> Self where T: Default {
        Self::from_vec(vec![T::default(); len])
    }

    /// Takes ownership of `items` as the contents of a new buffer.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self(items.into_iter().map(Cell::new).collect())
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Panics if `index` is out of bounds.
    #[inline(always)]
    pub fn get(&self, index: usize) -> T { self.0[index].get() }

    /// Panics if `index` is out of bounds.
    #[inline(always)]
    pub fn set(&self, index: usize, value: T) { self.0[index].set(value) }

    /// Returns a copy of the contents.
    pub fn to_vec(&self) -> Vec<T> { self.0.iter().map(Cell::get).collect() }

    /// The address of the first element. This is the identity of the storage.
    pub fn as_ptr(&self) -> *const T { self.0.as_ptr() as *const T }

    /// Returns `true` if `self` and `other` are handles to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    /// The number of handles to this storage that currently exist.
    pub fn holders(&self) -> usize { Rc::strong_count(&self.0) }
}

impl<T: Element> Buffer<T> {
    /// Returns a copy of the contents in native byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<T, u8>(&self.to_vec()).to_vec()
    }
}

impl<T: Copy> View for Buffer<T> {
    type I = usize;
    type T = T;
    #[inline(always)]
    fn size(&self) -> usize { self.len() }
    #[inline(always)]
    fn at(&self, index: usize) -> T { self.get(index) }
}

impl<T: Copy> CellView for Buffer<T> {
    #[inline(always)]
    fn set_at(&self, index: usize, t: T) { self.set(index, t) }
}

// ----------------------------------------------------------------------------

/// A [`Buffer`] whose element type is known only at run-time.
#[derive(Debug, Clone)]
pub enum AnyBuffer {
    I8(Buffer<i8>),
    U8(Buffer<u8>),
    I16(Buffer<i16>),
    U16(Buffer<u16>),
    I32(Buffer<i32>),
    U32(Buffer<u32>),
    I64(Buffer<i64>),
    U64(Buffer<u64>),
    F32(Buffer<f32>),
    F64(Buffer<f64>),
}

/// Evaluates `$body` with `$b` bound to the typed buffer inside `$any`.
macro_rules! with_buffer {
    ($any:expr, $b:ident => $body:expr) => {
        match $any {
            AnyBuffer::I8($b) => $body,
            AnyBuffer::U8($b) => $body,
            AnyBuffer::I16($b) => $body,
            AnyBuffer::U16($b) => $body,
            AnyBuffer::I32($b) => $body,
            AnyBuffer::U32($b) => $body,
            AnyBuffer::I64($b) => $body,
            AnyBuffer::U64($b) => $body,
            AnyBuffer::F32($b) => $body,
            AnyBuffer::F64($b) => $body,
        }
    }
}

impl AnyBuffer {
    /// Allocates a zeroed buffer of `len` elements of type `dtype`.
    pub fn zeroed(dtype: DType, len: usize) -> Self {
        match dtype {
            DType::I8 => Self::I8(Buffer::new(len)),
            DType::U8 => Self::U8(Buffer::new(len)),
            DType::I16 => Self::I16(Buffer::new(len)),
            DType::U16 => Self::U16(Buffer::new(len)),
            DType::I32 => Self::I32(Buffer::new(len)),
            DType::U32 => Self::U32(Buffer::new(len)),
            DType::I64 => Self::I64(Buffer::new(len)),
            DType::U64 => Self::U64(Buffer::new(len)),
            DType::F32 => Self::F32(Buffer::new(len)),
            DType::F64 => Self::F64(Buffer::new(len)),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Self::I8(_) => DType::I8,
            Self::U8(_) => DType::U8,
            Self::I16(_) => DType::I16,
            Self::U16(_) => DType::U16,
            Self::I32(_) => DType::I32,
            Self::U32(_) => DType::U32,
            Self::I64(_) => DType::I64,
            Self::U64(_) => DType::U64,
            Self::F32(_) => DType::F32,
            Self::F64(_) => DType::F64,
        }
    }

    pub fn len(&self) -> usize { with_buffer!(self, b => b.len()) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn as_ptr(&self) -> *const u8 { with_buffer!(self, b => b.as_ptr() as *const u8) }

    /// Returns `true` if `self` and `other` are handles to the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.dtype() == other.dtype() && self.as_ptr() == other.as_ptr()
    }

    /// Downcasts to `Buffer<T>`, or reports the stored type.
    pub fn typed<T: Element>(&self) -> super::Result<&Buffer<T>> {
        T::downcast(self).ok_or(super::WrapError::TypeMismatch {
            expected: T::DTYPE,
            found: self.dtype(),
        })
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::{WrapError};

    #[test]
    fn clone_shares_storage() {
        let a: Buffer<i32> = Buffer::new(4);
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert_eq!(a.as_ptr(), b.as_ptr());
        b.set(3, -7);
        assert_eq!(a.get(3), -7);
        drop(a);
        assert_eq!(b.holders(), 1);
        assert_eq!(b.to_vec(), [0, 0, 0, -7]);
    }

    #[test]
    fn distinct_buffers() {
        let a = Buffer::from_vec(vec![1u8]);
        let b = Buffer::from_vec(vec![1u8]);
        assert!(!a.ptr_eq(&b));
        assert!(!u8::erase(a).ptr_eq(&u8::erase(b)));
    }

    #[test]
    fn bytes() {
        let a = Buffer::from_vec(vec![1u16, 0x0203]);
        let expected: Vec<u8> = [1u16.to_ne_bytes(), 0x0203u16.to_ne_bytes()].concat();
        assert_eq!(a.to_bytes(), expected);
    }

    #[test]
    fn view() {
        let a = Buffer::from_vec(vec![5i64, 6, 7]);
        assert_eq!(a.size(), 3);
        assert_eq!(a.at(2), 7);
        a.set_at(0, 50);
        let mut seen = Vec::new();
        (&a).each(|x| seen.push(x));
        assert_eq!(seen, [50, 6, 7]);
    }

    #[test]
    fn zeroed_and_typed() {
        for &dtype in DType::ALL {
            let any = AnyBuffer::zeroed(dtype, 5);
            assert_eq!(any.dtype(), dtype);
            assert_eq!(any.len(), 5);
        }
        let any = AnyBuffer::zeroed(DType::I32, 2);
        assert!(any.typed::<i32>().is_ok());
        assert_eq!(
            any.typed::<u32>().unwrap_err(),
            WrapError::TypeMismatch {expected: DType::U32, found: DType::I32},
        );
    }
}
