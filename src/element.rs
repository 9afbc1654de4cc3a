//! Descriptors for the primitive element types that images can store.

use std::fmt::{Debug};

use super::{Buffer, AnyBuffer};

/// Whether a primitive is a signed integer, an unsigned integer or a float.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum NumericKind {
    Signed,
    Unsigned,
    Float,
}

/// Run-time tag naming one of the primitive element types.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum DType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl DType {
    /// Every `DType`, narrowest first.
    pub const ALL: &'static [Self] = &[
        Self::I8, Self::U8, Self::I16, Self::U16, Self::I32,
        Self::U32, Self::I64, Self::U64, Self::F32, Self::F64,
    ];

    /// Size in bytes of one element.
    pub const fn byte_size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    pub const fn kind(self) -> NumericKind {
        match self {
            Self::I8 | Self::I16 | Self::I32 | Self::I64 => NumericKind::Signed,
            Self::U8 | Self::U16 | Self::U32 | Self::U64 => NumericKind::Unsigned,
            Self::F32 | Self::F64 => NumericKind::Float,
        }
    }

    /// The name of the corresponding Rust primitive.
    pub const fn name(self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::I64 => "i64",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ----------------------------------------------------------------------------

/// Implemented by the primitive types that an image can store.
///
/// This is the only per-type code in the crate. Everything else is generic
/// over `Element`.
///
/// ```
/// use imgwrap::{Buffer, DType, Element, NumericKind};
/// assert_eq!(u16::DTYPE, DType::U16);
/// assert_eq!(u16::DTYPE.kind(), NumericKind::Unsigned);
/// let any = u16::erase(Buffer::from_vec(vec![7, 8]));
/// assert_eq!(any.dtype(), DType::U16);
/// assert!(u16::downcast(&any).is_some());
/// assert!(i16::downcast(&any).is_none());
/// ```
pub trait Element: 'static + Debug + Default + PartialEq + bytemuck::Pod {
    /// The run-time tag of `Self`.
    const DTYPE: DType;

    /// Forget the element type of `buffer`. The storage is not copied.
    fn erase(buffer: Buffer<Self>) -> AnyBuffer;

    /// Recover the element type of `buffer`, if it is `Self`.
    fn downcast(buffer: &AnyBuffer) -> Option<&Buffer<Self>>;
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident,)*) => {$(
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline(always)]
            fn erase(buffer: Buffer<Self>) -> AnyBuffer { AnyBuffer::$variant(buffer) }

            #[inline(always)]
            fn downcast(buffer: &AnyBuffer) -> Option<&Buffer<Self>> {
                match buffer { AnyBuffer::$variant(b) => Some(b), _ => None }
            }
        }
    )*}
}

impl_element! {
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
}

// ----------------------------------------------------------------------------
