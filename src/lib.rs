//! A pure-Rust library for wrapping the storage of an image from one
//! generation of an array library as an image of the other generation,
//! without copying it.
//!
//! The two generations are modelled in [`v1`] (extents are `i32`s) and [`v2`]
//! (extents are `u64`s). Each stores its elements in [`Buffer`]s: shared,
//! fixed-length runs of one primitive type. An image is either flat (one
//! buffer) or tiled (one buffer per tile of a [`TileGrid`]); other storage
//! kinds exist but cannot be wrapped.
//!
//! The functions in [`wrap`] disassemble the source image into its buffers,
//! and reassemble the same buffers into a destination image. Nothing is
//! copied: both images alias the same memory, and a write through either is
//! immediately visible through the other. The conversion is generic over the
//! element type, which can be any type that implements [`Element`]: the
//! signed and unsigned integers of 8, 16, 32 and 64 bits, `f32` and `f64`.
//!
//! ```
//! use imgwrap::{wrap, View, Array};
//! use imgwrap::v1::{ContainerFactory};
//!
//! let image = ContainerFactory::cell(2).create::<u8>(&[3, 3]).unwrap();
//! image.set(&[1, 1], 42);
//! let img = wrap::to_v2(&image).unwrap();
//! assert_eq!(img.get(&[1, 1]), 42);
//!
//! img.set(&[2, 2], 7);
//! let a: Array<Box<[i32]>, u8> = image.collect();
//! assert_eq!(a.as_ref(), [0, 0, 0, 0, 42, 0, 0, 0, 7]);
//! ```
//!
//! [`View`] is the common way to read an image of either generation, or a
//! `Buffer`. [`Array`] is an owned snapshot of a `View`.
//!
//! Conversions log through [`tracing`] at `debug` and `trace` level; the crate
//! never installs a subscriber.

mod error;
pub use error::{WrapError, Result};

mod element;
pub use element::{DType, NumericKind, Element};

mod buffer;
pub use buffer::{Buffer, AnyBuffer};

mod linked;
pub use linked::{LinkedType};

mod index;
pub use index::{Index};

mod view;
pub use view::{View, CellView, NewView, Push, Enumerate, Map};

mod array;
pub use array::{Array};

pub mod extent;

mod grid;
pub use grid::{TileGrid};

pub mod v1;

pub mod v2;

pub mod wrap;
