//! Conversions between narrow (`i32`) and wide (`u64`) extents.
//!
//! Library generation 1 measures images with `i32`s and generation 2 with
//! `u64`s. Widening can only fail on a negative dimension. Narrowing fails on
//! any dimension above `i32::MAX`; it never truncates.

use super::{Result, WrapError};

/// Widens a narrow extent.
///
/// ```
/// use imgwrap::extent;
/// assert_eq!(&*extent::widen(&[19, 8, 3]).unwrap(), &[19, 8, 3]);
/// assert!(extent::widen(&[4, -1]).is_err());
/// ```
pub fn widen(dims: &[i32]) -> Result<Box<[u64]>> {
    dims.iter().enumerate().map(|(axis, &d)| {
        u64::try_from(d).map_err(|_| WrapError::NegativeDimension {axis, value: d.into()})
    }).collect()
}

/// Narrows a wide extent.
///
/// ```
/// use imgwrap::{extent, WrapError};
/// assert_eq!(&*extent::narrow(&[19, 8, 3]).unwrap(), &[19, 8, 3]);
/// assert_eq!(
///     extent::narrow(&[1, 1 << 31]),
///     Err(WrapError::DimensionOverflow {axis: 1, value: 1 << 31}),
/// );
/// ```
pub fn narrow(dims: &[u64]) -> Result<Box<[i32]>> {
    dims.iter().enumerate().map(|(axis, &d)| {
        i32::try_from(d).map_err(|_| WrapError::DimensionOverflow {axis, value: d})
    }).collect()
}

/// Narrows a tile size.
pub fn narrow_tile(tile_size: &[u32]) -> Result<Box<[i32]>> {
    tile_size.iter().enumerate().map(|(axis, &d)| {
        i32::try_from(d).map_err(|_| WrapError::DimensionOverflow {axis, value: d.into()})
    }).collect()
}

/// Widens a narrow tile size.
pub fn widen_tile(tile_size: &[i32]) -> Result<Box<[u32]>> {
    tile_size.iter().enumerate().map(|(axis, &d)| {
        u32::try_from(d).map_err(|_| WrapError::NegativeDimension {axis, value: d.into()})
    }).collect()
}

/// The number of elements in an image of extent `dims`.
///
/// Fails with `ExtentTooLarge` if the number does not fit in a `usize`.
///
/// ```
/// use imgwrap::{extent, WrapError};
/// assert_eq!(extent::length(&[19, 8, 3]), Ok(456));
/// assert!(matches!(extent::length(&[1 << 32, 1 << 32]), Err(WrapError::ExtentTooLarge {..})));
/// ```
pub fn length(dims: &[u64]) -> Result<usize> {
    if dims.contains(&0) { return Ok(0); }
    dims.iter()
        .try_fold(1usize, |n, &d| usize::try_from(d).ok().and_then(|d| n.checked_mul(d)))
        .ok_or_else(|| WrapError::ExtentTooLarge {dims: dims.into()})
}

// ----------------------------------------------------------------------------
