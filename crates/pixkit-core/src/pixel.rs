//! Pixel component types.
//!
//! A pixel is `[T; N]`: `N` components of a type implementing
//! [`PixelFormat`]. The trait exposes only what resampling needs,
//! conversion to and from normalized `f32`, so weighted sums are
//! computed in float regardless of the storage type.
//!
//! | Type | Range of `to_f32` |
//! |------|-------------------|
//! | `u8` | [0, 1] |
//! | `u16` | [0, 1] |
//! | `f16` | unclamped |
//! | `f32` | unclamped |
//!
//! ```
//! use pixkit_core::{pixel_from_f32, pixel_to_f32};
//!
//! let px: [u8; 4] = [255, 128, 0, 255];
//! let f = pixel_to_f32(px);
//! assert!((f[1] - 0.502).abs() < 0.01);
//! assert_eq!(pixel_from_f32::<u8, 4>(f), px);
//! ```

use half::f16;

/// Storage type of a single pixel component.
pub trait PixelFormat: Copy + Default + Send + Sync + PartialOrd + std::fmt::Debug + 'static {
    /// Number of bits per component.
    const BITS: u32;

    /// Whether values are stored as floating point.
    const IS_FLOAT: bool;

    /// Converts to f32. Integers are normalized to [0, 1].
    fn to_f32(self) -> f32;

    /// Converts from f32. Integers expect [0, 1] and are clamped and rounded.
    fn from_f32(v: f32) -> Self;

    /// Zero value.
    fn zero() -> Self;

    /// Full intensity (1.0 for floats, max for integers).
    fn one() -> Self;
}

impl PixelFormat for u8 {
    const BITS: u32 = 8;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 255.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        u8::MAX
    }
}

impl PixelFormat for u16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = false;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32 / 65535.0
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        (v.clamp(0.0, 1.0) * 65535.0).round() as u16
    }

    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn one() -> Self {
        u16::MAX
    }
}

impl PixelFormat for f16 {
    const BITS: u32 = 16;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        f16::to_f32(self)
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        f16::from_f32(v)
    }

    #[inline]
    fn zero() -> Self {
        f16::ZERO
    }

    #[inline]
    fn one() -> Self {
        f16::ONE
    }
}

impl PixelFormat for f32 {
    const BITS: u32 = 32;
    const IS_FLOAT: bool = true;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn one() -> Self {
        1.0
    }
}

/// Converts every component of a pixel to f32.
#[inline]
pub fn pixel_to_f32<T: PixelFormat, const N: usize>(px: [T; N]) -> [f32; N] {
    px.map(PixelFormat::to_f32)
}

/// Builds a pixel from f32 components.
#[inline]
pub fn pixel_from_f32<T: PixelFormat, const N: usize>(px: [f32; N]) -> [T; N] {
    px.map(T::from_f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_roundtrip_extremes() {
        assert_eq!(u8::from_f32(0.0), 0);
        assert_eq!(u8::from_f32(1.0), 255);
        assert_eq!(u8::from_f32(1.7), 255);
        assert_eq!(u8::from_f32(-0.3), 0);
        assert_eq!(u8::from_f32(0.5), 128);
    }

    #[test]
    fn test_u16_normalization() {
        assert_eq!(u16::BITS, 16);
        assert!(!u16::IS_FLOAT);
        assert_eq!(u16::from_f32(0.5), 32768);
        assert!((u16::one().to_f32() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_f16_passthrough() {
        let v = <f16 as PixelFormat>::from_f32(0.25);
        assert_eq!(PixelFormat::to_f32(v), 0.25);
        assert!(f16::IS_FLOAT);
    }

    #[test]
    fn test_float_values_unclamped() {
        assert_eq!(f32::from_f32(2.5), 2.5);
        assert_eq!(pixel_to_f32([-1.0f32, 3.0]), [-1.0, 3.0]);
    }
}
