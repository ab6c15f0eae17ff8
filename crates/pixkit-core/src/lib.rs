//! # pixkit-core
//!
//! Core types shared by every pixkit crate.
//!
//! - [`PixelFormat`] - Component trait implemented for `u8`, `u16`, `f16`, `f32`
//! - [`Image`], [`ImageFrame`] - Multi-frame pixel buffers
//! - [`Rect`], [`Size`], [`Point`] - Integer geometry
//! - [`ImageMetadata`], [`FrameMetadata`] - Pass-through metadata
//!
//! ## Pixels
//!
//! A pixel is a fixed-size array `[T; N]` of components. Processors are
//! written once against `T: PixelFormat` and the const channel count `N`,
//! so the same resize code handles 8-bit RGBA, 16-bit grayscale or float
//! buffers without runtime dispatch:
//!
//! ```rust
//! use pixkit_core::Image;
//!
//! let rgba: Image<u8, 4> = Image::filled(64, 32, [255, 0, 0, 255]);
//! let gray: Image<f32, 1> = Image::new(64, 32);
//! assert_eq!(rgba.dimensions(), gray.dimensions());
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! pixkit-core (this crate)
//!    ^
//!    +-- pixkit-transfer (companding curves)
//!    +-- pixkit-ops (resize, pipeline, transforms)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for geometry types

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod metadata;
pub mod pixel;
pub mod rect;

pub use error::{Error, Result};
pub use image::{FrameMut, Image, ImageFrame};
pub use metadata::{
    AttrValue, DisposalMethod, FrameMetadata, ImageMetadata, ImageProperty, MetadataFormat,
    PropertyTag,
};
pub use pixel::{PixelFormat, pixel_from_f32, pixel_to_f32};
pub use rect::{Point, Rect, Size};

/// Prelude module for convenient imports.
///
/// ```
/// use pixkit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{FrameMut, Image, ImageFrame};
    pub use crate::metadata::{FrameMetadata, ImageMetadata};
    pub use crate::pixel::PixelFormat;
    pub use crate::rect::{Point, Rect, Size};
}
