//! # pixkit-ops
//!
//! Image operations over [`pixkit_core::Image`] buffers.
//!
//! # Modules
//!
//! - [`resampler`] - Filter kernels (box, cubic family, Lanczos, ...)
//! - [`resize`] - Mode resolution, weight tables and separable convolution
//! - [`transform`] - Flip, rotate and crop
//! - [`pipeline`] - Running ordered operations in place or on a copy
//!
//! Every operation is an [`ImageProcessor`]: it rewrites all frames of an
//! image the same way and passes metadata through.
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::pipeline;
//! use pixkit_ops::resampler::Lanczos3Resampler;
//! use pixkit_ops::resize::{ResizeMode, ResizeOptions};
//! use pixkit_ops::transform::Rotation;
//!
//! let mut img: Image<u16, 3> = Image::new(640, 480);
//! pipeline::mutate_with(&mut img, |ops| {
//!     ops.resize_with(
//!         ResizeOptions::new((320, 320).into())
//!             .with_mode(ResizeMode::Pad)
//!             .with_sampler(Lanczos3Resampler)
//!             .with_compand(true),
//!     )?
//!     .rotate(Rotation::Rotate90)?;
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(img.dimensions(), (320, 320));
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - Distribute convolution rows with rayon
//! - `serde` - Serialization for mode and anchor enums

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod pipeline;
pub mod processor;
pub mod resampler;
pub mod resize;
pub mod transform;

pub use error::{OpsError, OpsResult};
pub use pipeline::{Operations, Step, generate, generate_with, mutate, mutate_with};
pub use processor::ImageProcessor;
pub use resampler::Resampler;
pub use resize::{AnchorPosition, ResizeMode, ResizeOptions, ResizeProcessor};
pub use transform::{CropProcessor, FlipMode, FlipProcessor, RotateProcessor, Rotation};
