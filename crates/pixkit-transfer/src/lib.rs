//! # pixkit-transfer
//!
//! Transfer functions for companding pixel data around weighted sums.
//!
//! Resampling encoded (gamma-compressed) values averages them in the wrong
//! space and darkens high-contrast edges. Companding expands every colour
//! component to linear light first and compresses the result afterwards.
//!
//! - **EOTF**: encoded -> linear ([`srgb::eotf`], [`srgb::expand`])
//! - **OETF**: linear -> encoded ([`srgb::oetf`], [`srgb::compress`])
//!
//! ```rust
//! use pixkit_transfer::srgb;
//!
//! let mut px = [0.5f32, 0.5, 0.5, 0.5];
//! srgb::expand(&mut px);
//! assert!((px[0] - 0.214).abs() < 0.01);
//! assert_eq!(px[3], 0.5); // alpha stays linear
//! srgb::compress(&mut px);
//! assert!((px[0] - 0.5).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod srgb;

pub use srgb::{eotf as srgb_eotf, oetf as srgb_oetf};
