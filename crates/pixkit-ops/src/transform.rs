//! Geometric transformation operations.
//!
//! Lossless pixel rearrangements that work on any pixel format:
//!
//! - [`crop`] - Extract a region of interest
//! - [`flip_horizontal`] / [`flip_vertical`] - Mirror in place
//! - [`rotate`] - Quarter-turn rotations
//!
//! Each has a processor counterpart ([`CropProcessor`], [`FlipProcessor`],
//! [`RotateProcessor`]) that applies it to every frame of an image.
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::{Image, Rect};
//! use pixkit_ops::transform::{Rotation, RotateProcessor};
//! use pixkit_ops::ImageProcessor;
//!
//! let mut img: Image<u8, 3> = Image::new(64, 32);
//! RotateProcessor::new(Rotation::Rotate90)
//!     .apply(&mut img, Rect::from_size(64, 32))
//!     .unwrap();
//! assert_eq!(img.dimensions(), (32, 64));
//! ```

use crate::processor::ImageProcessor;
use crate::OpsResult;
use pixkit_core::{Error, Image, ImageFrame, PixelFormat, Rect};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Copies `rect` out of `frame` into a new frame.
///
/// # Errors
///
/// Returns [`Error::InvalidRegion`] if `rect` is not inside the frame.
pub fn crop<T: PixelFormat, const N: usize>(
    frame: &ImageFrame<T, N>,
    rect: Rect,
) -> OpsResult<ImageFrame<T, N>> {
    if !rect.fits_within(frame.width(), frame.height()) {
        return Err(Error::invalid_region(rect, frame.width(), frame.height()).into());
    }

    let x0 = rect.x as usize * N;
    let x1 = x0 + rect.width as usize * N;
    let mut data = Vec::with_capacity(rect.area() as usize * N);
    for y in 0..rect.height {
        data.extend_from_slice(&frame.row(rect.y as u32 + y)[x0..x1]);
    }

    let out = ImageFrame::from_data(rect.width, rect.height, data)?;
    Ok(out.with_metadata(frame.metadata))
}

/// Mirrors a frame left to right.
pub fn flip_horizontal<T: PixelFormat, const N: usize>(frame: &mut ImageFrame<T, N>) {
    let width = frame.width() as usize;
    mirror_columns::<T, N>(frame.data_mut(), width);
}

/// Mirrors a frame top to bottom.
pub fn flip_vertical<T: PixelFormat, const N: usize>(frame: &mut ImageFrame<T, N>) {
    let stride = frame.width() as usize * N;
    mirror_rows(frame.data_mut(), stride);
}

fn mirror_columns<T: PixelFormat, const N: usize>(data: &mut [T], width: usize) {
    if width == 0 {
        return;
    }
    for row in data.chunks_exact_mut(width * N) {
        for x in 0..width / 2 {
            let mirror = width - 1 - x;
            for c in 0..N {
                row.swap(x * N + c, mirror * N + c);
            }
        }
    }
}

fn mirror_rows<T>(data: &mut [T], stride: usize) {
    if stride == 0 {
        return;
    }
    let height = data.len() / stride;
    for y in 0..height / 2 {
        let (top, bottom) = data.split_at_mut((height - 1 - y) * stride);
        top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
    }
}

/// Rotates a frame clockwise by a quarter-turn multiple.
///
/// 90 and 270 degree rotations swap width and height.
pub fn rotate<T: PixelFormat, const N: usize>(
    frame: &ImageFrame<T, N>,
    rotation: Rotation,
) -> ImageFrame<T, N> {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let src = frame.data();

    let (new_w, new_h) = match rotation {
        Rotation::Rotate90 | Rotation::Rotate270 => (h, w),
        Rotation::None | Rotation::Rotate180 => (w, h),
    };
    let mut dst = vec![T::zero(); src.len()];

    for y in 0..h {
        for x in 0..w {
            let (nx, ny) = match rotation {
                Rotation::None => (x, y),
                Rotation::Rotate90 => (h - 1 - y, x),
                Rotation::Rotate180 => (w - 1 - x, h - 1 - y),
                Rotation::Rotate270 => (y, w - 1 - x),
            };
            let s = (y * w + x) * N;
            let d = (ny * new_w + nx) * N;
            dst[d..d + N].copy_from_slice(&src[s..s + N]);
        }
    }

    let mut out = ImageFrame::new(new_w as u32, new_h as u32);
    out.data_mut().copy_from_slice(&dst);
    out.with_metadata(frame.metadata)
}

/// Flip direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlipMode {
    /// Leave the image as is.
    #[default]
    None,
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

/// Clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// A quarter turn.
    Rotate90,
    /// A half turn.
    Rotate180,
    /// Three quarter turns.
    Rotate270,
}

impl Rotation {
    /// Rotation for a clockwise angle in degrees, if it is a multiple of 90.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::None),
            90 => Some(Self::Rotate90),
            180 => Some(Self::Rotate180),
            270 => Some(Self::Rotate270),
            _ => None,
        }
    }
}

/// Mirrors every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlipProcessor {
    /// Flip direction.
    pub mode: FlipMode,
}

impl FlipProcessor {
    /// Creates a flip processor.
    pub fn new(mode: FlipMode) -> Self {
        Self { mode }
    }
}

impl<T: PixelFormat, const N: usize> ImageProcessor<T, N> for FlipProcessor {
    fn name(&self) -> &'static str {
        "flip"
    }

    fn apply(&self, image: &mut Image<T, N>, _source: Rect) -> OpsResult<()> {
        trace!(mode = ?self.mode, frames = image.frame_count(), "flip");
        let width = image.width() as usize;
        for mut frame in image.frames_mut() {
            match self.mode {
                FlipMode::None => {}
                FlipMode::Horizontal => mirror_columns::<T, N>(frame.data_mut(), width),
                FlipMode::Vertical => mirror_rows(frame.data_mut(), width * N),
            }
        }
        Ok(())
    }
}

/// Rotates every frame clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotateProcessor {
    /// Rotation amount.
    pub rotation: Rotation,
}

impl RotateProcessor {
    /// Creates a rotate processor.
    pub fn new(rotation: Rotation) -> Self {
        Self { rotation }
    }
}

impl<T: PixelFormat, const N: usize> ImageProcessor<T, N> for RotateProcessor {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn apply(&self, image: &mut Image<T, N>, _source: Rect) -> OpsResult<()> {
        if self.rotation == Rotation::None {
            return Ok(());
        }
        trace!(rotation = ?self.rotation, frames = image.frame_count(), "rotate");
        let frames = image
            .frames()
            .iter()
            .map(|f| rotate(f, self.rotation))
            .collect();
        image.replace_frames(frames)?;
        Ok(())
    }
}

/// Cuts every frame down to a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropProcessor {
    /// Region to keep.
    pub rect: Rect,
}

impl CropProcessor {
    /// Creates a crop processor.
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

impl<T: PixelFormat, const N: usize> ImageProcessor<T, N> for CropProcessor {
    fn name(&self) -> &'static str {
        "crop"
    }

    fn apply(&self, image: &mut Image<T, N>, _source: Rect) -> OpsResult<()> {
        trace!(rect = %self.rect, frames = image.frame_count(), "crop");
        let frames = image
            .frames()
            .iter()
            .map(|f| crop(f, self.rect))
            .collect::<OpsResult<Vec<_>>>()?;
        image.replace_frames(frames)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixkit_core::FrameMetadata;

    /// 3x2 frame numbered 0..6 in row-major order.
    fn numbered() -> ImageFrame<u8, 1> {
        ImageFrame::from_data(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap()
    }

    #[test]
    fn test_crop() {
        let out = crop(&numbered(), Rect::new(1, 0, 2, 2)).unwrap();
        assert_eq!(out.data(), &[1, 2, 4, 5]);
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let err = crop(&numbered(), Rect::new(2, 0, 2, 2)).unwrap_err();
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_flip_horizontal() {
        let mut f = numbered();
        flip_horizontal(&mut f);
        assert_eq!(f.data(), &[2, 1, 0, 5, 4, 3]);
    }

    #[test]
    fn test_flip_vertical() {
        let mut f = numbered();
        flip_vertical(&mut f);
        assert_eq!(f.data(), &[3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn test_rotate_90() {
        // 0 1 2      3 0
        // 3 4 5  ->  4 1
        //            5 2
        let out = rotate(&numbered(), Rotation::Rotate90);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.data(), &[3, 0, 4, 1, 5, 2]);
    }

    #[test]
    fn test_rotate_180_and_270() {
        let half = rotate(&numbered(), Rotation::Rotate180);
        assert_eq!(half.data(), &[5, 4, 3, 2, 1, 0]);

        let three = rotate(&numbered(), Rotation::Rotate270);
        assert_eq!(three.dimensions(), (2, 3));
        assert_eq!(three.data(), &[2, 5, 1, 4, 0, 3]);
    }

    #[test]
    fn test_four_quarter_turns_round_trip() {
        let mut f = numbered();
        for _ in 0..4 {
            f = rotate(&f, Rotation::Rotate90);
        }
        assert_eq!(f.data(), numbered().data());
    }

    #[test]
    fn test_from_degrees() {
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::Rotate270));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::Rotate90));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_processors_touch_every_frame() {
        let meta = FrameMetadata {
            delay: 3,
            ..Default::default()
        };
        let mut img = Image::from_frames(vec![numbered(), numbered().with_metadata(meta)]).unwrap();
        let bounds = img.bounds();

        FlipProcessor::new(FlipMode::Horizontal).apply(&mut img, bounds).unwrap();
        RotateProcessor::new(Rotation::Rotate90).apply(&mut img, bounds).unwrap();
        assert_eq!(img.dimensions(), (2, 3));
        for frame in img.frames() {
            assert_eq!(frame.data(), &[5, 2, 4, 1, 3, 0]);
        }
        assert_eq!(img.frame(1).unwrap().metadata, meta);
    }

    #[test]
    fn test_flip_processor_vertical_and_none() {
        let mut img = Image::from_frames(vec![numbered(), numbered()]).unwrap();
        let bounds = img.bounds();

        FlipProcessor::new(FlipMode::None).apply(&mut img, bounds).unwrap();
        assert_eq!(img.root_frame().data(), numbered().data());

        FlipProcessor::new(FlipMode::Vertical).apply(&mut img, bounds).unwrap();
        for frame in img.frames() {
            assert_eq!(frame.data(), &[3, 4, 5, 0, 1, 2]);
        }
    }

    #[test]
    fn test_crop_processor_validates_first() {
        let mut img = Image::from_frame(numbered());
        let err = CropProcessor::new(Rect::new(0, 0, 4, 1))
            .apply(&mut img, Rect::from_size(3, 2))
            .unwrap_err();
        assert!(err.is_bounds_error());
        assert_eq!(img.dimensions(), (3, 2));

        CropProcessor::new(Rect::new(0, 1, 2, 1))
            .apply(&mut img, Rect::from_size(3, 2))
            .unwrap();
        assert_eq!(img.root_frame().data(), &[3, 4]);
    }
}
