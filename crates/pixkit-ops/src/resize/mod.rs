//! Image resizing.
//!
//! Resizing runs in three stages:
//!
//! 1. [`mode::resolve`] turns the requested size and [`ResizeMode`] into an
//!    output canvas and a placement rectangle
//! 2. [`WeightsTable::build`] computes per-axis weights from the chosen
//!    [`Resampler`]
//! 3. [`ResamplePlan::execute`] convolves each frame onto its new canvas
//!
//! [`ResizeProcessor`] wires the three together for whole images.
//!
//! # Modes
//!
//! | Mode | Canvas | Placement |
//! |------|--------|-----------|
//! | [`ResizeMode::Crop`] | requested | covers canvas, overflow cropped |
//! | [`ResizeMode::Pad`] | requested | fits inside canvas, anchored |
//! | [`ResizeMode::BoxPad`] | requested | unscaled if smaller, else Pad |
//! | [`ResizeMode::Max`] | fitted size | never upscaled |
//! | [`ResizeMode::Min`] | fitted size | may upscale |
//! | [`ResizeMode::Stretch`] | requested | fills canvas, aspect ignored |
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::resize::{ResizeMode, ResizeOptions, ResizeProcessor};
//! use pixkit_ops::resampler::Lanczos3Resampler;
//! use pixkit_ops::ImageProcessor;
//!
//! let mut img: Image<u8, 4> = Image::filled(400, 200, [10, 20, 30, 255]);
//! let resize = ResizeProcessor::with_options(
//!     ResizeOptions::new((300, 300).into())
//!         .with_mode(ResizeMode::Min)
//!         .with_sampler(Lanczos3Resampler),
//! );
//! let bounds = img.bounds();
//! resize.apply(&mut img, bounds).unwrap();
//! assert_eq!(img.dimensions(), (300, 150));
//! ```

pub mod convolve;
pub mod mode;
pub mod weights;

pub use convolve::{PassOrder, ResamplePlan};
pub use mode::ResizeGeometry;
pub use weights::{WeightsTable, WeightsWindow};

use crate::processor::ImageProcessor;
use crate::resampler::{BicubicResampler, Resampler};
use crate::OpsResult;
use pixkit_core::{Image, ImageFrame, PixelFormat, Rect, Size};
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the source is fitted to the requested size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResizeMode {
    /// Cover the requested size and crop the overflow.
    #[default]
    Crop,
    /// Fit inside the requested size and leave the rest as background.
    Pad,
    /// Like [`Pad`](Self::Pad), but a source smaller than the request is
    /// placed without scaling.
    BoxPad,
    /// Fit inside the requested size, never upscaling.
    Max,
    /// Fit inside the requested size; the most constrained axis binds.
    Min,
    /// Scale each axis independently to the requested size.
    Stretch,
}

/// Anchor used to place the scaled image on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnchorPosition {
    /// Centre.
    #[default]
    Center,
    /// Top edge, horizontally centred.
    Top,
    /// Bottom edge, horizontally centred.
    Bottom,
    /// Left edge, vertically centred.
    Left,
    /// Right edge, vertically centred.
    Right,
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

/// Full resize configuration.
#[derive(Debug, Clone)]
pub struct ResizeOptions {
    /// Requested size; one dimension may be 0 to keep the aspect ratio.
    pub size: Size,
    /// Fitting mode.
    pub mode: ResizeMode,
    /// Resampling kernel.
    pub sampler: Arc<dyn Resampler>,
    /// Resample in linear light.
    pub compand: bool,
    /// Anchor for Crop, Pad and BoxPad.
    pub position: AnchorPosition,
    /// Focal point for Crop as fractions of the source size.
    pub center_coordinates: Option<[f32; 2]>,
    /// Region of the source to read.
    pub source_rectangle: Option<Rect>,
    /// Region of the canvas to write; overrides the mode.
    pub target_rectangle: Option<Rect>,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            size: Size::default(),
            mode: ResizeMode::default(),
            sampler: Arc::new(BicubicResampler),
            compand: false,
            position: AnchorPosition::default(),
            center_coordinates: None,
            source_rectangle: None,
            target_rectangle: None,
        }
    }
}

impl ResizeOptions {
    /// Options for `size` with every other field at its default.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Sets the fitting mode.
    pub fn with_mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the resampling kernel.
    pub fn with_sampler<R: Resampler + 'static>(mut self, sampler: R) -> Self {
        self.sampler = Arc::new(sampler);
        self
    }

    /// Sets a shared resampling kernel.
    pub fn with_shared_sampler(mut self, sampler: Arc<dyn Resampler>) -> Self {
        self.sampler = sampler;
        self
    }

    /// Enables or disables linear-light resampling.
    pub fn with_compand(mut self, compand: bool) -> Self {
        self.compand = compand;
        self
    }

    /// Sets the anchor position.
    pub fn with_position(mut self, position: AnchorPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the Crop focal point, `[x, y]` in `0..=1`.
    pub fn with_center_coordinates(mut self, center: [f32; 2]) -> Self {
        self.center_coordinates = Some(center);
        self
    }

    /// Restricts reads to `source` and writes to `target`.
    pub fn with_rectangles(mut self, source: Rect, target: Rect) -> Self {
        self.source_rectangle = Some(source);
        self.target_rectangle = Some(target);
        self
    }
}

/// Resizes every frame of an image.
#[derive(Debug, Clone)]
pub struct ResizeProcessor {
    options: ResizeOptions,
}

impl ResizeProcessor {
    /// Crop-mode bicubic resize to `width`x`height`.
    pub fn new(width: u32, height: u32, compand: bool) -> Self {
        Self::from_size(Size::new(width, height), compand)
    }

    /// Crop-mode bicubic resize to `size`.
    pub fn from_size(size: Size, compand: bool) -> Self {
        Self::with_options(ResizeOptions::new(size).with_compand(compand))
    }

    /// Crop-mode resize with a specific kernel.
    pub fn with_sampler<R: Resampler + 'static>(sampler: R, width: u32, height: u32, compand: bool) -> Self {
        Self::with_options(
            ResizeOptions::new(Size::new(width, height))
                .with_sampler(sampler)
                .with_compand(compand),
        )
    }

    /// Resamples `source` of the input onto `target` of a `width`x`height` canvas.
    pub fn with_rectangles<R: Resampler + 'static>(
        sampler: R,
        width: u32,
        height: u32,
        source: Rect,
        target: Rect,
        compand: bool,
    ) -> Self {
        Self::with_options(
            ResizeOptions::new(Size::new(width, height))
                .with_sampler(sampler)
                .with_rectangles(source, target)
                .with_compand(compand),
        )
    }

    /// Resize with full options.
    pub fn with_options(options: ResizeOptions) -> Self {
        Self { options }
    }

    /// The configured options.
    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    /// Resolves the output geometry for an image of `image_size`.
    pub fn geometry(&self, image_size: Size, source: Rect) -> OpsResult<ResizeGeometry> {
        mode::resolve(image_size, source, &self.options)
    }
}

impl<T: PixelFormat, const N: usize> ImageProcessor<T, N> for ResizeProcessor {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&self, image: &mut Image<T, N>, source: Rect) -> OpsResult<()> {
        let geometry = self.geometry(image.size(), source)?;
        debug!(
            from = %image.size(),
            canvas = %geometry.canvas,
            source = %geometry.source,
            target = %geometry.target,
            mode = ?self.options.mode,
            kernel = self.options.sampler.name(),
            frames = image.frame_count(),
            "resize"
        );

        let explicit = self.options.target_rectangle.is_some();
        if !explicit
            && geometry.canvas == image.size()
            && geometry.source == image.bounds()
            && geometry.target == image.bounds()
        {
            return Ok(());
        }

        let plan = ResamplePlan::new(
            self.options.sampler.as_ref(),
            geometry.source,
            geometry.target,
            self.options.compand,
        )?;

        let canvas = geometry.canvas;
        let mut frames = Vec::with_capacity(image.frame_count());
        for frame in image.frames() {
            let mut out = if explicit {
                carry_over(frame, canvas)
            } else {
                ImageFrame::new(canvas.width, canvas.height)
            };
            out.metadata = frame.metadata;
            plan.execute(frame, &mut out)?;
            frames.push(out);
        }

        image.replace_frames(frames)?;
        Ok(())
    }
}

/// A `canvas`-sized frame holding the overlapping pixels of `frame`.
fn carry_over<T: PixelFormat, const N: usize>(frame: &ImageFrame<T, N>, canvas: Size) -> ImageFrame<T, N> {
    let mut out = ImageFrame::new(canvas.width, canvas.height);
    let w = frame.width().min(canvas.width) as usize;
    for y in 0..frame.height().min(canvas.height) {
        out.row_mut(y)[..w * N].copy_from_slice(&frame.row(y)[..w * N]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resampler::{NearestNeighborResampler, TriangleResampler};
    use pixkit_core::{DisposalMethod, FrameMetadata, PropertyTag};

    fn apply<P: ImageProcessor<u8, 3>>(p: &P, image: &mut Image<u8, 3>) -> OpsResult<()> {
        let bounds = image.bounds();
        p.apply(image, bounds)
    }

    #[test]
    fn test_defaults() {
        let opts = ResizeOptions::default();
        assert_eq!(opts.mode, ResizeMode::Crop);
        assert_eq!(opts.position, AnchorPosition::Center);
        assert_eq!(opts.sampler.name(), "bicubic");
        assert!(!opts.compand);
    }

    #[test]
    fn test_resize_changes_size() {
        let mut img: Image<u8, 3> = Image::filled(40, 20, [10, 20, 30]);
        apply(&ResizeProcessor::new(10, 10, false), &mut img).unwrap();
        assert_eq!(img.dimensions(), (10, 10));
        assert_eq!(img.root_frame().pixel(5, 5), [10, 20, 30]);
    }

    #[test]
    fn test_zero_dimension_inferred() {
        let mut img: Image<u8, 3> = Image::new(200, 100);
        apply(&ResizeProcessor::new(0, 50, false), &mut img).unwrap();
        assert_eq!(img.dimensions(), (100, 50));
    }

    #[test]
    fn test_both_zero_rejected() {
        let mut img: Image<u8, 3> = Image::new(20, 10);
        let err = apply(&ResizeProcessor::new(0, 0, false), &mut img).unwrap_err();
        assert!(matches!(err, crate::OpsError::InvalidDimensions(_)));
        assert_eq!(img.dimensions(), (20, 10));
    }

    #[test]
    fn test_pad_leaves_background() {
        let mut img: Image<u8, 3> = Image::filled(20, 10, [255, 255, 255]);
        let p = ResizeProcessor::with_options(
            ResizeOptions::new(Size::new(10, 10))
                .with_mode(ResizeMode::Pad)
                .with_sampler(TriangleResampler),
        );
        apply(&p, &mut img).unwrap();
        let frame = img.root_frame();
        assert_eq!(frame.pixel(5, 0), [0, 0, 0]);
        assert_eq!(frame.pixel(5, 5), [255, 255, 255]);
        assert_eq!(frame.pixel(5, 9), [0, 0, 0]);
    }

    #[test]
    fn test_frames_and_metadata_preserved() {
        let mut img: Image<u8, 3> = Image::filled(8, 8, [1, 2, 3]);
        let meta = FrameMetadata {
            delay: 7,
            disposal: DisposalMethod::RestoreToPrevious,
        };
        img.push_frame(ImageFrame::filled(8, 8, [4, 5, 6]).with_metadata(meta))
            .unwrap();
        img.metadata.add(PropertyTag::COPYRIGHT, "c");

        let p = ResizeProcessor::with_sampler(NearestNeighborResampler, 4, 2, false);
        p.apply(&mut img, Rect::from_size(8, 8)).unwrap();

        assert_eq!(img.frame_count(), 2);
        for frame in img.frames() {
            assert_eq!(frame.dimensions(), (4, 2));
        }
        assert_eq!(img.frame(1).unwrap().metadata, meta);
        assert_eq!(img.frame(1).unwrap().pixel(0, 0), [4, 5, 6]);
        assert!(img.metadata.get("Copyright").is_some());
    }

    #[test]
    fn test_rectangles_keep_outside_pixels() {
        let mut img: Image<u8, 3> = Image::filled(10, 10, [9, 9, 9]);
        img.frame_mut(0).unwrap().set_pixel(0, 0, [100, 100, 100]);
        let p = ResizeProcessor::with_rectangles(
            NearestNeighborResampler,
            10,
            10,
            Rect::new(0, 0, 2, 2),
            Rect::new(4, 4, 4, 4),
            false,
        );
        apply(&p, &mut img).unwrap();
        let frame = img.root_frame();
        assert_eq!(frame.pixel(4, 4), [100, 100, 100]);
        assert_eq!(frame.pixel(5, 5), [100, 100, 100]);
        assert_eq!(frame.pixel(6, 6), [9, 9, 9]);
        assert_eq!(frame.pixel(0, 0), [100, 100, 100]);
        assert_eq!(frame.pixel(9, 9), [9, 9, 9]);
    }

    #[test]
    fn test_same_size_is_noop() {
        let mut img: Image<u8, 3> = Image::filled(6, 6, [1, 2, 3]);
        img.frame_mut(0).unwrap().set_pixel(2, 2, [200, 0, 0]);
        let before = img.root_frame().data().to_vec();
        apply(&ResizeProcessor::new(6, 6, true), &mut img).unwrap();
        assert_eq!(img.root_frame().data(), &before[..]);
    }
}
