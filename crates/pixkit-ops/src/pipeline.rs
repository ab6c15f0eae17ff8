//! Sequencing operations over an image.
//!
//! Two entry points, each in a list form and a closure form:
//!
//! - [`mutate`] / [`mutate_with`] - rewrite the image in place
//! - [`generate`] / [`generate_with`] - work on a copy and return it,
//!   leaving the input untouched
//!
//! Steps run in order. The first failing step aborts the rest; steps that
//! already ran stay applied. Use the `generate` forms when a failure must
//! leave the input as it was.
//!
//! # Example
//!
//! ```rust
//! use pixkit_core::Image;
//! use pixkit_ops::pipeline::{self, Step};
//! use pixkit_ops::resize::ResizeProcessor;
//! use pixkit_ops::transform::{FlipMode, FlipProcessor};
//!
//! let source: Image<u8, 4> = Image::filled(64, 48, [0, 0, 0, 255]);
//!
//! let thumb = pipeline::generate(&source, &[
//!     Step::processor(ResizeProcessor::new(32, 0, false)),
//!     Step::processor(FlipProcessor::new(FlipMode::Horizontal)),
//! ]).unwrap();
//! assert_eq!(thumb.dimensions(), (32, 24));
//! assert_eq!(source.dimensions(), (64, 48));
//!
//! let mut img = source.clone();
//! pipeline::mutate_with(&mut img, |ops| {
//!     ops.resize(16, 12, false)?.run(|image| {
//!         image.metadata.repeat_count = 1;
//!         Ok(())
//!     })?;
//!     Ok(())
//! }).unwrap();
//! assert_eq!(img.dimensions(), (16, 12));
//! ```

use crate::processor::ImageProcessor;
use crate::resampler::Resampler;
use crate::resize::{ResizeOptions, ResizeProcessor};
use crate::transform::{CropProcessor, FlipMode, FlipProcessor, RotateProcessor, Rotation};
use crate::{OpsError, OpsResult};
use pixkit_core::{Image, PixelFormat, Rect};
use tracing::debug;

/// Boxed in-place edit used by [`Step::Action`].
pub type Action<T, const N: usize> = Box<dyn Fn(&mut Image<T, N>) -> OpsResult<()> + Send + Sync>;

/// One pipeline step.
pub enum Step<T: PixelFormat, const N: usize> {
    /// A processor, applied over the image bounds.
    Processor(Box<dyn ImageProcessor<T, N>>),
    /// An arbitrary edit of the image.
    Action(Action<T, N>),
}

impl<T: PixelFormat, const N: usize> Step<T, N> {
    /// Wraps a processor.
    pub fn processor<P: ImageProcessor<T, N> + 'static>(processor: P) -> Self {
        Self::Processor(Box::new(processor))
    }

    /// Wraps a closure.
    pub fn action<F>(f: F) -> Self
    where
        F: Fn(&mut Image<T, N>) -> OpsResult<()> + Send + Sync + 'static,
    {
        Self::Action(Box::new(f))
    }

    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Processor(p) => p.name(),
            Self::Action(_) => "action",
        }
    }

    fn run(&self, image: &mut Image<T, N>) -> OpsResult<()> {
        match self {
            Self::Processor(p) => {
                let bounds = image.bounds();
                p.apply(image, bounds)
            }
            Self::Action(f) => f(image),
        }
    }
}

impl<T: PixelFormat, const N: usize> std::fmt::Debug for Step<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Step").field(&self.name()).finish()
    }
}

/// Applies `steps` to `image` in order.
///
/// # Errors
///
/// Fails with [`OpsError::InvalidParameter`] for an empty step list,
/// before touching the image, and otherwise with the first step error.
pub fn mutate<T: PixelFormat, const N: usize>(
    image: &mut Image<T, N>,
    steps: &[Step<T, N>],
) -> OpsResult<()> {
    if steps.is_empty() {
        return Err(OpsError::InvalidParameter("no operations given".into()));
    }
    for (index, step) in steps.iter().enumerate() {
        debug!(index, step = step.name(), size = %image.size(), "pipeline step");
        step.run(image)?;
    }
    Ok(())
}

/// Applies `steps` to a copy of `image` and returns the copy.
///
/// # Errors
///
/// Same as [`mutate`]; `image` is never modified.
pub fn generate<T: PixelFormat, const N: usize>(
    image: &Image<T, N>,
    steps: &[Step<T, N>],
) -> OpsResult<Image<T, N>> {
    let mut out = image.clone();
    mutate(&mut out, steps)?;
    Ok(out)
}

/// Applies each processor over the full image bounds, in order.
pub fn apply_processors<T: PixelFormat, const N: usize>(
    image: &mut Image<T, N>,
    processors: &[&dyn ImageProcessor<T, N>],
) -> OpsResult<()> {
    for (index, processor) in processors.iter().enumerate() {
        debug!(index, step = processor.name(), size = %image.size(), "apply processor");
        let bounds = image.bounds();
        processor.apply(image, bounds)?;
    }
    Ok(())
}

/// Hands `image` to `f` through an [`Operations`] runner.
pub fn mutate_with<T, const N: usize, F>(image: &mut Image<T, N>, f: F) -> OpsResult<()>
where
    T: PixelFormat,
    F: FnOnce(&mut Operations<'_, T, N>) -> OpsResult<()>,
{
    f(&mut Operations::new(image))
}

/// Runs `f` on a copy of `image` and returns the copy.
pub fn generate_with<T, const N: usize, F>(image: &Image<T, N>, f: F) -> OpsResult<Image<T, N>>
where
    T: PixelFormat,
    F: FnOnce(&mut Operations<'_, T, N>) -> OpsResult<()>,
{
    let mut out = image.clone();
    mutate_with(&mut out, f)?;
    Ok(out)
}

/// Applies operations to an image as they are called.
///
/// Every method returns `&mut Self` on success so calls chain with `?`.
pub struct Operations<'a, T: PixelFormat, const N: usize> {
    image: &'a mut Image<T, N>,
    applied: usize,
}

impl<'a, T: PixelFormat, const N: usize> Operations<'a, T, N> {
    /// Wraps an image.
    pub fn new(image: &'a mut Image<T, N>) -> Self {
        Self { image, applied: 0 }
    }

    /// The image in its current state.
    pub fn image(&self) -> &Image<T, N> {
        &*self.image
    }

    /// Number of operations applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Applies a processor over the whole image.
    pub fn apply_processor(&mut self, processor: &dyn ImageProcessor<T, N>) -> OpsResult<&mut Self> {
        let bounds = self.image.bounds();
        self.apply_processor_in(processor, bounds)
    }

    /// Applies a processor reading from `source`.
    pub fn apply_processor_in(
        &mut self,
        processor: &dyn ImageProcessor<T, N>,
        source: Rect,
    ) -> OpsResult<&mut Self> {
        debug!(
            index = self.applied,
            step = processor.name(),
            size = %self.image.size(),
            "pipeline step"
        );
        processor.apply(self.image, source)?;
        self.applied += 1;
        Ok(self)
    }

    /// Applies several processors in order.
    pub fn apply_processors(&mut self, processors: &[&dyn ImageProcessor<T, N>]) -> OpsResult<&mut Self> {
        for p in processors {
            self.apply_processor(*p)?;
        }
        Ok(self)
    }

    /// Crop-mode bicubic resize.
    pub fn resize(&mut self, width: u32, height: u32, compand: bool) -> OpsResult<&mut Self> {
        self.apply_processor(&ResizeProcessor::new(width, height, compand))
    }

    /// Resize with a specific kernel.
    pub fn resize_sampler<R: Resampler + 'static>(
        &mut self,
        sampler: R,
        width: u32,
        height: u32,
        compand: bool,
    ) -> OpsResult<&mut Self> {
        self.apply_processor(&ResizeProcessor::with_sampler(sampler, width, height, compand))
    }

    /// Resize with full options.
    pub fn resize_with(&mut self, options: ResizeOptions) -> OpsResult<&mut Self> {
        self.apply_processor(&ResizeProcessor::with_options(options))
    }

    /// Mirrors the image.
    pub fn flip(&mut self, mode: FlipMode) -> OpsResult<&mut Self> {
        self.apply_processor(&FlipProcessor::new(mode))
    }

    /// Rotates the image clockwise.
    pub fn rotate(&mut self, rotation: Rotation) -> OpsResult<&mut Self> {
        self.apply_processor(&RotateProcessor::new(rotation))
    }

    /// Cuts the image down to `rect`.
    pub fn crop(&mut self, rect: Rect) -> OpsResult<&mut Self> {
        self.apply_processor(&CropProcessor::new(rect))
    }

    /// Runs an arbitrary edit.
    pub fn run<F>(&mut self, f: F) -> OpsResult<&mut Self>
    where
        F: FnOnce(&mut Image<T, N>) -> OpsResult<()>,
    {
        debug!(index = self.applied, step = "action", "pipeline step");
        f(self.image)?;
        self.applied += 1;
        Ok(self)
    }
}
