//! The [`ImageProcessor`] trait implemented by every operation.

use crate::OpsResult;
use pixkit_core::{Image, PixelFormat, Rect};

/// An operation that rewrites an image in place.
///
/// Implementations apply the same configuration to every frame, in frame
/// order, and leave image and frame metadata untouched. Validation happens
/// before the first write: on error the image is unchanged.
///
/// ```rust
/// use pixkit_core::{Image, Rect};
/// use pixkit_ops::{ImageProcessor, OpsResult};
///
/// struct Invert;
///
/// impl ImageProcessor<u8, 1> for Invert {
///     fn name(&self) -> &'static str {
///         "invert"
///     }
///
///     fn apply(&self, image: &mut Image<u8, 1>, _source: Rect) -> OpsResult<()> {
///         for mut frame in image.frames_mut() {
///             frame.map_pixels(|[v]| [255 - v]);
///         }
///         Ok(())
///     }
/// }
///
/// let mut img: Image<u8, 1> = Image::filled(2, 2, [10]);
/// let bounds = img.bounds();
/// Invert.apply(&mut img, bounds).unwrap();
/// assert_eq!(img.root_frame().pixel(1, 1), [245]);
/// ```
pub trait ImageProcessor<T: PixelFormat, const N: usize>: Send + Sync {
    /// Short identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Applies the operation to `image`, reading from `source`.
    ///
    /// `source` is the image bounds when called from a pipeline.
    fn apply(&self, image: &mut Image<T, N>, source: Rect) -> OpsResult<()>;
}

impl<T: PixelFormat, const N: usize, P: ImageProcessor<T, N> + ?Sized> ImageProcessor<T, N> for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, image: &mut Image<T, N>, source: Rect) -> OpsResult<()> {
        (**self).apply(image, source)
    }
}
