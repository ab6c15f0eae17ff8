//! Multi-frame image buffers.
//!
//! - [`ImageFrame`] - One row-major pixel buffer plus its timing metadata
//! - [`Image`] - An ordered, non-empty sequence of equally sized frames
//!   plus image-level metadata
//!
//! Still images have a single frame; animations have several. Processors
//! treat every frame alike.
//!
//! # Memory Layout
//!
//! Components are interleaved row-major, top-to-bottom:
//!
//! ```text
//! [R G B A R G B A ...]  <- row 0
//! [R G B A R G B A ...]  <- row 1
//! ```
//!
//! # Ownership
//!
//! Frame buffers live in an `Arc<Vec<T>>`. Cloning an [`Image`] is cheap and
//! the first write to a shared buffer copies it (`Arc::make_mut`), so a
//! clone behaves exactly like an independent deep copy.
//!
//! ```rust
//! use pixkit_core::Image;
//!
//! let original: Image<f32, 3> = Image::filled(4, 4, [1.0, 0.0, 0.0]);
//! let mut copy = original.clone();
//! copy.frame_mut(0).unwrap().set_pixel(0, 0, [0.0, 1.0, 0.0]);
//!
//! assert_eq!(original.frame(0).unwrap().pixel(0, 0), [1.0, 0.0, 0.0]);
//! assert_eq!(copy.frame(0).unwrap().pixel(0, 0), [0.0, 1.0, 0.0]);
//! ```

use crate::{Error, FrameMetadata, ImageMetadata, PixelFormat, Rect, Result, Size};
use std::ops::Deref;
use std::sync::Arc;

/// A single frame: `width * height` pixels of `N` components each.
#[derive(Clone)]
pub struct ImageFrame<T: PixelFormat, const N: usize> {
    data: Arc<Vec<T>>,
    width: u32,
    height: u32,
    /// Animation timing, passed through by every processor
    pub metadata: FrameMetadata,
}

impl<T: PixelFormat, const N: usize> ImageFrame<T, N> {
    /// Creates a frame filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [T::zero(); N])
    }

    /// Creates a frame filled with one pixel value.
    pub fn filled(width: u32, height: u32, pixel: [T; N]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * N);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
            metadata: FrameMetadata::default(),
        }
    }

    /// Creates a frame from existing component data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] unless `data.len() == width * height * N`.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(N))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
            metadata: FrameMetadata::default(),
        })
    }

    /// Returns this frame with the given metadata.
    pub fn with_metadata(mut self, metadata: FrameMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Frame width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frame dimensions as a [`Size`].
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Rectangle covering the whole frame.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Raw component data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Mutable component data; copies the buffer first if it is shared.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Consumes the frame and returns its component data.
    pub fn into_data(self) -> Vec<T> {
        Arc::unwrap_or_clone(self.data)
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * N
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [T; N] {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        let mut result = [T::zero(); N];
        result.copy_from_slice(&self.data[offset..offset + N]);
        result
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[T; N]> {
        (x < self.width && y < self.height).then(|| self.pixel(x, y))
    }

    /// Sets the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [T; N]) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = self.pixel_offset(x, y);
        self.data_mut()[offset..offset + N].copy_from_slice(&pixel);
    }

    /// Fills the frame with one pixel value.
    pub fn fill(&mut self, pixel: [T; N]) {
        for chunk in self.data_mut().chunks_exact_mut(N) {
            chunk.copy_from_slice(&pixel);
        }
    }

    /// Returns row `y` as a component slice.
    #[inline]
    pub fn row(&self, y: u32) -> &[T] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize * N;
        &self.data[start..start + self.width as usize * N]
    }

    /// Returns row `y` as a mutable component slice.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        debug_assert!(y < self.height, "row out of bounds");
        let start = y as usize * self.width as usize * N;
        let len = self.width as usize * N;
        &mut self.data_mut()[start..start + len]
    }

    /// Iterates over all pixels with their coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [T; N])> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }

    /// Applies a function to each pixel in place.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn([T; N]) -> [T; N],
    {
        for chunk in self.data_mut().chunks_exact_mut(N) {
            let mut pixel = [T::zero(); N];
            pixel.copy_from_slice(chunk);
            chunk.copy_from_slice(&f(pixel));
        }
    }
}

impl<T: PixelFormat, const N: usize> std::fmt::Debug for ImageFrame<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &N)
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// An image: one or more equally sized frames plus metadata.
///
/// The first frame is the root frame. Width and height are the frames'
/// common dimensions.
///
/// ```rust
/// use pixkit_core::{Image, ImageFrame};
///
/// let mut anim: Image<u8, 4> = Image::new(32, 16);
/// anim.push_frame(ImageFrame::new(32, 16)).unwrap();
/// assert_eq!(anim.frame_count(), 2);
///
/// // Frames must agree in size
/// assert!(anim.push_frame(ImageFrame::new(8, 8)).is_err());
/// ```
#[derive(Clone)]
pub struct Image<T: PixelFormat, const N: usize> {
    frames: Vec<ImageFrame<T, N>>,
    /// Image-level properties, passed through by every processor
    pub metadata: ImageMetadata,
}

impl<T: PixelFormat, const N: usize> Image<T, N> {
    /// Creates a single-frame image filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_frame(ImageFrame::new(width, height))
    }

    /// Creates a single-frame image filled with one pixel value.
    pub fn filled(width: u32, height: u32, pixel: [T; N]) -> Self {
        Self::from_frame(ImageFrame::filled(width, height, pixel))
    }

    /// Creates a single-frame image from component data.
    pub fn from_data(width: u32, height: u32, data: Vec<T>) -> Result<Self> {
        Ok(Self::from_frame(ImageFrame::from_data(width, height, data)?))
    }

    /// Wraps one frame.
    pub fn from_frame(frame: ImageFrame<T, N>) -> Self {
        Self {
            frames: vec![frame],
            metadata: ImageMetadata::default(),
        }
    }

    /// Builds an image from several frames.
    ///
    /// # Errors
    ///
    /// Fails if `frames` is empty or the frames differ in size.
    pub fn from_frames(frames: Vec<ImageFrame<T, N>>) -> Result<Self> {
        check_frames(&frames)?;
        Ok(Self {
            frames,
            metadata: ImageMetadata::default(),
        })
    }

    /// Returns this image with the given metadata.
    pub fn with_metadata(mut self, metadata: ImageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.frames[0].width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.frames[0].height
    }

    /// Image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.frames[0].dimensions()
    }

    /// Image dimensions as a [`Size`].
    #[inline]
    pub fn size(&self) -> Size {
        self.frames[0].size()
    }

    /// Rectangle covering the whole image.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.frames[0].bounds()
    }

    /// Number of channels per pixel.
    #[inline]
    pub const fn channels(&self) -> usize {
        N
    }

    /// Number of frames (always at least one).
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// All frames in order.
    #[inline]
    pub fn frames(&self) -> &[ImageFrame<T, N>] {
        &self.frames
    }

    /// The first frame.
    #[inline]
    pub fn root_frame(&self) -> &ImageFrame<T, N> {
        &self.frames[0]
    }

    /// Frame `index`, if present.
    #[inline]
    pub fn frame(&self, index: usize) -> Option<&ImageFrame<T, N>> {
        self.frames.get(index)
    }

    /// Pixel-level access to frame `index`, if present.
    #[inline]
    pub fn frame_mut(&mut self, index: usize) -> Option<FrameMut<'_, T, N>> {
        self.frames.get_mut(index).map(|frame| FrameMut { frame })
    }

    /// Pixel-level access to every frame for in-place edits.
    ///
    /// Use [`replace_frames`](Self::replace_frames) to change dimensions.
    #[inline]
    pub fn frames_mut(&mut self) -> impl Iterator<Item = FrameMut<'_, T, N>> {
        self.frames.iter_mut().map(|frame| FrameMut { frame })
    }

    /// Appends a frame with the image's dimensions.
    pub fn push_frame(&mut self, frame: ImageFrame<T, N>) -> Result<()> {
        if frame.dimensions() != self.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), frame.dimensions()));
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Swaps in a new frame set, e.g. after a processor changed the size.
    ///
    /// Image metadata is untouched.
    ///
    /// # Errors
    ///
    /// Fails if `frames` is empty or the frames differ in size; the image
    /// is left unchanged in that case.
    pub fn replace_frames(&mut self, frames: Vec<ImageFrame<T, N>>) -> Result<()> {
        check_frames(&frames)?;
        self.frames = frames;
        Ok(())
    }

    /// Consumes the image and returns its frames.
    pub fn into_frames(self) -> Vec<ImageFrame<T, N>> {
        self.frames
    }
}

/// Mutable view of one frame inside an [`Image`].
///
/// Pixels and timing metadata can be edited, the frame's size cannot, so
/// the frames of an image always agree in dimensions. Reads go through
/// `Deref` to [`ImageFrame`].
///
/// ```compile_fail
/// use pixkit_core::{Image, ImageFrame};
///
/// let mut img: Image<u8, 1> = Image::new(4, 4);
/// *img.frame_mut(0).unwrap() = ImageFrame::new(1, 1);
/// ```
pub struct FrameMut<'a, T: PixelFormat, const N: usize> {
    frame: &'a mut ImageFrame<T, N>,
}

impl<T: PixelFormat, const N: usize> FrameMut<'_, T, N> {
    /// Mutable component data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        self.frame.data_mut()
    }

    /// Sets the pixel at (x, y).
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: [T; N]) {
        self.frame.set_pixel(x, y, pixel);
    }

    /// Fills the frame with one pixel value.
    pub fn fill(&mut self, pixel: [T; N]) {
        self.frame.fill(pixel);
    }

    /// Returns row `y` as a mutable component slice.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [T] {
        self.frame.row_mut(y)
    }

    /// Applies a function to each pixel in place.
    pub fn map_pixels<F>(&mut self, f: F)
    where
        F: Fn([T; N]) -> [T; N],
    {
        self.frame.map_pixels(f);
    }

    /// Animation timing of this frame.
    #[inline]
    pub fn metadata_mut(&mut self) -> &mut FrameMetadata {
        &mut self.frame.metadata
    }
}

impl<T: PixelFormat, const N: usize> Deref for FrameMut<'_, T, N> {
    type Target = ImageFrame<T, N>;

    #[inline]
    fn deref(&self) -> &ImageFrame<T, N> {
        self.frame
    }
}

fn check_frames<T: PixelFormat, const N: usize>(frames: &[ImageFrame<T, N>]) -> Result<()> {
    let first = frames
        .first()
        .ok_or_else(|| Error::other("an image needs at least one frame"))?;
    if let Some(odd) = frames.iter().find(|f| f.dimensions() != first.dimensions()) {
        return Err(Error::dimension_mismatch(first.dimensions(), odd.dimensions()));
    }
    Ok(())
}

impl<T: PixelFormat, const N: usize> std::fmt::Debug for Image<T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("channels", &N)
            .field("frames", &self.frames.len())
            .field("format", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisposalMethod, PropertyTag};

    #[test]
    fn test_frame_from_data_wrong_size() {
        let result: Result<ImageFrame<f32, 4>> = ImageFrame::from_data(10, 10, vec![0.0; 10]);
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_row_and_pixels() {
        let mut frame: ImageFrame<u8, 2> = ImageFrame::new(3, 2);
        frame.set_pixel(2, 1, [7, 9]);
        assert_eq!(frame.row(1), &[0, 0, 0, 0, 7, 9]);
        assert_eq!(frame.pixels().filter(|(_, _, p)| p[0] == 7).count(), 1);
        assert_eq!(frame.get_pixel(3, 0), None);
    }

    #[test]
    fn test_frame_map_pixels() {
        let mut frame: ImageFrame<f32, 3> = ImageFrame::filled(4, 4, [0.5, 0.5, 0.5]);
        frame.map_pixels(|px| px.map(|c| c * 2.0));
        assert_eq!(frame.pixel(3, 3), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_from_frames_rejects_mixed_sizes() {
        let frames = vec![ImageFrame::<u8, 1>::new(4, 4), ImageFrame::new(4, 5)];
        assert!(Image::from_frames(frames).is_err());
        assert!(Image::<u8, 1>::from_frames(Vec::new()).is_err());
    }

    #[test]
    fn test_replace_frames_keeps_metadata() {
        let mut img: Image<u8, 4> = Image::new(8, 8);
        img.metadata.add(PropertyTag::ARTIST, "me");
        let frame = ImageFrame::new(2, 3).with_metadata(FrameMetadata {
            delay: 10,
            disposal: DisposalMethod::RestoreToBackground,
        });
        img.replace_frames(vec![frame]).unwrap();
        assert_eq!(img.dimensions(), (2, 3));
        assert_eq!(img.root_frame().metadata.delay, 10);
        assert!(img.metadata.get("Artist").is_some());
    }

    #[test]
    fn test_replace_frames_failure_leaves_image() {
        let mut img: Image<u8, 4> = Image::new(8, 8);
        assert!(img.replace_frames(Vec::new()).is_err());
        assert_eq!(img.dimensions(), (8, 8));
    }

    #[test]
    fn test_clone_is_copy_on_write() {
        let img1: Image<f32, 3> = Image::filled(10, 10, [1.0, 0.0, 0.0]);
        let mut img2 = img1.clone();
        for mut frame in img2.frames_mut() {
            frame.fill([0.0, 0.0, 1.0]);
        }
        assert_eq!(img1.root_frame().pixel(5, 5), [1.0, 0.0, 0.0]);
        assert_eq!(img2.root_frame().pixel(5, 5), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_frame_mut_edits_keep_size() {
        let mut img: Image<u8, 3> = Image::new(4, 3);
        img.push_frame(ImageFrame::new(4, 3)).unwrap();

        for (i, mut frame) in img.frames_mut().enumerate() {
            frame.fill([i as u8; 3]);
            frame.row_mut(2)[..3].copy_from_slice(&[7, 8, 9]);
            frame.metadata_mut().delay = 5 + i as u32;
        }
        if let Some(mut frame) = img.frame_mut(1) {
            frame.set_pixel(3, 0, [1, 2, 3]);
            assert_eq!(frame.dimensions(), (4, 3));
        }

        assert_eq!(img.frame(0).unwrap().pixel(0, 2), [7, 8, 9]);
        assert_eq!(img.frame(1).unwrap().pixel(3, 0), [1, 2, 3]);
        assert_eq!(img.frame(1).unwrap().metadata.delay, 6);
        assert!(img.frames().iter().all(|f| f.dimensions() == (4, 3)));
        assert!(img.frame_mut(2).is_none());
    }

    #[test]
    fn test_into_frames_in_order() {
        let mut img: Image<u16, 1> = Image::filled(2, 2, [1]);
        img.push_frame(ImageFrame::filled(2, 2, [2])).unwrap();
        img.push_frame(ImageFrame::filled(2, 2, [3])).unwrap();

        let frames = img.into_frames();
        let firsts: Vec<u16> = frames.iter().map(|f| f.pixel(0, 0)[0]).collect();
        assert_eq!(firsts, vec![1, 2, 3]);
        assert!(frames.iter().all(|f| f.dimensions() == (2, 2)));
    }
}
