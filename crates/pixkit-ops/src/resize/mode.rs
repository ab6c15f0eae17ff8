//! Target geometry for each [`ResizeMode`].
//!
//! Given the source size and a [`ResizeOptions`], [`resolve`] decides how
//! large the output canvas is and where the scaled source lands on it. The
//! placement rectangle may extend past the canvas (Crop) or leave part of
//! it uncovered (Pad, BoxPad).

use super::{AnchorPosition, ResizeMode, ResizeOptions};
use crate::{OpsError, OpsResult};
use pixkit_core::{Error, Rect, Size};

/// Resolved output of the mode resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeGeometry {
    /// Output image size.
    pub canvas: Size,
    /// Region of the source image to read.
    pub source: Rect,
    /// Placement of the scaled source in canvas coordinates.
    pub target: Rect,
}

impl ResizeGeometry {
    /// Horizontal and vertical scale factors, target over source.
    pub fn scale(&self) -> (f64, f64) {
        (
            self.target.width as f64 / self.source.width.max(1) as f64,
            self.target.height as f64 / self.source.height.max(1) as f64,
        )
    }

    /// Part of the target that lands on the canvas.
    pub fn visible(&self) -> Option<Rect> {
        self.target.clamp_to(self.canvas.width, self.canvas.height)
    }
}

/// Fills in a zero dimension from the source aspect ratio.
///
/// ```rust
/// use pixkit_core::Size;
/// use pixkit_ops::resize::mode::infer_size;
///
/// let size = infer_size(Size::new(200, 100), Size::new(0, 50)).unwrap();
/// assert_eq!(size, Size::new(100, 50));
/// ```
///
/// # Errors
///
/// Fails when both requested dimensions are zero or the source is empty.
pub fn infer_size(source: Size, requested: Size) -> OpsResult<Size> {
    if source.is_empty() {
        return Err(OpsError::InvalidDimensions(format!(
            "cannot resize an empty {source} source"
        )));
    }
    let (sw, sh) = (source.width as f64, source.height as f64);
    match (requested.width, requested.height) {
        (0, 0) => Err(OpsError::InvalidDimensions(
            "width and height cannot both be zero".into(),
        )),
        (0, h) => Ok(Size::new((h as f64 * sw / sh).round() as u32, h)),
        (w, 0) => Ok(Size::new(w, (w as f64 * sh / sw).round() as u32)),
        _ => Ok(requested),
    }
}

/// Computes canvas size and placement for resizing `source_rect` of an image.
///
/// `image_size` bounds the source rectangle; `source_rect` is the region
/// the processor was asked to read, overridden by
/// [`ResizeOptions::source_rectangle`] when set.
///
/// # Errors
///
/// - [`OpsError::InvalidDimensions`] for an unsatisfiable size request
/// - [`OpsError::Core`] with [`Error::InvalidRegion`] when an explicit
///   rectangle falls outside its buffer
pub fn resolve(
    image_size: Size,
    source_rect: Rect,
    options: &ResizeOptions,
) -> OpsResult<ResizeGeometry> {
    let source = options.source_rectangle.unwrap_or(source_rect);
    if !source.fits_within(image_size.width, image_size.height) {
        return Err(Error::invalid_region(source, image_size.width, image_size.height).into());
    }

    let requested = infer_size(source.size(), options.size)?;

    if let Some(target) = options.target_rectangle {
        if !target.fits_within(requested.width, requested.height) {
            return Err(Error::invalid_region(target, requested.width, requested.height).into());
        }
        return Ok(ResizeGeometry {
            canvas: requested,
            source,
            target,
        });
    }

    let (canvas, target) = match options.mode {
        ResizeMode::Stretch => (requested, Rect::from(requested)),
        ResizeMode::Crop => crop(source.size(), requested, options),
        ResizeMode::Pad => pad(source.size(), requested, options.position),
        ResizeMode::BoxPad => box_pad(source.size(), requested, options.position),
        ResizeMode::Max => {
            let size = max(source.size(), requested);
            (size, Rect::from(size))
        }
        ResizeMode::Min => {
            let size = min(source.size(), requested);
            (size, Rect::from(size))
        }
    };

    Ok(ResizeGeometry {
        canvas,
        source,
        target,
    })
}

#[inline]
fn ratios(source: Size, requested: Size) -> (f64, f64) {
    (
        requested.width as f64 / source.width as f64,
        requested.height as f64 / source.height as f64,
    )
}

#[inline]
fn round_len(v: f64) -> u32 {
    v.round().max(0.0) as u32
}

/// Offset of a `len`-long span inside `avail`, for the leading, centred or
/// trailing anchor. Negative when the span is longer.
fn place(avail: u32, len: u32, align: Align) -> i32 {
    let free = avail as f64 - len as f64;
    match align {
        Align::Start => 0,
        Align::Center => (free / 2.0).round() as i32,
        Align::End => free.round() as i32,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Start,
    Center,
    End,
}

impl AnchorPosition {
    fn horizontal(self) -> Align {
        match self {
            Self::Left | Self::TopLeft | Self::BottomLeft => Align::Start,
            Self::Right | Self::TopRight | Self::BottomRight => Align::End,
            Self::Center | Self::Top | Self::Bottom => Align::Center,
        }
    }

    fn vertical(self) -> Align {
        match self {
            Self::Top | Self::TopLeft | Self::TopRight => Align::Start,
            Self::Bottom | Self::BottomLeft | Self::BottomRight => Align::End,
            Self::Center | Self::Left | Self::Right => Align::Center,
        }
    }
}

fn crop(source: Size, requested: Size, options: &ResizeOptions) -> (Size, Rect) {
    let (rx, ry) = ratios(source, requested);
    let position = options.position;

    if ry < rx {
        // Width binds; height overflows and is cropped
        let height = round_len(source.height as f64 * rx);
        let y = match options.center_coordinates {
            Some([_, cy]) => focal(requested.height, height, cy),
            None => place(requested.height, height, position.vertical()),
        };
        (requested, Rect::new(0, y, requested.width, height))
    } else {
        let width = round_len(source.width as f64 * ry);
        let x = match options.center_coordinates {
            Some([cx, _]) => focal(requested.width, width, cx),
            None => place(requested.width, width, position.horizontal()),
        };
        (requested, Rect::new(x, 0, width, requested.height))
    }
}

/// Offset that centres the focal point `f` (0..1 of the scaled length)
/// in the canvas, clamped so the canvas stays covered.
fn focal(avail: u32, len: u32, f: f32) -> i32 {
    let f = if f.is_finite() { f.clamp(0.0, 1.0) as f64 } else { 0.5 };
    let offset = avail as f64 / 2.0 - len as f64 * f;
    let min = avail as f64 - len as f64;
    offset.clamp(min.min(0.0), 0.0).round() as i32
}

fn pad(source: Size, requested: Size, position: AnchorPosition) -> (Size, Rect) {
    let (rx, ry) = ratios(source, requested);

    let target = if ry < rx {
        let width = round_len(source.width as f64 * ry);
        let x = place(requested.width, width, position.horizontal());
        Rect::new(x, 0, width, requested.height)
    } else {
        let height = round_len(source.height as f64 * rx);
        let y = place(requested.height, height, position.vertical());
        Rect::new(0, y, requested.width, height)
    };
    (requested, target)
}

fn box_pad(source: Size, requested: Size, position: AnchorPosition) -> (Size, Rect) {
    if source.width > requested.width || source.height > requested.height {
        return pad(source, requested, position);
    }

    let free_w = requested.width - source.width;
    let free_h = requested.height - source.height;
    let x = match position.horizontal() {
        Align::Start => 0,
        Align::Center => free_w / 2,
        Align::End => free_w,
    };
    let y = match position.vertical() {
        Align::Start => 0,
        Align::Center => free_h / 2,
        Align::End => free_h,
    };
    (
        requested,
        Rect::new(x as i32, y as i32, source.width, source.height),
    )
}

fn max(source: Size, requested: Size) -> Size {
    if source.width <= requested.width && source.height <= requested.height {
        return source;
    }
    fit(source, requested)
}

fn min(source: Size, requested: Size) -> Size {
    fit(source, requested)
}

/// Aspect-preserving fit. The axis with the smaller ratio binds; the width
/// binds on a tie.
fn fit(source: Size, requested: Size) -> Size {
    let (rx, ry) = ratios(source, requested);
    if rx <= ry {
        Size::new(requested.width, round_len(source.height as f64 * rx))
    } else {
        Size::new(round_len(source.width as f64 * ry), requested.height)
    }
}
