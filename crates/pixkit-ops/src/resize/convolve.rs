//! Two-pass separable convolution.
//!
//! A [`ResamplePlan`] owns the horizontal and vertical weight tables for
//! one resize and runs them over any number of frames. Pixels are
//! widened to `f32` once, the first pass writes an `f32` intermediate and
//! the second pass writes straight into the destination canvas.
//!
//! Only the part of the target rectangle that lies on the canvas is
//! computed; a Crop placement that hangs over the edges costs nothing for
//! the pixels that are thrown away.

use super::weights::WeightsTable;
use crate::resampler::Resampler;
use crate::OpsResult;
use pixkit_core::{Error, ImageFrame, PixelFormat, Rect, pixel_from_f32, pixel_to_f32};
use pixkit_transfer::srgb;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Weight tables and rectangles for resampling one region onto another.
#[derive(Debug, Clone)]
pub struct ResamplePlan {
    horizontal: WeightsTable,
    vertical: WeightsTable,
    source: Rect,
    target: Rect,
    compand: bool,
}

/// Which axis the first pass resamples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOrder {
    /// Rows first, then columns.
    HorizontalFirst,
    /// Columns first, then rows.
    VerticalFirst,
}

impl ResamplePlan {
    /// Builds the weight tables mapping `source` onto `target`.
    ///
    /// # Errors
    ///
    /// Propagates kernel validation errors from [`WeightsTable::build`].
    pub fn new(sampler: &dyn Resampler, source: Rect, target: Rect, compand: bool) -> OpsResult<Self> {
        Ok(Self {
            horizontal: WeightsTable::build(sampler, source.width as usize, target.width as usize)?,
            vertical: WeightsTable::build(sampler, source.height as usize, target.height as usize)?,
            source,
            target,
            compand,
        })
    }

    /// Region read from the source frame.
    pub fn source(&self) -> Rect {
        self.source
    }

    /// Placement of the result in canvas coordinates.
    pub fn target(&self) -> Rect {
        self.target
    }

    /// Horizontal weights.
    pub fn horizontal(&self) -> &WeightsTable {
        &self.horizontal
    }

    /// Vertical weights.
    pub fn vertical(&self) -> &WeightsTable {
        &self.vertical
    }

    /// Pass order that keeps the intermediate buffer smallest for a
    /// `visible_w`x`visible_h` output.
    pub fn pass_order(&self, visible_w: u32, visible_h: u32) -> PassOrder {
        let h_first = visible_w as u64 * self.source.height as u64;
        let v_first = self.source.width as u64 * visible_h as u64;
        if h_first <= v_first {
            PassOrder::HorizontalFirst
        } else {
            PassOrder::VerticalFirst
        }
    }

    /// Resamples `src` into `canvas`.
    ///
    /// Canvas pixels outside the target rectangle are left as they are.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the source rectangle is not
    /// inside `src`.
    pub fn execute<T: PixelFormat, const N: usize>(
        &self,
        src: &ImageFrame<T, N>,
        canvas: &mut ImageFrame<T, N>,
    ) -> OpsResult<()> {
        if !self.source.fits_within(src.width(), src.height()) {
            return Err(Error::invalid_region(self.source, src.width(), src.height()).into());
        }
        let Some(visible) = self.target.clamp_to(canvas.width(), canvas.height()) else {
            return Ok(());
        };
        if self.source.is_empty() {
            return Ok(());
        }

        trace!(
            source = %self.source,
            target = %self.target,
            channels = N,
            compand = self.compand,
            "resample frame"
        );

        let pixels = self.expand(src);
        let sw = self.source.width as usize;
        let sh = self.source.height as usize;

        // Target-space offset of the first visible pixel
        let tx0 = (visible.x as i64 - self.target.x as i64) as usize;
        let ty0 = (visible.y as i64 - self.target.y as i64) as usize;
        let vw = visible.width as usize;
        let vh = visible.height as usize;

        let canvas_w = canvas.width() as usize;
        let row_start = visible.y as usize;
        let col_start = visible.x as usize;
        let compand = self.compand;

        let write = move |row: &mut [T], x: usize, mut px: [f32; N]| {
            if compand {
                srgb::compress(&mut px);
            }
            let o = (col_start + x) * N;
            row[o..o + N].copy_from_slice(&pixel_from_f32(px));
        };

        match self.pass_order(visible.width, visible.height) {
            PassOrder::HorizontalFirst => {
                // sh rows of vw resampled columns
                let mut inter = vec![[0.0f32; N]; vw * sh];
                for_each_row(&mut inter, vw, |y, out| {
                    let line = &pixels[y * sw..(y + 1) * sw];
                    for (x, o) in out.iter_mut().enumerate() {
                        *o = self.horizontal.window(tx0 + x).accumulate(|s| line[s]);
                    }
                });

                let rows = &mut canvas.data_mut()[row_start * canvas_w * N..];
                for_each_row(&mut rows[..vh * canvas_w * N], canvas_w * N, |y, row| {
                    let window = self.vertical.window(ty0 + y);
                    for x in 0..vw {
                        write(row, x, window.accumulate(|s| inter[s * vw + x]));
                    }
                });
            }
            PassOrder::VerticalFirst => {
                // vh resampled rows of sw columns
                let mut inter = vec![[0.0f32; N]; sw * vh];
                for_each_row(&mut inter, sw, |y, out| {
                    let window = self.vertical.window(ty0 + y);
                    for (x, o) in out.iter_mut().enumerate() {
                        *o = window.accumulate(|s| pixels[s * sw + x]);
                    }
                });

                let rows = &mut canvas.data_mut()[row_start * canvas_w * N..];
                for_each_row(&mut rows[..vh * canvas_w * N], canvas_w * N, |y, row| {
                    let line = &inter[y * sw..(y + 1) * sw];
                    for x in 0..vw {
                        write(row, x, self.horizontal.window(tx0 + x).accumulate(|s| line[s]));
                    }
                });
            }
        }

        Ok(())
    }

    /// Copies the source rectangle out as `f32` pixels, linearized if
    /// companding.
    fn expand<T: PixelFormat, const N: usize>(&self, src: &ImageFrame<T, N>) -> Vec<[f32; N]> {
        let x0 = self.source.x as usize;
        let x1 = x0 + self.source.width as usize;
        let mut out = Vec::with_capacity(self.source.area() as usize);
        for y in 0..self.source.height {
            let row = src.row(self.source.y as u32 + y);
            for chunk in row[x0 * N..x1 * N].chunks_exact(N) {
                let mut px = [T::zero(); N];
                px.copy_from_slice(chunk);
                let mut px = pixel_to_f32(px);
                if self.compand {
                    srgb::expand(&mut px);
                }
                out.push(px);
            }
        }
        out
    }
}

/// Runs `f(row_index, row)` over `buf` split into rows of `row_len`.
fn for_each_row<U, F>(buf: &mut [U], row_len: usize, f: F)
where
    U: Send,
    F: Fn(usize, &mut [U]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    buf.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
    #[cfg(not(feature = "parallel"))]
    buf.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| f(y, row));
}
