//! Per-axis convolution weights.
//!
//! For every destination coordinate a [`WeightsWindow`] lists the
//! contiguous run of source indices that contribute to it and their
//! normalized weights. Windows are computed once per axis and reused for
//! every row, column and frame of a resize.
//!
//! The kernel is evaluated around the mapped source centre
//! `c = (d + 0.5) * src / dst - 0.5`. When downsampling, the kernel is
//! stretched by `src / dst` so that every source pixel is covered:
//!
//! ```rust
//! use pixkit_ops::resampler::TriangleResampler;
//! use pixkit_ops::resize::WeightsTable;
//!
//! let table = WeightsTable::build(&TriangleResampler, 8, 2).unwrap();
//! assert_eq!(table.len(), 2);
//! let w = table.window(0);
//! assert!(w.len() > 2); // wider than the unscaled triangle
//! let sum: f32 = w.weights().iter().sum();
//! assert!((sum - 1.0).abs() < 1e-5);
//! ```

use crate::resampler::Resampler;
use crate::{OpsError, OpsResult};
use tracing::trace;

/// Weights below this magnitude are trimmed from the ends of a window.
const PRUNE_EPSILON: f32 = 1e-6;

/// Contributions of a run of source pixels to one destination pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightsWindow {
    left: usize,
    weights: Vec<f32>,
}

impl WeightsWindow {
    fn single(index: usize) -> Self {
        Self {
            left: index,
            weights: vec![1.0],
        }
    }

    /// First contributing source index.
    #[inline]
    pub fn left(&self) -> usize {
        self.left
    }

    /// One past the last contributing source index.
    #[inline]
    pub fn right(&self) -> usize {
        self.left + self.weights.len()
    }

    /// Number of taps.
    #[inline]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false` for windows produced by [`WeightsTable::build`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weights for source indices `left..right`.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weighted sum of `fetch(i)` over the window's source indices.
    #[inline]
    pub fn accumulate<const N: usize, F>(&self, fetch: F) -> [f32; N]
    where
        F: Fn(usize) -> [f32; N],
    {
        let mut acc = [0.0f32; N];
        for (i, &w) in self.weights.iter().enumerate() {
            let px = fetch(self.left + i);
            for c in 0..N {
                acc[c] += px[c] * w;
            }
        }
        acc
    }
}

/// One [`WeightsWindow`] per destination coordinate of an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightsTable {
    windows: Vec<WeightsWindow>,
    source_len: usize,
}

impl WeightsTable {
    /// Builds the table mapping `source_len` pixels onto `target_len`.
    ///
    /// # Errors
    ///
    /// - [`OpsError::InvalidParameter`] if the kernel radius is not a
    ///   positive finite number
    /// - [`OpsError::InvalidDimensions`] if `source_len` is zero while
    ///   `target_len` is not
    pub fn build(sampler: &dyn Resampler, source_len: usize, target_len: usize) -> OpsResult<Self> {
        let radius = sampler.radius();
        if !radius.is_finite() || radius <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "kernel '{}' has invalid radius {}",
                sampler.name(),
                radius
            )));
        }
        if target_len == 0 {
            return Ok(Self {
                windows: Vec::new(),
                source_len,
            });
        }
        if source_len == 0 {
            return Err(OpsError::InvalidDimensions(format!(
                "cannot resample an empty axis to {target_len} pixels"
            )));
        }

        trace!(
            kernel = sampler.name(),
            source_len, target_len, "building weights table"
        );

        let ratio = source_len as f64 / target_len as f64;
        let last = source_len - 1;

        let windows = if sampler.is_point_sampler() {
            (0..target_len)
                .map(|d| {
                    let s = ((d as f64 + 0.5) * ratio).floor() as usize;
                    WeightsWindow::single(s.min(last))
                })
                .collect()
        } else {
            let inv_scale = ratio.max(1.0);
            let support = radius as f64 * inv_scale;
            (0..target_len)
                .map(|d| {
                    let center = (d as f64 + 0.5) * ratio - 0.5;
                    build_window(sampler, center, support, inv_scale, last)
                })
                .collect()
        };

        Ok(Self {
            windows,
            source_len,
        })
    }

    /// Number of destination coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns `true` for a table that maps onto zero pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Length of the source axis.
    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Window of destination coordinate `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn window(&self, index: usize) -> &WeightsWindow {
        &self.windows[index]
    }

    /// All windows in destination order.
    #[inline]
    pub fn windows(&self) -> &[WeightsWindow] {
        &self.windows
    }
}

fn build_window(
    sampler: &dyn Resampler,
    center: f64,
    support: f64,
    inv_scale: f64,
    last: usize,
) -> WeightsWindow {
    let left = (center - support).floor().max(0.0) as usize;
    let right = ((center + support).ceil().max(0.0) as usize).min(last);
    let left = left.min(right);

    let mut weights: Vec<f32> = (left..=right)
        .map(|s| sampler.weight(((s as f64 - center) / inv_scale) as f32))
        .collect();

    // Trim negligible taps from both ends
    let Some(first) = weights.iter().position(|w| w.abs() >= PRUNE_EPSILON) else {
        return WeightsWindow::single(nearest(center, last));
    };
    let end = weights
        .iter()
        .rposition(|w| w.abs() >= PRUNE_EPSILON)
        .map_or(weights.len(), |i| i + 1);
    weights.truncate(end);
    weights.drain(..first);

    let sum: f32 = weights.iter().sum();
    if sum.abs() < PRUNE_EPSILON {
        return WeightsWindow::single(nearest(center, last));
    }
    for w in &mut weights {
        *w /= sum;
    }

    WeightsWindow {
        left: left + first,
        weights,
    }
}

#[inline]
fn nearest(center: f64, last: usize) -> usize {
    (center.round().max(0.0) as usize).min(last)
}
