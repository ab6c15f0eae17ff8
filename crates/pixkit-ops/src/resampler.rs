//! Resampling kernels.
//!
//! A [`Resampler`] is a pure weight function with finite support. The
//! resize engine only ever asks for [`Resampler::radius`] and
//! [`Resampler::weight`], so kernels are interchangeable configuration.
//!
//! | Kernel | Radius | Character |
//! |--------|--------|-----------|
//! | [`NearestNeighborResampler`] | 1 | Point sampling, blocky |
//! | [`BoxResampler`] | 0.5 | Area average |
//! | [`TriangleResampler`] | 1 | Bilinear |
//! | [`HermiteResampler`] | 1 | Smooth cubic, no overshoot |
//! | [`BicubicResampler`] | 2 | Catmull-Rom, the default |
//! | [`SplineResampler`] | 2 | Cubic B-spline, soft |
//! | [`MitchellNetravaliResampler`] | 2 | Balanced blur/ringing |
//! | [`RobidouxResampler`] | 2 | Cylindrical-tuned cubic |
//! | [`RobidouxSharpResampler`] | 2 | Sharper Robidoux |
//! | [`Lanczos3Resampler`] | 3 | Windowed sinc |
//! | [`Lanczos5Resampler`] | 5 | Windowed sinc |
//! | [`Lanczos8Resampler`] | 8 | Windowed sinc |
//! | [`WelchResampler`] | 3 | Sinc with parabolic window |
//!
//! Every kernel is symmetric, peaks at `weight(0) == 1` and vanishes for
//! `|x| >= radius`:
//!
//! ```rust
//! use pixkit_ops::resampler::{Lanczos3Resampler, Resampler};
//!
//! let k = Lanczos3Resampler;
//! assert_eq!(k.weight(0.0), 1.0);
//! assert_eq!(k.weight(3.0), 0.0);
//! assert!(k.weight(1.5) < 0.0); // second lobe
//! ```

use crate::{OpsError, OpsResult};
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

/// A filter kernel used to weight source pixels.
pub trait Resampler: Send + Sync + fmt::Debug {
    /// Short identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Half-width of the support, in source pixels.
    fn radius(&self) -> f32;

    /// Weight at offset `x` from the sample centre.
    fn weight(&self, x: f32) -> f32;

    /// Whether the kernel selects one source pixel instead of blending.
    ///
    /// Point samplers get single-tap windows regardless of scale.
    fn is_point_sampler(&self) -> bool {
        false
    }
}

#[inline]
fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-6 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

#[inline]
fn lanczos(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax >= a { 0.0 } else { sinc(ax) * sinc(ax / a) }
}

/// Mitchell-Netravali family, unnormalized.
#[inline]
fn cubic_bc(x: f32, b: f32, c: f32) -> f32 {
    let ax = x.abs();
    let ax2 = ax * ax;
    let ax3 = ax2 * ax;
    if ax < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * ax3 + (-18.0 + 12.0 * b + 6.0 * c) * ax2 + (6.0 - 2.0 * b))
            / 6.0
    } else if ax < 2.0 {
        ((-b - 6.0 * c) * ax3 + (6.0 * b + 30.0 * c) * ax2 + (-12.0 * b - 48.0 * c) * ax
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

/// A two-parameter piecewise cubic with support 2.
///
/// `b` trades sharpness for blur, `c` controls ringing. The curve is
/// scaled so that its peak is exactly 1; window normalization makes the
/// scale invisible in resize output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicResampler {
    b: f32,
    c: f32,
    peak: f32,
}

impl CubicResampler {
    /// Creates a cubic with the given B and C parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] unless both parameters are
    /// finite and `b < 3` (the curve has no positive peak otherwise).
    pub fn new(b: f32, c: f32) -> OpsResult<Self> {
        if !(b.is_finite() && c.is_finite() && b < 3.0) {
            return Err(OpsError::InvalidParameter(format!(
                "cubic parameters B={b}, C={c} out of range"
            )));
        }
        Ok(Self {
            b,
            c,
            peak: (6.0 - 2.0 * b) / 6.0,
        })
    }

    /// The B parameter.
    pub fn b(&self) -> f32 {
        self.b
    }

    /// The C parameter.
    pub fn c(&self) -> f32 {
        self.c
    }
}

impl Resampler for CubicResampler {
    fn name(&self) -> &'static str {
        "cubic"
    }

    fn radius(&self) -> f32 {
        2.0
    }

    fn weight(&self, x: f32) -> f32 {
        cubic_bc(x, self.b, self.c) / self.peak
    }
}

macro_rules! cubic_kernel {
    ($(#[$doc:meta])* $name:ident, $id:literal, $b:expr, $c:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl $name {
            /// B parameter.
            pub const B: f32 = $b;
            /// C parameter.
            pub const C: f32 = $c;
        }

        impl Resampler for $name {
            fn name(&self) -> &'static str {
                $id
            }

            fn radius(&self) -> f32 {
                2.0
            }

            fn weight(&self, x: f32) -> f32 {
                cubic_bc(x, Self::B, Self::C) / ((6.0 - 2.0 * Self::B) / 6.0)
            }
        }
    };
}

cubic_kernel!(
    /// Catmull-Rom (Keys, a = -0.5). Interpolating: zero at every non-zero integer.
    BicubicResampler,
    "bicubic",
    0.0,
    0.5
);
cubic_kernel!(
    /// Cubic B-spline (B = 1, C = 0). Smooth, does not interpolate.
    SplineResampler,
    "spline",
    1.0,
    0.0
);
cubic_kernel!(
    /// Mitchell-Netravali (B = C = 1/3).
    MitchellNetravaliResampler,
    "mitchell",
    1.0 / 3.0,
    1.0 / 3.0
);
cubic_kernel!(
    /// Robidoux cubic, tuned for orthogonal resampling.
    RobidouxResampler,
    "robidoux",
    0.378_215_76,
    0.310_892_13
);
cubic_kernel!(
    /// Sharpened Robidoux cubic.
    RobidouxSharpResampler,
    "robidoux-sharp",
    0.262_014_5,
    0.368_992_75
);

macro_rules! lanczos_kernel {
    ($(#[$doc:meta])* $name:ident, $id:literal, $a:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Resampler for $name {
            fn name(&self) -> &'static str {
                $id
            }

            fn radius(&self) -> f32 {
                $a
            }

            fn weight(&self, x: f32) -> f32 {
                lanczos(x, $a)
            }
        }
    };
}

lanczos_kernel!(
    /// Lanczos with three lobes.
    Lanczos3Resampler,
    "lanczos3",
    3.0
);
lanczos_kernel!(
    /// Lanczos with five lobes.
    Lanczos5Resampler,
    "lanczos5",
    5.0
);
lanczos_kernel!(
    /// Lanczos with eight lobes.
    Lanczos8Resampler,
    "lanczos8",
    8.0
);

/// Nearest neighbour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NearestNeighborResampler;

impl Resampler for NearestNeighborResampler {
    fn name(&self) -> &'static str {
        "nearest"
    }

    fn radius(&self) -> f32 {
        1.0
    }

    fn weight(&self, x: f32) -> f32 {
        if x.abs() < 0.5 { 1.0 } else { 0.0 }
    }

    fn is_point_sampler(&self) -> bool {
        true
    }
}

/// Box filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxResampler;

impl Resampler for BoxResampler {
    fn name(&self) -> &'static str {
        "box"
    }

    fn radius(&self) -> f32 {
        0.5
    }

    fn weight(&self, x: f32) -> f32 {
        if x.abs() < 0.5 { 1.0 } else { 0.0 }
    }
}

/// Triangle (bilinear) filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangleResampler;

impl Resampler for TriangleResampler {
    fn name(&self) -> &'static str {
        "triangle"
    }

    fn radius(&self) -> f32 {
        1.0
    }

    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax < 1.0 { 1.0 - ax } else { 0.0 }
    }
}

/// Hermite smoothstep, `2|x|^3 - 3|x|^2 + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HermiteResampler;

impl Resampler for HermiteResampler {
    fn name(&self) -> &'static str {
        "hermite"
    }

    fn radius(&self) -> f32 {
        1.0
    }

    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax < 1.0 {
            (2.0 * ax - 3.0) * ax * ax + 1.0
        } else {
            0.0
        }
    }
}

/// Sinc with a Welch (parabolic) window over three lobes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WelchResampler;

impl Resampler for WelchResampler {
    fn name(&self) -> &'static str {
        "welch"
    }

    fn radius(&self) -> f32 {
        3.0
    }

    fn weight(&self, x: f32) -> f32 {
        let ax = x.abs();
        if ax >= 3.0 {
            return 0.0;
        }
        let t = ax / 3.0;
        sinc(ax) * (1.0 - t * t)
    }
}

/// Every built-in kernel, in the order of the module table.
pub fn builtin() -> Vec<Arc<dyn Resampler>> {
    vec![
        Arc::new(NearestNeighborResampler),
        Arc::new(BoxResampler),
        Arc::new(TriangleResampler),
        Arc::new(HermiteResampler),
        Arc::new(BicubicResampler),
        Arc::new(SplineResampler),
        Arc::new(MitchellNetravaliResampler),
        Arc::new(RobidouxResampler),
        Arc::new(RobidouxSharpResampler),
        Arc::new(Lanczos3Resampler),
        Arc::new(Lanczos5Resampler),
        Arc::new(Lanczos8Resampler),
        Arc::new(WelchResampler),
    ]
}
