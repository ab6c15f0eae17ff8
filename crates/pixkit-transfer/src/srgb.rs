//! sRGB transfer function (IEC 61966-2-1).
//!
//! A linear segment near black joined to a 2.4 power curve. Both
//! directions are odd-symmetric, so the negative lobes some resampling
//! kernels produce survive a round trip instead of turning into NaN.

/// Decodes an sRGB-encoded value to linear light.
///
/// ```text
/// |V| <= 0.04045:  L = V / 12.92
/// otherwise:       L = sign(V) * ((|V| + 0.055) / 1.055)^2.4
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    let a = v.abs();
    let l = if a <= 0.04045 {
        a / 12.92
    } else {
        ((a + 0.055) / 1.055).powf(2.4)
    };
    l.copysign(v)
}

/// Encodes linear light to sRGB.
///
/// ```text
/// |L| <= 0.0031308:  V = L * 12.92
/// otherwise:         V = sign(L) * (1.055 * |L|^(1/2.4) - 0.055)
/// ```
#[inline]
pub fn oetf(l: f32) -> f32 {
    let a = l.abs();
    let v = if a <= 0.0031308 {
        a * 12.92
    } else {
        1.055 * a.powf(1.0 / 2.4) - 0.055
    };
    v.copysign(l)
}

/// Number of leading colour components in an `n`-channel pixel.
///
/// Two- and four-channel layouts carry alpha in the last slot.
#[inline]
pub const fn color_channels(n: usize) -> usize {
    match n {
        2 | 4 => n - 1,
        _ => n,
    }
}

/// Expands the colour components of a pixel to linear light in place.
#[inline]
pub fn expand<const N: usize>(px: &mut [f32; N]) {
    for c in px.iter_mut().take(color_channels(N)) {
        *c = eotf(*c);
    }
}

/// Compresses the colour components of a linear pixel back to sRGB in place.
#[inline]
pub fn compress<const N: usize>(px: &mut [f32; N]) {
    for c in px.iter_mut().take(color_channels(N)) {
        *c = oetf(*c);
    }
}
