//! Biome tint colors.

use terracell_core::Tint;

/// Converts hue (degrees), saturation and brightness (both `[0, 1]`) to RGB.
///
/// Hue wraps, so `360.0` is red again.
#[must_use]
pub fn hsb_to_rgb(hue: f64, saturation: f64, brightness: f64) -> [f64; 3] {
    let saturation = saturation.clamp(0.0, 1.0);
    let brightness = brightness.clamp(0.0, 1.0);
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = brightness * saturation;
    let x = chroma * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = brightness - chroma;
    [r + m, g + m, b + m]
}

/// Weighted per-channel sum, narrowed to a voxel tint.
///
/// Weights are expected to sum to one.
#[must_use]
pub fn weighted_tint<I>(parts: I) -> Tint
where
    I: IntoIterator<Item = ([f64; 3], f64)>,
{
    let mut rgb = [0.0; 3];
    for (color, weight) in parts {
        for (channel, value) in rgb.iter_mut().zip(color) {
            *channel += weight * value;
        }
    }
    rgb.map(|c| c as f32)
}
