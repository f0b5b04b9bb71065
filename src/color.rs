use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

/// Marker colour of the actual-vs-predicted scatter (green, 70% opacity).
pub const SCATTER_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 90, 0, 178);

/// Fill for heatmap cells whose coefficient is undefined.
pub const UNDEFINED_CELL: Color32 = Color32::from_gray(200);

// ---------------------------------------------------------------------------
// Diverging cool-warm colour map
// ---------------------------------------------------------------------------

const COOL: (u8, u8, u8) = (59, 76, 192);
const NEUTRAL: (u8, u8, u8) = (221, 221, 221);
const WARM: (u8, u8, u8) = (180, 4, 38);

fn linear(rgb: (u8, u8, u8)) -> LinSrgb {
    Srgb::new(rgb.0, rgb.1, rgb.2)
        .into_format::<f32>()
        .into_linear()
}

/// Map a correlation in `[-1, 1]` to blue → grey → red.
///
/// Values outside the range are clamped; interpolation happens in linear RGB.
pub fn coolwarm(value: f64) -> Color32 {
    let v = if value.is_nan() { 0.0 } else { value.clamp(-1.0, 1.0) as f32 };
    let mixed = if v < 0.0 {
        linear(NEUTRAL).mix(linear(COOL), -v)
    } else {
        linear(NEUTRAL).mix(linear(WARM), v)
    };
    let rgb: Srgb<f32> = Srgb::from_linear(mixed);
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Black or white, whichever reads better on `background`.
pub fn annotation_color(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}
