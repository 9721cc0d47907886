use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// 8-bit sRGB triple, convertible to both plotters and egui colours.
pub type Rgb = [u8; 3];

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n).map(|i| hue_color((i as f32 / n as f32) * 360.0)).collect()
}

/// Colour of the raw sample scatter.
pub fn sample_color() -> Rgb {
    hue_color(210.0)
}

/// Colour of the periodogram line.
pub fn power_color() -> Rgb {
    hue_color(15.0)
}

fn hue_color(hue: f32) -> Rgb {
    let hsl = Hsl::new(hue, 0.75, 0.45);
    let rgb: Srgb = hsl.into_color();
    [
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    ]
}
