use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_TEXT: &str = "#000000";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Colour preferences: background / text, stored as hex strings
// ---------------------------------------------------------------------------

/// Session-scoped styling preferences. Purely cosmetic; the data pipeline
/// never reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPreferences {
    pub background: String,
    pub text: String,
}

impl Default for ColorPreferences {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            text: DEFAULT_TEXT.to_string(),
        }
    }
}

impl ColorPreferences {
    pub fn background_color(&self) -> Color32 {
        parse_hex(&self.background).unwrap_or(Color32::WHITE)
    }

    pub fn text_color(&self) -> Color32 {
        parse_hex(&self.text).unwrap_or(Color32::BLACK)
    }

    pub fn set_background(&mut self, color: Color32) {
        self.background = to_hex(color);
    }

    pub fn set_text(&mut self, color: Color32) {
        self.text = to_hex(color);
    }
}

/// Parse `#RRGGBB` (or `RRGGBB`) into an opaque colour.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    match Srgb::<u8>::from_str(hex) {
        Ok(rgb) => Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue)),
        Err(e) => {
            log::warn!("Ignoring colour preference '{hex}': {e}");
            None
        }
    }
}

pub fn to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}
