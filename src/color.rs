use eframe::egui::Color32;
use palette::Srgb;

use crate::data::model::IncomeTier;

// ---------------------------------------------------------------------------
// Tier colours
// ---------------------------------------------------------------------------

/// Parse a `#rrggbb` string into an egui colour.
pub fn hex_to_color32(hex: &str) -> Option<Color32> {
    let rgb: Srgb<u8> = hex.parse().ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// The chart colour of a tier.
pub fn tier_color(tier: IncomeTier) -> Color32 {
    hex_to_color32(tier.display_color()).unwrap_or(Color32::GRAY)
}

/// Return the legend entries (tier label → colour) for the UI.
pub fn legend_entries() -> Vec<(&'static str, Color32)> {
    IncomeTier::ALL
        .iter()
        .map(|&tier| (tier.label(), tier_color(tier)))
        .collect()
}
