//! Color representation for CAD entities

use once_cell::sync::Lazy;
use std::fmt;

/// An AutoCAD Color Index (ACI) reference
///
/// True colors (group code 420) are stored separately as a packed
/// `0xRRGGBB` value next to this index, since files carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Color by layer (index 256)
    #[default]
    ByLayer,
    /// Color by block (index 0)
    ByBlock,
    /// AutoCAD Color Index (1-255)
    Index(u8),
}

impl Color {
    /// Create a color from a raw ACI value
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(index as u8),
            // Negative values only appear on layers switched off
            _ if index < 0 => Color::Index(index.unsigned_abs().min(255) as u8),
            _ => Color::Index(7),
        }
    }

    /// Get the raw color index
    pub fn index(&self) -> u16 {
        match self {
            Color::ByBlock => 0,
            Color::Index(i) => *i as u16,
            Color::ByLayer => 256,
        }
    }

    pub const RED: Color = Color::Index(1);
    pub const YELLOW: Color = Color::Index(2);
    pub const GREEN: Color = Color::Index(3);
    pub const CYAN: Color = Color::Index(4);
    pub const BLUE: Color = Color::Index(5);
    pub const MAGENTA: Color = Color::Index(6);
    pub const WHITE: Color = Color::Index(7);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
        }
    }
}

/// Value levels of the ten shades that repeat for every ACI hue
const SHADE_VALUES: [f64; 5] = [1.0, 0.65, 0.5, 0.3, 0.15];

const GRAYS: [u32; 6] = [0x333333, 0x505050, 0x696969, 0x828282, 0xBEBEBE, 0xFFFFFF];

static ACI_PALETTE: Lazy<[u32; 256]> = Lazy::new(|| {
    let mut palette = [0u32; 256];
    palette[1..10].copy_from_slice(&[
        0xFF0000, 0xFFFF00, 0x00FF00, 0x00FFFF, 0x0000FF, 0xFF00FF, 0xFFFFFF, 0x808080,
        0xC0C0C0,
    ]);
    for index in 10..250usize {
        let hue = ((index - 10) / 10) as f64 * 15.0;
        let shade = (index - 10) % 10;
        let value = SHADE_VALUES[shade / 2];
        let saturation = if shade % 2 == 0 { 1.0 } else { 0.5 };
        palette[index] = hsv_to_rgb(hue, saturation, value);
    }
    palette[250..].copy_from_slice(&GRAYS);
    palette
});

fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> u32 {
    let sector = (hue / 60.0).floor();
    let fraction = hue / 60.0 - sector;
    let v = value * 255.0;
    let p = v * (1.0 - saturation);
    let q = v * (1.0 - saturation * fraction);
    let t = v * (1.0 - saturation * (1.0 - fraction));
    let (r, g, b) = match sector as u32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    ((r.floor() as u32) << 16) | ((g.floor() as u32) << 8) | b.floor() as u32
}

/// Look up the packed `0xRRGGBB` value of an ACI index
pub fn aci_to_rgb(index: u8) -> u32 {
    ACI_PALETTE[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_index() {
        assert_eq!(Color::from_index(0), Color::ByBlock);
        assert_eq!(Color::from_index(256), Color::ByLayer);
        assert_eq!(Color::from_index(1), Color::Index(1));
        assert_eq!(Color::from_index(-5), Color::Index(5));
    }

    #[test]
    fn test_fixed_palette_entries() {
        assert_eq!(aci_to_rgb(1), 0xFF0000);
        assert_eq!(aci_to_rgb(7), 0xFFFFFF);
        assert_eq!(aci_to_rgb(255), 0xFFFFFF);
    }

    #[test]
    fn test_generated_palette_entries() {
        assert_eq!(aci_to_rgb(10), 0xFF0000);
        assert_eq!(aci_to_rgb(11), 0xFF7F7F);
        assert_eq!(aci_to_rgb(12), 0xA50000);
        assert_eq!(aci_to_rgb(20), 0xFF3F00);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::ByLayer.to_string(), "ByLayer");
        assert_eq!(Color::Index(3).to_string(), "Index(3)");
    }
}
