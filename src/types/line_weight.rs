//! Line weight (group code 370)

use std::fmt;

/// Width AutoCAD draws for [`LineWeight::Default`], in millimeters
pub const DEFAULT_WEIGHT_MM: f64 = 0.25;

/// Line weight of an entity or layer
///
/// Explicit weights are stored in 1/100 mm; negative codes are inheritance
/// sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineWeight {
    #[default]
    ByLayer,
    ByBlock,
    Default,
    /// Hundredths of a millimeter
    Hundredths(u16),
}

impl LineWeight {
    /// Interpret a raw 370 value; unknown negatives count as `Default`
    pub fn from_raw(raw: i16) -> Self {
        match raw {
            -1 => LineWeight::ByLayer,
            -2 => LineWeight::ByBlock,
            v if v < 0 => LineWeight::Default,
            v => LineWeight::Hundredths(v.unsigned_abs()),
        }
    }

    /// Follow BYLAYER and BYBLOCK to a concrete weight
    ///
    /// `parent` is the weight of the INSERT the entity is drawn through.
    /// Sentinels that cannot be resolved become `Default`.
    pub fn resolve(self, layer: LineWeight, parent: Option<LineWeight>) -> LineWeight {
        let inherited = match self {
            LineWeight::ByLayer => layer,
            LineWeight::ByBlock => parent.unwrap_or(LineWeight::Default),
            concrete => concrete,
        };
        match inherited {
            LineWeight::ByLayer | LineWeight::ByBlock => LineWeight::Default,
            concrete => concrete,
        }
    }

    /// Drawn width in millimeters; `None` for unresolved sentinels
    pub fn millimeters(self) -> Option<f64> {
        match self {
            LineWeight::Hundredths(v) => Some(f64::from(v) / 100.0),
            LineWeight::Default => Some(DEFAULT_WEIGHT_MM),
            LineWeight::ByLayer | LineWeight::ByBlock => None,
        }
    }
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWeight::ByLayer => f.write_str("BYLAYER"),
            LineWeight::ByBlock => f.write_str("BYBLOCK"),
            LineWeight::Default => f.write_str("DEFAULT"),
            LineWeight::Hundredths(v) => write!(f, "{:.2} mm", f64::from(*v) / 100.0),
        }
    }
}
