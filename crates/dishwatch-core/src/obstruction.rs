//! Directional obstruction analysis.
//!
//! The dish reports obstruction in 12 wedges of 30°, starting at North and
//! rotating clockwise (looking up at the sky).

use serde::Serialize;

/// Wedge labels, index 0 = North.
pub const WEDGE_DIRECTIONS: [&str; 12] = [
    "N (0°-30°)",
    "NNE (30°-60°)",
    "ENE (60°-90°)",
    "E (90°-120°)",
    "ESE (120°-150°)",
    "SSE (150°-180°)",
    "S (180°-210°)",
    "SSW (210°-240°)",
    "WSW (240°-270°)",
    "W (270°-300°)",
    "WNW (300°-330°)",
    "NNW (330°-360°)",
];

const BAR_CHAR: char = '█';

/// One labelled wedge reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WedgeReading {
    pub direction: &'static str,
    pub snr_db: f64,
}

/// Pair wedge values with their direction labels. Extra values beyond the
/// twelfth wedge are ignored; missing wedges are simply absent.
pub fn label_wedges(wedges: &[f64]) -> Vec<WedgeReading> {
    WEDGE_DIRECTIONS
        .iter()
        .zip(wedges)
        .map(|(direction, &snr_db)| WedgeReading { direction, snr_db })
        .collect()
}

/// Bar length for a wedge: half the SNR, truncated; zero for non-positive
/// values.
pub fn bar_length(snr_db: f64) -> usize {
    if snr_db > 0.0 && snr_db.is_finite() {
        (snr_db / 2.0) as usize
    } else {
        0
    }
}

pub fn bar(snr_db: f64) -> String {
    std::iter::repeat_n(BAR_CHAR, bar_length(snr_db)).collect()
}

/// How badly the sky view is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstructionSeverity {
    /// Under 1% obstructed.
    Minimal,
    /// 1-5% obstructed.
    Minor,
    /// Over 5% obstructed.
    Significant,
}

impl ObstructionSeverity {
    pub fn from_fraction(fraction_obstructed: f64) -> Self {
        if fraction_obstructed > 0.05 {
            Self::Significant
        } else if fraction_obstructed > 0.01 {
            Self::Minor
        } else {
            Self::Minimal
        }
    }

    /// Whether this is a warning (as opposed to a clean bill).
    pub fn is_warning(self) -> bool {
        !matches!(self, Self::Minimal)
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Significant => "Your dish has significant obstructions (>5%)",
            Self::Minor => "Your dish has minor obstructions (1-5%)",
            Self::Minimal => "Your dish has minimal obstructions (<1%)",
        }
    }

    pub fn advice(self) -> &'static [&'static str] {
        match self {
            Self::Significant => &[
                "Consider:",
                "- Trimming trees in obstructed directions",
                "- Moving the dish to a location with clearer sky view",
                "- Elevating the dish higher",
            ],
            Self::Minor => &["This may cause occasional connectivity issues"],
            Self::Minimal => &["Good dish placement!"],
        }
    }
}
