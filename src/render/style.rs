//! Explicit chart style shared by every view.

use crate::config::StyleConfig;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Background and grid palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// White background with grey grid lines
    #[default]
    WhiteGrid,
    /// Pale blue-grey background with white grid lines
    DarkGrid,
    /// White background, no grid
    White,
}

impl Theme {
    pub fn background(self) -> RGBColor {
        match self {
            Theme::WhiteGrid | Theme::White => RGBColor(255, 255, 255),
            Theme::DarkGrid => RGBColor(234, 234, 242),
        }
    }

    /// Grid line colour, `None` when the theme draws no grid.
    pub fn grid(self) -> Option<RGBColor> {
        match self {
            Theme::WhiteGrid => Some(RGBColor(204, 204, 204)),
            Theme::DarkGrid => Some(RGBColor(255, 255, 255)),
            Theme::White => None,
        }
    }

    pub fn foreground(self) -> RGBColor {
        RGBColor(38, 38, 38)
    }
}

/// Categorical colour palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Deep,
    Set2,
    Set3,
}

const DEEP: [RGBColor; 10] = [
    RGBColor(76, 114, 176),
    RGBColor(221, 132, 82),
    RGBColor(85, 168, 104),
    RGBColor(196, 78, 82),
    RGBColor(129, 114, 179),
    RGBColor(147, 120, 96),
    RGBColor(218, 139, 195),
    RGBColor(140, 140, 140),
    RGBColor(204, 185, 116),
    RGBColor(100, 181, 205),
];

const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

const SET3: [RGBColor; 12] = [
    RGBColor(141, 211, 199),
    RGBColor(255, 255, 179),
    RGBColor(190, 186, 218),
    RGBColor(251, 128, 114),
    RGBColor(128, 177, 211),
    RGBColor(253, 180, 98),
    RGBColor(179, 222, 105),
    RGBColor(252, 205, 229),
    RGBColor(217, 217, 217),
    RGBColor(188, 128, 189),
    RGBColor(204, 235, 197),
    RGBColor(255, 237, 111),
];

impl Palette {
    /// Colour for the `index`-th category, cycling when categories outnumber colours.
    pub fn color(self, index: usize) -> RGBColor {
        let colors: &[RGBColor] = match self {
            Palette::Deep => &DEEP,
            Palette::Set2 => &SET2,
            Palette::Set3 => &SET3,
        };
        colors[index % colors.len()]
    }
}

/// Resolved style handed to each view.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub theme: Theme,
    pub dpi: u32,
    /// Overrides each view's own figure size when set
    pub figure_size: Option<(f64, f64)>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&StyleConfig::default())
    }
}

impl From<&StyleConfig> for ChartStyle {
    fn from(config: &StyleConfig) -> Self {
        Self {
            theme: config.theme,
            dpi: config.dpi,
            figure_size: config.figure_size.map(|[w, h]| (w, h)),
        }
    }
}

impl ChartStyle {
    /// Pixel size of a figure whose default size is `inches`.
    pub fn pixels(&self, inches: (f64, f64)) -> (u32, u32) {
        let (w, h) = self.figure_size.unwrap_or(inches);
        let dpi = self.dpi as f64;
        (
            ((w * dpi).round() as u32).max(1),
            ((h * dpi).round() as u32).max(1),
        )
    }

    /// Pixel height of text set at `points`.
    pub fn font(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    /// Scale a length given in pixels at 100 dpi.
    pub fn px(&self, base: f64) -> u32 {
        (base * self.dpi as f64 / 100.0).round().max(1.0) as u32
    }
}
