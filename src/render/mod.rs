//! Chart styling and rasterization.

mod backend;
mod draw;
mod style;

pub use backend::FontSafeBackend;
pub use draw::{
    category_label, draw_legend, draw_markers, log_range, padded_range, render_chart,
    zero_based_range, Marker, RenderedChart,
};
pub use style::{ChartStyle, Palette, Theme};
