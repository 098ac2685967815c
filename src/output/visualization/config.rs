//! Figure settings for run and scan plots

use plotters::prelude::*;

/// Size, labels and colors of a figure
///
/// Used by both single-run and scan-grid plots. For a scan grid, `width` and
/// `height` are the size of the whole figure.
///
/// # Example
///
/// ```rust,ignore
/// use coculture::output::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::scan_grid("Competition scan");
/// config.columns = 3;
/// config.series_colors = Some(vec![RED, BLUE]);
/// ```
#[derive(Clone, Debug)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Figure title (default: "Plot")
    pub title: String,

    /// X-axis label (default: "time")
    pub xlabel: String,

    /// Y-axis label (default: set by table kind)
    pub ylabel: String,

    /// One color per column; falls back to the default palette
    pub series_colors: Option<Vec<RGBColor>>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Subplots per row of a scan grid (default: 2)
    pub columns: usize,

    /// Same y range on every subplot of a scan grid (default: true)
    pub shared_y: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: "time".to_string(),
            ylabel: String::new(),
            series_colors: None,
            background: WHITE,
            line_width: 2,
            show_grid: true,
            columns: 2,
            shared_y: true,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// No custom title, the default one is used
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Single run, title defaults to "Time course"
    pub fn time_course(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Time course".to_string()),
            ..Self::default()
        }
    }

    /// Scan grid, title defaults to "Parameter scan"
    pub fn scan_grid(title: impl IntoOptionalTitle) -> Self {
        Self {
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "Parameter scan".to_string()),
            width: 1400,
            height: 1000,
            ..Self::default()
        }
    }

    /// Color of the series at index i
    ///
    /// Uses custom colors if provided, otherwise the default palette.
    pub(crate) fn series_color(&self, index: usize) -> RGBColor {
        if let Some(colors) = &self.series_colors {
            if let Some(color) = colors.get(index) {
                return *color;
            }
        }

        const PALETTE: [RGBColor; 8] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0),
            RGBColor(128, 0, 128),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_config_default() {
        let config = PlotConfig::default();
        assert_eq!(config.width, 1024);
        assert_eq!(config.columns, 2);
        assert!(config.show_grid);
        assert!(config.shared_y);
    }

    #[test]
    fn test_titles() {
        assert_eq!(PlotConfig::time_course(NO_TITLE).title, "Time course");
        assert_eq!(PlotConfig::scan_grid(NO_TITLE).title, "Parameter scan");
        assert_eq!(PlotConfig::scan_grid("Niche overlap").title, "Niche overlap");
        assert_eq!(
            PlotConfig::time_course(format!("a_e = {}", 0.5)).title,
            "a_e = 0.5"
        );
    }

    #[test]
    fn test_series_color_palette() {
        let config = PlotConfig::default();
        assert_eq!(config.series_color(0), RED);
        assert_eq!(config.series_color(1), BLUE);
        assert_eq!(config.series_color(8), RED);
    }

    #[test]
    fn test_series_color_custom_then_palette() {
        let config = PlotConfig {
            series_colors: Some(vec![BLACK]),
            ..PlotConfig::default()
        };
        assert_eq!(config.series_color(0), BLACK);
        assert_eq!(config.series_color(1), BLUE);
    }
}
