use crate::visual::color::ColorPalette;

/// Design tokens shared by every renderer.
///
/// A `Theme` centralizes fonts, text colors, stroke weights, and the default
/// categorical palette so all 29 charts read as one family. Renderers take
/// the theme by reference; nothing mutates it after boot.
#[derive(Clone, Debug)]
pub struct Theme {
    pub title_font_size: u32,
    pub label_font_size: u32,
    pub tick_font_size: u32,
    pub font_family: String,

    pub title_color: String,
    pub label_color: String,
    pub axis_color: String,
    pub grid_color: String,
    pub background: String,

    pub axis_stroke_width: f64,
    pub grid_stroke_width: f64,

    pub palette: ColorPalette,
}

impl Default for Theme {
    fn default() -> Self {
        let font_stack = "Inter, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, \
                          Helvetica, Arial, 'Noto Sans', sans-serif"
            .to_string();
        Self {
            title_font_size: 18,
            label_font_size: 14,
            tick_font_size: 12,
            font_family: font_stack,

            title_color: "#333333".to_string(),
            label_color: "#333333".to_string(),
            axis_color: "#888888".to_string(),
            grid_color: "#e0e0e0".to_string(),
            background: "#ffffff".to_string(),

            axis_stroke_width: 1.0,
            grid_stroke_width: 0.5,

            palette: ColorPalette::Tab10,
        }
    }
}

impl Theme {
    /// Default categorical color for a series index.
    pub fn series_color(&self, index: usize) -> String {
        self.palette.get_color(index)
    }
}
