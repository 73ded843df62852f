//! Shared axis, gridline, legend, and title drawing.
//!
//! These helpers draw before the data marks so marks always appear on top;
//! each chart renderer decides which of them its spec flags enable.

use crate::layout::Rect;
use crate::render::svg;
use crate::theme::Theme;

/// Margins around the plot area of a cartesian chart.
pub const MARGIN_LEFT: f64 = 60.0;
pub const MARGIN_RIGHT: f64 = 20.0;
pub const MARGIN_TOP: f64 = 20.0;
pub const MARGIN_TOP_TITLED: f64 = 48.0;
pub const MARGIN_BOTTOM: f64 = 44.0;

/// The inner plot rectangle for a cartesian chart of the given size.
pub fn plot_area(width: f64, height: f64, has_title: bool) -> Rect {
    let top = if has_title { MARGIN_TOP_TITLED } else { MARGIN_TOP };
    Rect::new(
        MARGIN_LEFT,
        top,
        (width - MARGIN_LEFT - MARGIN_RIGHT).max(0.0),
        (height - top - MARGIN_BOTTOM).max(0.0),
    )
}

/// Centered chart title across the top band.
pub fn draw_title(svg_buf: &mut String, title: &str, width: f64, theme: &Theme) -> std::fmt::Result {
    svg::text(
        svg_buf,
        width / 2.0,
        28.0,
        title,
        theme.title_font_size,
        &theme.font_family,
        &theme.title_color,
        "middle",
        "bold",
    )
}

/// Horizontal axis line plus tick marks and labels beneath the plot.
pub fn draw_x_axis(
    svg_buf: &mut String,
    ticks: &[(f64, String)],
    plot: &Rect,
    theme: &Theme,
) -> std::fmt::Result {
    let y = plot.y + plot.height;
    svg::line(svg_buf, plot.x, y, plot.x + plot.width, y, &theme.axis_color, theme.axis_stroke_width)?;
    for (pos, label) in ticks {
        svg::line(svg_buf, *pos, y, *pos, y + 5.0, &theme.axis_color, theme.axis_stroke_width)?;
        svg::text(
            svg_buf,
            *pos,
            y + 18.0,
            label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "normal",
        )?;
    }
    Ok(())
}

/// Vertical axis line plus tick marks and labels left of the plot.
pub fn draw_y_axis(
    svg_buf: &mut String,
    ticks: &[(f64, String)],
    plot: &Rect,
    theme: &Theme,
) -> std::fmt::Result {
    svg::line(svg_buf, plot.x, plot.y, plot.x, plot.y + plot.height, &theme.axis_color, theme.axis_stroke_width)?;
    for (pos, label) in ticks {
        svg::line(svg_buf, plot.x - 5.0, *pos, plot.x, *pos, &theme.axis_color, theme.axis_stroke_width)?;
        svg::text(
            svg_buf,
            plot.x - 8.0,
            *pos + 4.0,
            label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "end",
            "normal",
        )?;
    }
    Ok(())
}

/// Horizontal gridlines at the given y pixel positions.
pub fn draw_h_grid(
    svg_buf: &mut String,
    ticks: &[(f64, String)],
    plot: &Rect,
    theme: &Theme,
) -> std::fmt::Result {
    for (pos, _) in ticks {
        svg::line(
            svg_buf,
            plot.x,
            *pos,
            plot.x + plot.width,
            *pos,
            &theme.grid_color,
            theme.grid_stroke_width,
        )?;
    }
    Ok(())
}

/// Vertical gridlines at the given x pixel positions.
pub fn draw_v_grid(
    svg_buf: &mut String,
    ticks: &[(f64, String)],
    plot: &Rect,
    theme: &Theme,
) -> std::fmt::Result {
    for (pos, _) in ticks {
        svg::line(
            svg_buf,
            *pos,
            plot.y,
            *pos,
            plot.y + plot.height,
            &theme.grid_color,
            theme.grid_stroke_width,
        )?;
    }
    Ok(())
}

/// Swatch-and-label legend stacked vertically from (x, y).
pub fn draw_legend(
    svg_buf: &mut String,
    entries: &[(String, String)],
    x: f64,
    y: f64,
    theme: &Theme,
) -> std::fmt::Result {
    for (i, (label, color)) in entries.iter().enumerate() {
        let row_y = y + i as f64 * 18.0;
        svg::rect(svg_buf, x, row_y, 12.0, 12.0, color, "none", 0.0, 1.0)?;
        svg::text(
            svg_buf,
            x + 17.0,
            row_y + 10.0,
            label,
            theme.tick_font_size,
            &theme.font_family,
            &theme.label_color,
            "start",
            "normal",
        )?;
    }
    Ok(())
}
