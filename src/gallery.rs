//! The gallery composition engine.
//!
//! A gallery composes N chart variants into one SVG document: background,
//! a centered title band, then one labeled cell per variant. Variants hide
//! a data provider and a chart renderer behind one uniform interface, so
//! the engine never knows which chart type a cell holds.

pub mod layout;
pub mod registry;

use crate::error::Result;
use crate::render::svg;
use crate::theme::Theme;

pub use self::layout::{GalleryDimensions, GalleryLayout};

/// Everything a variant needs to render its cell.
pub struct CellContext<'a> {
    pub width: f64,
    pub height: f64,
    pub theme: &'a Theme,
}

/// One gallery cell: a label plus the provider/renderer pair.
pub struct Variant {
    pub label: &'static str,
    render: Box<dyn Fn(&CellContext) -> Result<String> + Send + Sync>,
}

impl std::fmt::Debug for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variant").field("label", &self.label).finish()
    }
}

impl Variant {
    /// Couples a data provider to a chart renderer.
    ///
    /// The provider builds the chart spec for the cell size; the renderer
    /// turns it into the cell's inner SVG. Keeping the two as separate
    /// closures preserves the provider/renderer seam while the engine only
    /// ever sees one callable.
    pub fn new<S, P, R>(label: &'static str, provider: P, renderer: R) -> Self
    where
        S: 'static,
        P: Fn(&CellContext) -> S + Send + Sync + 'static,
        R: Fn(&S, &Theme) -> Result<String> + Send + Sync + 'static,
    {
        Variant {
            label,
            render: Box::new(move |ctx| renderer(&provider(ctx), ctx.theme)),
        }
    }

    pub fn render(&self, ctx: &CellContext) -> Result<String> {
        (self.render)(ctx)
    }
}

/// A named, fixed composition of variants under one layout strategy.
#[derive(Debug)]
pub struct GalleryConfig {
    pub name: &'static str,
    pub title: &'static str,
    pub layout: GalleryLayout,
    pub variants: Vec<Variant>,
}

/// Vertical space reserved for each cell's variant label.
const LABEL_BAND: f64 = 24.0;

/// Renders a gallery into a complete standalone SVG document.
pub fn render_gallery(config: &GalleryConfig, theme: &Theme) -> Result<String> {
    let dims = config.layout.dimensions(config.variants.len());

    let mut body = String::new();
    svg::text(
        &mut body,
        dims.width / 2.0,
        dims.title_band / 2.0 + 7.0,
        config.title,
        theme.title_font_size + 4,
        &theme.font_family,
        &theme.title_color,
        "middle",
        "bold",
    )?;

    for (i, variant) in config.variants.iter().enumerate() {
        let (cx, cy) = config.layout.cell_position(i);
        svg::group_open(&mut body, cx, cy + dims.title_band)?;

        svg::text(
            &mut body,
            dims.cell_width / 2.0,
            16.0,
            variant.label,
            theme.label_font_size,
            &theme.font_family,
            &theme.label_color,
            "middle",
            "bold",
        )?;

        let ctx = CellContext {
            width: dims.cell_width,
            height: dims.cell_height - LABEL_BAND,
            theme,
        };
        let fragment = variant.render(&ctx)?;
        svg::group_open(&mut body, 0.0, LABEL_BAND)?;
        body.push_str(&fragment);
        svg::group_close(&mut body)?;

        svg::group_close(&mut body)?;
    }

    Ok(svg::wrap_svg(dims.width, dims.height, &theme.background, &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::bar::{render_bar, BarChartSpec};
    use crate::data::LabeledValue;

    fn tiny_bar_variant(label: &'static str) -> Variant {
        Variant::new(
            label,
            |ctx: &CellContext| BarChartSpec {
                width: ctx.width,
                height: ctx.height,
                title: None,
                data: vec![
                    LabeledValue { label: "a".into(), value: 1.0 },
                    LabeledValue { label: "b".into(), value: 2.0 },
                ],
                color: None,
                show_values: false,
                show_axes: false,
                show_grid: false,
            },
            render_bar,
        )
    }

    #[test]
    fn gallery_composes_title_and_cells() {
        let theme = Theme::default();
        let config = GalleryConfig {
            name: "test",
            title: "Two Bars",
            layout: GalleryLayout::SingleRow { cell_width: 300.0, cell_height: 220.0 },
            variants: vec![tiny_bar_variant("left"), tiny_bar_variant("right")],
        };
        let out = render_gallery(&config, &theme).unwrap();
        assert!(out.starts_with("<svg"));
        assert!(out.contains(">Two Bars<"));
        assert!(out.contains(">left<"));
        assert!(out.contains(">right<"));
        assert_eq!(out.matches("<g transform").count(), 4);
    }

    #[test]
    fn re_rendering_is_byte_identical() {
        let theme = Theme::default();
        let config = GalleryConfig {
            name: "test",
            title: "T",
            layout: GalleryLayout::SingleRow { cell_width: 300.0, cell_height: 220.0 },
            variants: vec![tiny_bar_variant("only")],
        };
        assert_eq!(
            render_gallery(&config, &theme).unwrap(),
            render_gallery(&config, &theme).unwrap()
        );
    }
}
