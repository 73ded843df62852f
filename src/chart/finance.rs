use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::data::OhlcBar;
use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::svg;
use crate::scale::{LinearScale, TimeScale};
use crate::theme::Theme;

fn default_width() -> f64 {
    1000.0
}

fn default_height() -> f64 {
    600.0
}

fn default_true() -> bool {
    true
}

const UP_COLOR: &str = "#2ca02c";
const DOWN_COLOR: &str = "#d62728";

/// Candlestick chart: filled bodies between open and close, wicks to
/// high/low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub bars: Vec<OhlcBar>,
    /// Draw a volume band along the bottom when volumes are present.
    #[serde(default = "default_true")]
    pub show_volume: bool,
}

struct PriceFrame {
    time: TimeScale,
    price: LinearScale,
    plot: crate::layout::Rect,
    instants: Vec<OffsetDateTime>,
    slot: f64,
}

/// Validates the bars and builds the shared time/price scales.
fn price_frame(
    bars: &[OhlcBar],
    width: f64,
    height: f64,
    has_title: bool,
    reserve_volume: bool,
) -> Result<PriceFrame> {
    if bars.is_empty() {
        return Err(ChartsmithError::Data("ohlc chart requires at least one bar".into()));
    }
    let mut instants = Vec::with_capacity(bars.len());
    for bar in bars {
        bar.validate()?;
        instants.push(bar.instant()?);
    }

    let mut plot = axis::plot_area(width, height, has_title);
    if reserve_volume {
        plot.height *= 0.78;
    }

    let time = TimeScale::from_instants(&instants, (plot.x, plot.x + plot.width))?;
    let lo = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let hi = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let price = LinearScale::new((lo, hi), (plot.y + plot.height, plot.y)).nice(6);

    // Bars share the horizontal space evenly; the body takes 70% of a slot.
    let slot = plot.width / bars.len() as f64;
    Ok(PriceFrame { time, price, plot, instants, slot })
}

fn draw_price_axes(out: &mut String, frame: &PriceFrame, theme: &Theme) -> std::fmt::Result {
    let y_ticks: Vec<(f64, String)> = frame
        .price
        .ticks(6)
        .into_iter()
        .map(|t| (frame.price.apply(t.value), t.label))
        .collect();
    axis::draw_h_grid(out, &y_ticks, &frame.plot, theme)?;
    axis::draw_y_axis(out, &y_ticks, &frame.plot, theme)?;
    let x_ticks: Vec<(f64, String)> = frame
        .time
        .ticks(8)
        .into_iter()
        .map(|t| (frame.time.apply_seconds(t.value), t.label))
        .collect();
    axis::draw_x_axis(out, &x_ticks, &frame.plot, theme)
}

fn draw_volume_band(
    out: &mut String,
    spec_bars: &[OhlcBar],
    frame: &PriceFrame,
    height: f64,
) -> std::fmt::Result {
    let max_volume = spec_bars.iter().filter_map(|b| b.volume).fold(0.0, f64::max);
    if max_volume <= 0.0 {
        return Ok(());
    }
    let band_top = frame.plot.y + frame.plot.height + 8.0;
    let band_bottom = height - axis::MARGIN_BOTTOM;
    let vol = LinearScale::new((0.0, max_volume), (band_bottom, band_top));
    let body = frame.slot * 0.7;
    for (bar, instant) in spec_bars.iter().zip(&frame.instants) {
        if let Some(v) = bar.volume {
            let cx = frame.time.apply(*instant);
            let top = vol.apply(v);
            let color = if bar.close >= bar.open { UP_COLOR } else { DOWN_COLOR };
            svg::rect(out, cx - body / 2.0, top, body, band_bottom - top, color, "none", 0.0, 0.5)?;
        }
    }
    Ok(())
}

pub fn render_candlestick(spec: &CandlestickSpec, theme: &Theme) -> Result<String> {
    let has_volume = spec.show_volume && spec.bars.iter().any(|b| b.volume.is_some());
    let frame = price_frame(&spec.bars, spec.width, spec.height, spec.title.is_some(), has_volume)?;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    draw_price_axes(&mut out, &frame, theme)?;

    let body = frame.slot * 0.7;
    for (bar, instant) in spec.bars.iter().zip(&frame.instants) {
        let cx = frame.time.apply(*instant);
        let color = if bar.close >= bar.open { UP_COLOR } else { DOWN_COLOR };

        // Wick spans the full high-low range.
        svg::line(&mut out, cx, frame.price.apply(bar.high), cx, frame.price.apply(bar.low), color, 1.0)?;

        let open_y = frame.price.apply(bar.open);
        let close_y = frame.price.apply(bar.close);
        let top = open_y.min(close_y);
        let h = (open_y - close_y).abs().max(1.0);
        svg::rect(&mut out, cx - body / 2.0, top, body, h, color, "none", 0.0, 1.0)?;
    }

    if has_volume {
        draw_volume_band(&mut out, &spec.bars, &frame, spec.height)?;
    }
    Ok(out)
}

/// Open-high-low-close bars: a vertical range line with open/close ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub bars: Vec<OhlcBar>,
}

pub fn render_ohlc(spec: &OhlcSpec, theme: &Theme) -> Result<String> {
    let frame = price_frame(&spec.bars, spec.width, spec.height, spec.title.is_some(), false)?;

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }
    draw_price_axes(&mut out, &frame, theme)?;

    let tick = (frame.slot * 0.35).max(2.0);
    for (bar, instant) in spec.bars.iter().zip(&frame.instants) {
        let cx = frame.time.apply(*instant);
        let color = if bar.close >= bar.open { UP_COLOR } else { DOWN_COLOR };
        svg::line(&mut out, cx, frame.price.apply(bar.high), cx, frame.price.apply(bar.low), color, 1.5)?;
        let open_y = frame.price.apply(bar.open);
        svg::line(&mut out, cx - tick, open_y, cx, open_y, color, 1.5)?;
        let close_y = frame.price.apply(bar.close);
        svg::line(&mut out, cx, close_y, cx + tick, close_y, color, 1.5)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> Vec<OhlcBar> {
        vec![
            OhlcBar {
                timestamp: "2024-03-01T00:00:00Z".into(),
                open: 10.0,
                high: 12.0,
                low: 9.5,
                close: 11.0,
                volume: Some(1000.0),
            },
            OhlcBar {
                timestamp: "2024-03-02T00:00:00Z".into(),
                open: 11.0,
                high: 11.5,
                low: 8.0,
                close: 9.0,
                volume: Some(1500.0),
            },
        ]
    }

    #[test]
    fn candles_color_by_direction() {
        let theme = Theme::default();
        let spec = CandlestickSpec {
            width: 1000.0,
            height: 600.0,
            title: None,
            bars: bars(),
            show_volume: false,
        };
        let out = render_candlestick(&spec, &theme).unwrap();
        assert!(out.contains(UP_COLOR));
        assert!(out.contains(DOWN_COLOR));
    }

    #[test]
    fn volume_band_adds_rects() {
        let theme = Theme::default();
        let without = render_candlestick(
            &CandlestickSpec {
                width: 1000.0,
                height: 600.0,
                title: None,
                bars: bars(),
                show_volume: false,
            },
            &theme,
        )
        .unwrap();
        let with = render_candlestick(
            &CandlestickSpec {
                width: 1000.0,
                height: 600.0,
                title: None,
                bars: bars(),
                show_volume: true,
            },
            &theme,
        )
        .unwrap();
        assert!(with.matches("<rect").count() > without.matches("<rect").count());
    }

    #[test]
    fn inconsistent_bar_rejected() {
        let theme = Theme::default();
        let mut b = bars();
        b[0].high = 10.5; // below close
        let spec = OhlcSpec { width: 1000.0, height: 600.0, title: None, bars: b };
        assert!(render_ohlc(&spec, &theme).is_err());
    }

    #[test]
    fn ohlc_emits_three_lines_per_bar() {
        let theme = Theme::default();
        let spec = OhlcSpec { width: 1000.0, height: 600.0, title: None, bars: bars() };
        let out = render_ohlc(&spec, &theme).unwrap();
        // Axis and grid lines are also <line>; count only colored marks.
        let marks = out.lines().filter(|l| l.contains(UP_COLOR) || l.contains(DOWN_COLOR)).count();
        assert_eq!(marks, 6);
    }
}
