use serde::{Deserialize, Serialize};

use crate::error::{ChartsmithError, Result};
use crate::render::axis;
use crate::render::svg;
use crate::scale::LinearScale;
use crate::theme::Theme;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    500.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudSpec {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default)]
    pub title: Option<String>,
    pub words: Vec<Word>,
    #[serde(default = "default_min_font")]
    pub min_font_size: f64,
    #[serde(default = "default_max_font")]
    pub max_font_size: f64,
}

fn default_min_font() -> f64 {
    12.0
}

fn default_max_font() -> f64 {
    52.0
}

struct PlacedBox {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

fn overlaps(a: &PlacedBox, b: &PlacedBox) -> bool {
    a.x < b.x + b.w && b.x < a.x + a.w && a.y < b.y + b.h && b.y < a.y + a.h
}

/// Word cloud with deterministic spiral placement.
///
/// Words are laid out heaviest-first along an Archimedean spiral from the
/// center; a word that cannot find a free spot inside the canvas is
/// dropped. Identical input always produces the identical cloud (there is
/// no randomness anywhere in the placement).
pub fn render_wordcloud(spec: &WordCloudSpec, theme: &Theme) -> Result<String> {
    if spec.words.is_empty() {
        return Err(ChartsmithError::Data("word cloud requires at least one word".into()));
    }
    if spec.words.iter().any(|w| w.weight < 0.0) {
        return Err(ChartsmithError::Data("word weights must be non-negative".into()));
    }

    let mut words = spec.words.clone();
    words.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.text.cmp(&b.text))
    });

    let lo = words.iter().map(|w| w.weight).fold(f64::INFINITY, f64::min);
    let hi = words.iter().map(|w| w.weight).fold(f64::NEG_INFINITY, f64::max);
    let font = if (hi - lo).abs() < f64::EPSILON {
        LinearScale::new((0.0, 1.0), (spec.max_font_size, spec.max_font_size))
    } else {
        LinearScale::new((lo, hi), (spec.min_font_size, spec.max_font_size))
    };

    let cx = spec.width / 2.0;
    let cy = spec.height / 2.0 + if spec.title.is_some() { 14.0 } else { 0.0 };

    let mut out = String::new();
    if let Some(title) = &spec.title {
        axis::draw_title(&mut out, title, spec.width, theme)?;
    }

    let mut placed: Vec<PlacedBox> = Vec::with_capacity(words.len());
    for (i, word) in words.iter().enumerate() {
        let size = font.apply(word.weight);
        // Rough glyph metrics; good enough for collision boxes.
        let w = word.text.chars().count() as f64 * size * 0.6;
        let h = size * 1.1;

        let mut spot: Option<(f64, f64)> = None;
        let mut t: f64 = 0.0;
        while t < 400.0 {
            let r = 3.5 * t;
            let px = cx + r * t.cos() - w / 2.0;
            let py = cy + r * t.sin() - h / 2.0;
            let candidate = PlacedBox { x: px, y: py, w, h };
            let inside = px >= 0.0
                && py >= 0.0
                && px + w <= spec.width
                && py + h <= spec.height;
            if inside && !placed.iter().any(|p| overlaps(p, &candidate)) {
                spot = Some((px, py));
                placed.push(candidate);
                break;
            }
            t += 0.35;
        }

        // A word that never fits is silently dropped.
        if let Some((px, py)) = spot {
            svg::text(
                &mut out,
                px + w / 2.0,
                py + h * 0.8,
                &word.text,
                size.round() as u32,
                &theme.font_family,
                &theme.series_color(i),
                "middle",
                "bold",
            )?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(words: &[(&str, f64)]) -> WordCloudSpec {
        WordCloudSpec {
            width: 800.0,
            height: 500.0,
            title: None,
            words: words.iter().map(|(t, w)| Word { text: t.to_string(), weight: *w }).collect(),
            min_font_size: 12.0,
            max_font_size: 52.0,
        }
    }

    #[test]
    fn all_words_place_when_canvas_is_roomy() {
        let theme = Theme::default();
        let out = render_wordcloud(&spec(&[("rust", 10.0), ("chart", 5.0), ("svg", 2.0)]), &theme)
            .unwrap();
        assert_eq!(out.matches("<text").count(), 3);
    }

    #[test]
    fn heaviest_word_gets_largest_font() {
        let theme = Theme::default();
        let out = render_wordcloud(&spec(&[("big", 10.0), ("small", 1.0)]), &theme).unwrap();
        let big_pos = out.find(">big<").unwrap();
        assert!(out[..big_pos].contains(r#"font-size="52""#));
    }

    #[test]
    fn deterministic_output() {
        let theme = Theme::default();
        let s = spec(&[("a", 3.0), ("b", 3.0), ("c", 1.0)]);
        assert_eq!(render_wordcloud(&s, &theme).unwrap(), render_wordcloud(&s, &theme).unwrap());
    }
}
