// File: crates/tiden-render-skia/src/text.rs
// Summary: Text shaping via Skia textlayout; also backs label measurement for the scene surface.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};
use tiden_core::TextMeasure;

/// Where the anchor x sits relative to the laid-out text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

pub struct TextShaper {
    fonts: FontCollection,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fc = FontCollection::new();
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc }
    }

    fn make_style(size: f32, paint: &skia::Paint) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size.max(1.0));
        ts.set_foreground_paint(paint);
        ts.set_font_families(&["Helvetica Neue", "Helvetica", "Arial", "DejaVu Sans", "sans-serif"]);
        ts
    }

    pub fn layout(&self, text: &str, size: f32, paint: &skia::Paint) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&Self::make_style(size, paint));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size, &skia::Paint::default()).longest_line()
    }

    /// Paint `text` with its baseline at `y`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, anchor: Anchor, paint: &skia::Paint) {
        let mut p = self.layout(text, size, paint);
        let w = p.longest_line();
        let left = match anchor {
            Anchor::Start => x,
            Anchor::Middle => x - w * 0.5,
            Anchor::End => x - w,
        };
        // Paragraphs draw from the top-left; approximate the ascent.
        p.paint(canvas, (left, y - size * 0.8));
    }
}

/// Label measurement backed by real font metrics.
pub struct SkiaTextMeasure {
    shaper: TextShaper,
}

impl SkiaTextMeasure {
    pub fn new() -> Self {
        Self { shaper: TextShaper::new() }
    }
}

impl Default for SkiaTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for SkiaTextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.shaper.measure_width(text, font_size as f32) as f64
    }
}
