// File: crates/tiden-render-skia/src/raster.rs
// Summary: CPU rasterizer for a retained tiden scene; walks the node tree and paints it with Skia.

use anyhow::Result;
use skia_safe as skia;
use tiden_core::render::class;
use tiden_core::surface::{Node, PathData, PathSeg};
use tiden_core::{Attr, AttrKey, ElementKind, NodeId, SceneSurface, Surface};

use crate::text::{Anchor, TextShaper};
use crate::theme::Theme;

const X_AXIS: &str = "axis--x";
const Y_AXIS: &str = "axis--y";

#[derive(Clone, Copy, Debug)]
pub struct RasterOptions {
    pub theme: Theme,
    /// Device pixel ratio applied to the whole scene.
    pub scale: f32,
    /// Outline the hit cells (normally invisible).
    pub show_cells: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { theme: Theme::light(), scale: 1.0, show_cells: false }
    }
}

/// Styling context inherited down the tree.
#[derive(Clone, Copy, Debug, Default)]
struct Ctx {
    x_axis: bool,
    y_axis: bool,
    focus: bool,
    cells: bool,
}

impl Ctx {
    fn enter(mut self, node: &Node) -> Self {
        self.x_axis |= node.has_class(X_AXIS);
        self.y_axis |= node.has_class(Y_AXIS);
        self.focus |= node.has_class(class::FOCUS);
        self.cells |= node.has_class(class::VORONOI);
        self
    }
}

pub struct Rasterizer {
    shaper: TextShaper,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self { shaper: TextShaper::new() }
    }

    /// Render `scene` to encoded PNG bytes at its current outer size.
    pub fn render_png_bytes(&self, scene: &SceneSurface, opts: &RasterOptions) -> Result<Vec<u8>> {
        let root = scene.root();
        let node = scene.node(root).ok_or_else(|| anyhow::anyhow!("scene has no root"))?;
        let (w, h) = (node.num(AttrKey::Width).unwrap_or(0.0), node.num(AttrKey::Height).unwrap_or(0.0));
        if !(w >= 1.0 && h >= 1.0) {
            anyhow::bail!("scene has no drawable size ({w}x{h}); lay it out first");
        }
        let px = |v: f64| ((v * opts.scale as f64).ceil() as i32).max(1);

        let mut surface = skia::surfaces::raster_n32_premul((px(w), px(h)))
            .ok_or_else(|| anyhow::anyhow!("failed to create raster surface"))?;
        let canvas = surface.canvas();
        canvas.clear(opts.theme.background);
        canvas.scale((opts.scale, opts.scale));
        self.draw_node(canvas, scene, root, Ctx::default(), opts);

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        tracing::debug!(width = px(w), height = px(h), bytes = data.len(), "rasterized scene");
        Ok(data.as_bytes().to_vec())
    }

    pub fn render_png(&self, scene: &SceneSurface, opts: &RasterOptions, path: impl AsRef<std::path::Path>) -> Result<()> {
        let bytes = self.render_png_bytes(scene, opts)?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn draw_node(&self, canvas: &skia::Canvas, scene: &SceneSurface, id: NodeId, ctx: Ctx, opts: &RasterOptions) {
        let Some(node) = scene.node(id) else { return };
        if node.is_hidden() {
            return;
        }
        let ctx = ctx.enter(node);
        if ctx.cells && !opts.show_cells {
            return;
        }

        let (tx, ty) = node.translate();
        canvas.save();
        canvas.translate((tx as f32, ty as f32));
        match node.kind {
            ElementKind::Svg | ElementKind::Group => {}
            ElementKind::Path => self.draw_path(canvas, node, ctx, &opts.theme),
            ElementKind::Line => draw_segment(canvas, node, &opts.theme),
            ElementKind::Circle => draw_marker(canvas, node, &opts.theme),
            ElementKind::Text => self.draw_text(canvas, scene, node, ctx, &opts.theme),
        }
        for child in scene.children(id) {
            self.draw_node(canvas, scene, *child, ctx, opts);
        }
        canvas.restore();
    }

    fn draw_path(&self, canvas: &skia::Canvas, node: &Node, ctx: Ctx, theme: &Theme) {
        let Some(Attr::Path(d)) = node.attr(AttrKey::Path) else { return };
        if d.is_empty() {
            return;
        }
        let mut paint = stroke(theme.tick, 1.0);
        if node.has_class(class::LINE) {
            let active = node.has_class(class::ACTIVE);
            paint = stroke(if active { theme.line_active } else { theme.line }, if active { 2.5 } else { 1.5 });
            if let Some(Attr::StrokeDashArray(on, off)) = node.attr(AttrKey::StrokeDashArray) {
                let phase = node.num(AttrKey::StrokeDashOffset).unwrap_or(0.0);
                paint.set_path_effect(skia::PathEffect::dash(&[*on as f32, *off as f32], phase as f32));
            }
        } else if node.has_class(class::DOMAIN) {
            paint = stroke(theme.axis_line, 1.0);
        } else if ctx.cells {
            paint = stroke(theme.cell_debug, 1.0);
        }
        canvas.draw_path(&to_skia_path(d), &paint);
    }

    fn draw_text(&self, canvas: &skia::Canvas, scene: &SceneSurface, node: &Node, ctx: Ctx, theme: &Theme) {
        let Some(Attr::Text(text)) = node.attr(AttrKey::Text) else { return };
        if text.is_empty() {
            return;
        }
        let size = scene.font_size() as f32;
        let x = node.num(AttrKey::X).unwrap_or(0.0) as f32;
        let y = node.num(AttrKey::Y).unwrap_or(0.0) as f32 + node.num(AttrKey::Dy).unwrap_or(0.0) as f32 * size;

        let is_axis_label = node.has_class(class::AXIS_LABEL);
        let anchor = match (is_axis_label, ctx.x_axis, ctx.y_axis) {
            (true, _, _) => Anchor::Start,
            (false, true, _) => Anchor::Middle,
            (false, _, true) => Anchor::End,
            _ => Anchor::Start,
        };

        let paint = if node.has_class(class::SHADOW) {
            let mut p = stroke(theme.shadow, 3.0);
            p.set_stroke_join(skia::paint::Join::Round);
            p
        } else {
            let mut p = skia::Paint::default();
            p.set_anti_alias(true);
            p.set_color(if ctx.focus { theme.focus_label } else { theme.axis_label });
            p
        };
        self.shaper.draw(canvas, text, x, y, size, anchor, &paint);
    }
}

fn stroke(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn draw_segment(canvas: &skia::Canvas, node: &Node, theme: &Theme) {
    let v = |k| node.num(k).unwrap_or(0.0) as f32;
    let (a, b) = ((v(AttrKey::X1), v(AttrKey::Y1)), (v(AttrKey::X2), v(AttrKey::Y2)));
    let paint = if node.has_class(class::GUIDELINE) {
        let mut p = stroke(theme.guideline, 1.0);
        p.set_path_effect(skia::PathEffect::dash(&[3.0, 3.0], 0.0));
        p
    } else {
        stroke(theme.tick, 1.0)
    };
    canvas.draw_line(a, b, &paint);
}

fn draw_marker(canvas: &skia::Canvas, node: &Node, theme: &Theme) {
    let r = node.num(AttrKey::Radius).unwrap_or(0.0) as f32;
    if r <= 0.0 {
        return;
    }
    canvas.draw_circle((0.0, 0.0), r, &stroke(theme.focus, 1.5));
}

fn to_skia_path(d: &PathData) -> skia::Path {
    let pt = |p: tiden_core::ScreenPoint| (p.x as f32, p.y as f32);
    let mut path = skia::Path::new();
    for seg in &d.segs {
        match *seg {
            PathSeg::MoveTo(p) => {
                path.move_to(pt(p));
            }
            PathSeg::LineTo(p) => {
                path.line_to(pt(p));
            }
            PathSeg::CubicTo(c1, c2, p) => {
                path.cubic_to(pt(c1), pt(c2), pt(p));
            }
            PathSeg::Close => {
                path.close();
            }
        }
    }
    path
}
