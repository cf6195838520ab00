use crate::foundation::color::parse_hex;
use crate::foundation::core::{Point, Size};
use crate::foundation::error::{PairframeError, PairframeResult};
use crate::model::{TextOptions, TextPosition};
use crate::render::surface::FrameSurface;
use crate::text::fonts::FontBook;
use crate::text::layout::{ShapedLine, TextLayoutEngine};

/// Where a caption was drawn, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPlacement {
    /// Left end of the baseline.
    pub origin: Point,
    pub width: f64,
    pub font_size: f64,
}

/// Baseline origin for a single-line caption.
///
/// Top anchors put the baseline `font_size + margin` below the top edge; bottom anchors put it
/// `margin` above the bottom edge. Right anchors end the advance `margin` from the right edge.
pub fn text_origin(
    position: TextPosition,
    text_width: f64,
    surface: Size,
    font_size: f64,
    margin: f64,
) -> Point {
    let x = if position.is_right() {
        surface.width - text_width - margin
    } else {
        margin
    };
    let y = if position.is_bottom() {
        surface.height - margin
    } else {
        font_size + margin
    };
    Point::new(x, y)
}

/// Draw the caption described by `opts` onto `surface`.
///
/// Disabled or empty captions draw nothing and return `Ok(None)`. The outline, when enabled, is
/// stroked before the fill so the fill stays fully visible.
pub fn render_text(
    surface: &mut FrameSurface,
    fonts: &FontBook,
    engine: &mut TextLayoutEngine,
    opts: &TextOptions,
) -> PairframeResult<Option<TextPlacement>> {
    if !opts.is_drawable() {
        return Ok(None);
    }

    let scale = surface.scale();
    let font_size = opts.size * scale.get();
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(PairframeError::validation(format!(
            "text size must be finite and > 0, got {}",
            opts.size
        )));
    }
    let fill = parse_hex(&opts.color)?;
    let stroke = if opts.stroke {
        let width = opts.stroke_width * scale.get();
        if !width.is_finite() || width <= 0.0 {
            return Err(PairframeError::validation(format!(
                "stroke width must be finite and > 0, got {}",
                opts.stroke_width
            )));
        }
        Some((parse_hex(&opts.stroke_color)?, width))
    } else {
        None
    };

    let face = fonts.resolve(&opts.font, opts.bold, opts.italic)?;
    let shaped = engine.shape_line(&opts.text, &face, font_size as f32)?;
    let origin = text_origin(
        opts.position,
        shaped.width,
        surface.logical_size(),
        font_size,
        scale.margin(),
    );
    tracing::debug!(
        font = %opts.font_descriptor(scale.get()),
        x = origin.x,
        y = origin.y,
        width = shaped.width,
        "place caption"
    );

    let ctx = &mut surface.ctx;
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        origin.x,
        origin.y - shaped.baseline,
    )));

    if let Some((color, width)) = stroke {
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.set_paint(color.to_cpu_color());
        draw_runs(ctx, &shaped, GlyphPass::Stroke);
    }
    ctx.set_paint(fill.to_cpu_color());
    draw_runs(ctx, &shaped, GlyphPass::Fill);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

    Ok(Some(TextPlacement {
        origin,
        width: shaped.width,
        font_size,
    }))
}

#[derive(Clone, Copy)]
enum GlyphPass {
    Stroke,
    Fill,
}

fn draw_runs(ctx: &mut vello_cpu::RenderContext, shaped: &ShapedLine, pass: GlyphPass) {
    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx
                .glyph_run(&shaped.font)
                .font_size(run.run().font_size());
            match pass {
                GlyphPass::Stroke => builder.stroke_glyphs(glyphs),
                GlyphPass::Fill => builder.fill_glyphs(glyphs),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Size = Size::new(1920.0, 1080.0);

    #[test]
    fn anchors_follow_corner_rules() {
        let w = 300.0;
        assert_eq!(
            text_origin(TextPosition::TopLeft, w, FRAME, 36.0, 20.0),
            Point::new(20.0, 56.0)
        );
        assert_eq!(
            text_origin(TextPosition::TopRight, w, FRAME, 36.0, 20.0),
            Point::new(1600.0, 56.0)
        );
        assert_eq!(
            text_origin(TextPosition::BottomLeft, w, FRAME, 36.0, 20.0),
            Point::new(20.0, 1060.0)
        );
        assert_eq!(
            text_origin(TextPosition::BottomRight, w, FRAME, 36.0, 20.0),
            Point::new(1600.0, 1060.0)
        );
    }

    #[test]
    fn bottom_right_keeps_margin_for_any_width_and_scale() {
        for s in [0.15625, 0.5, 1.0, 2.0] {
            let surface = Size::new(1920.0 * s, 1080.0 * s);
            for w in [0.0, 17.5, 640.0, 2500.0] {
                let o = text_origin(TextPosition::BottomRight, w, surface, 36.0 * s, 20.0 * s);
                assert!((surface.width - (o.x + w) - 20.0 * s).abs() < 1e-9);
                assert!((surface.height - o.y - 20.0 * s).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn anchors_scale_linearly() {
        let s = 0.25;
        let full = text_origin(TextPosition::TopRight, 400.0, FRAME, 48.0, 20.0);
        let small = text_origin(
            TextPosition::TopRight,
            400.0 * s,
            Size::new(1920.0 * s, 1080.0 * s),
            48.0 * s,
            20.0 * s,
        );
        assert!((full.x * s - small.x).abs() < 1e-9);
        assert!((full.y * s - small.y).abs() < 1e-9);
    }
}
