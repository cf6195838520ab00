use std::path::Path;

use pairframe::render::text::render_text;
use pairframe::text::layout::TextLayoutEngine;
use pairframe::{
    Compositor, FaceStyle, FontBook, FrameInputs, FrameRGBA, FrameScale, FrameSurface, Point,
    RenderTarget, SourceImage, TextOptions, TextPosition,
};

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A book with one system sans face, or `None` when the host has none.
fn system_fonts() -> Option<FontBook> {
    let path = FONT_CANDIDATES.iter().map(Path::new).find(|p| p.is_file())?;
    let mut book = FontBook::new();
    book.register_file("sans-serif", FaceStyle::Regular, path).ok()?;
    Some(book)
}

fn white(w: u32, h: u32) -> SourceImage {
    SourceImage::from_rgba8(w, h, [255u8; 4].repeat((w * h) as usize)).unwrap()
}

fn is_dark(p: [u8; 4]) -> bool {
    p[0] < 80 && p[1] < 80 && p[2] < 80
}

fn dark_bounds(frame: &FrameRGBA) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..frame.height {
        for x in 0..frame.width {
            if is_dark(frame.pixel(x, y).unwrap()) {
                let b = bounds.get_or_insert((x, y, x, y));
                b.0 = b.0.min(x);
                b.1 = b.1.min(y);
                b.2 = b.2.max(x);
                b.3 = b.3.max(y);
            }
        }
    }
    bounds
}

fn draw_caption(fonts: &FontBook, opts: &TextOptions, scale: f64) -> (FrameRGBA, Point, f64) {
    let mut surface = FrameSurface::new(FrameScale::new(scale).unwrap()).unwrap();
    let bg = white(4, 4);
    let mut compositor = Compositor::new(fonts.clone());
    compositor
        .compose_into(&mut surface, &FrameInputs::new(&bg, &bg))
        .unwrap();
    let placed = render_text(&mut surface, fonts, &mut TextLayoutEngine::new(), opts)
        .unwrap()
        .unwrap();
    (surface.finish(), placed.origin, placed.width)
}

#[test]
fn top_left_caption_sits_on_its_baseline() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let opts = TextOptions::caption("Jane Doe");
    let (frame, origin, width) = draw_caption(&fonts, &opts, 1.0);

    assert_eq!(origin, Point::new(20.0, 56.0));
    assert!(width > 0.0);

    let (x0, y0, x1, y1) = dark_bounds(&frame).unwrap();
    assert!(x0 >= 12 && f64::from(x1) <= 20.0 + width + 2.0);
    // Cap height sits above the baseline; only the tail of the "J" may dip below it.
    assert!(y0 < 56 && y0 > 20);
    assert!(y1 <= 68);
}

#[test]
fn bottom_right_caption_keeps_its_margin() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let opts = TextOptions {
        position: TextPosition::BottomRight,
        ..TextOptions::caption("BOTTOM RIGHT")
    };
    let scale = 0.5;
    let (frame, origin, width) = draw_caption(&fonts, &opts, scale);

    assert!((960.0 - (origin.x + width) - 10.0).abs() < 1e-6);
    assert!((origin.y - 530.0).abs() < 1e-9);

    let (x0, _, x1, y1) = dark_bounds(&frame).unwrap();
    assert!(f64::from(x0) >= origin.x - 1.0);
    assert!(x1 <= 951 && y1 <= 531);
}

#[test]
fn outline_is_drawn_under_the_fill() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let opts = TextOptions {
        size: 120.0,
        stroke: true,
        stroke_color: "#FF0000".into(),
        stroke_width: 4.0,
        ..TextOptions::caption("HI")
    };
    let (frame, _, _) = draw_caption(&fonts, &opts, 1.0);

    let mut black = 0;
    let mut red = 0;
    for y in 0..200 {
        for x in 0..400 {
            let p = frame.pixel(x, y).unwrap();
            if p[0] < 30 && p[1] < 30 && p[2] < 30 {
                black += 1;
            }
            if p[0] > 200 && p[1] < 60 && p[2] < 60 {
                red += 1;
            }
        }
    }
    assert!(black > 100, "fill hidden by outline ({black} black px)");
    assert!(red > 50, "outline missing ({red} red px)");
}

#[test]
fn caption_scales_with_the_frame() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let opts = TextOptions {
        position: TextPosition::TopRight,
        ..TextOptions::caption("Scaled")
    };
    let (_, full_origin, full_width) = draw_caption(&fonts, &opts, 1.0);
    let (_, half_origin, half_width) = draw_caption(&fonts, &opts, 0.5);

    assert!((half_width - full_width * 0.5).abs() < 2.0);
    assert!((half_origin.x - full_origin.x * 0.5).abs() < 2.0);
    assert!((half_origin.y - full_origin.y * 0.5).abs() < 1e-9);
}

#[test]
fn compositor_draws_caption_last() {
    let Some(fonts) = system_fonts() else {
        eprintln!("no system font found; skipping");
        return;
    };
    let photo = SourceImage::from_rgba8(2, 2, [0, 0, 255, 255].repeat(4)).unwrap();
    let caption = TextOptions {
        color: "#FFFF00".into(),
        ..TextOptions::caption("Over the photo")
    };
    let frame = Compositor::new(fonts)
        .render(
            &FrameInputs::new(&photo, &photo).with_text(&caption),
            RenderTarget::Export,
        )
        .unwrap();

    let yellow = (20..600)
        .flat_map(|x| (20..60).map(move |y| (x, y)))
        .filter(|&(x, y)| {
            let p = frame.pixel(x, y).unwrap();
            p[0] > 200 && p[1] > 200 && p[2] < 60
        })
        .count();
    assert!(yellow > 50);
}
