use pairframe::{
    Compositor, FrameInputs, FrameRGBA, ImageTransform, PairTransforms, RenderTarget,
    SourceImage, Vec2,
};

fn solid(w: u32, h: u32, rgb: [u8; 3]) -> SourceImage {
    SourceImage::from_rgba8(w, h, [rgb[0], rgb[1], rgb[2], 255].repeat((w * h) as usize))
        .unwrap()
}

fn near(a: [u8; 4], b: [u8; 3], tol: u8) -> bool {
    (0..3).all(|i| a[i].abs_diff(b[i]) <= tol)
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    frame.pixel(x, y).unwrap()
}

#[test]
fn two_landscape_photos_fill_an_export_frame() {
    let red = solid(800, 600, [220, 30, 30]);
    let green = solid(800, 600, [30, 200, 60]);

    let frame = Compositor::default()
        .render(&FrameInputs::new(&red, &green), RenderTarget::Export)
        .unwrap();

    assert_eq!((frame.width, frame.height), (1920, 1080));
    for (x, y) in [(0, 0), (480, 540), (955, 1079)] {
        assert!(near(px(&frame, x, y), [220, 30, 30], 2), "left at ({x},{y})");
    }
    for (x, y) in [(965, 0), (1440, 540), (1919, 1079)] {
        assert!(near(px(&frame, x, y), [30, 200, 60], 2), "right at ({x},{y})");
    }
    // Cover fit leaves no background showing.
    assert!(frame.data.chunks_exact(4).all(|p| p[3] == 255));
}

#[test]
fn thumbnail_matches_downscaled_export() {
    let left = solid(640, 480, [255, 0, 0]);
    let right = solid(480, 640, [0, 0, 255]);
    let transforms = PairTransforms {
        left: Some(ImageTransform {
            scale: 0.6,
            rotation: 0.0,
            position: Vec2::new(-200.0, 0.0),
        }),
        right: Some(ImageTransform {
            scale: 0.5,
            rotation: 0.0,
            position: Vec2::new(0.0, 300.0),
        }),
    };
    let inputs = FrameInputs::new(&left, &right).with_transforms(transforms);
    let mut compositor = Compositor::default();
    let full = compositor.render(&inputs, RenderTarget::Export).unwrap();
    let thumb = compositor.render(&inputs, RenderTarget::Thumbnail).unwrap();
    assert_eq!((thumb.width, thumb.height), (300, 169));

    // Sample away from edges: the same logical point shows the same content at both scales.
    let s = 300.0 / 1920.0;
    for (lx, ly) in [
        (100.0, 540.0),
        (300.0, 540.0),
        (700.0, 540.0),
        (480.0, 100.0),
        (1440.0, 500.0),
        (1440.0, 900.0),
        (1100.0, 900.0),
    ] {
        let a = px(&full, lx as u32, ly as u32);
        let b = px(&thumb, (lx * s) as u32, (ly * s) as u32);
        assert!(near(b, [a[0], a[1], a[2]], 8), "({lx},{ly}): {a:?} vs {b:?}");
    }
}

#[test]
fn rotated_image_keeps_its_center() {
    let blue = solid(800, 600, [0, 0, 255]);
    let transforms = PairTransforms {
        left: Some(ImageTransform {
            scale: 0.3,
            rotation: 45.0,
            position: Vec2::ZERO,
        }),
        right: None,
    };
    let frame = Compositor::default()
        .render(
            &FrameInputs::new(&blue, &blue).with_transforms(transforms),
            RenderTarget::Preview { width_px: 960 },
        )
        .unwrap();

    assert_eq!((frame.width, frame.height), (960, 540));
    assert!(near(px(&frame, 240, 270), [0, 0, 255], 2));
    // Corners of the shrunken, rotated image no longer reach the region corners.
    assert!(near(px(&frame, 2, 2), [255, 255, 255], 2));
    assert!(near(px(&frame, 477, 537), [255, 255, 255], 2));
    assert!(near(px(&frame, 700, 10), [0, 0, 255], 2));
}

#[test]
fn decoded_photos_compose_like_raw_pixels() {
    let mut png = Vec::new();
    image::RgbaImage::from_pixel(40, 30, image::Rgba([12, 34, 56, 255]))
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .unwrap();
    let decoded = SourceImage::decode(&png).unwrap();
    let raw = solid(40, 30, [12, 34, 56]);

    let mut c = Compositor::default();
    let target = RenderTarget::Scaled { scale: 0.2 };
    let a = c.render(&FrameInputs::new(&decoded, &raw), target).unwrap();
    let b = c.render(&FrameInputs::new(&raw, &decoded), target).unwrap();
    assert_eq!(a, b);
}
