use std::io::Cursor;

use image::{ImageFormat, RgbImage, RgbaImage};

use crate::foundation::error::{PairframeError, PairframeResult};
use crate::render::surface::FrameRGBA;

/// JPEG quality used for exported composites.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded image container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg(u8), // quality 1-100
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg(DEFAULT_JPEG_QUALITY)
    }
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg(_) => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn encode(frame: &FrameRGBA, format: OutputFormat) -> PairframeResult<Vec<u8>> {
    match format {
        OutputFormat::Jpeg(quality) => encode_jpeg(frame, quality),
        OutputFormat::Png => encode_png(frame),
    }
}

/// Lossy JPEG, flattened over white.
pub fn encode_jpeg(frame: &FrameRGBA, quality: u8) -> PairframeResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(PairframeError::validation(format!(
            "jpeg quality must be in 1..=100, got {quality}"
        )));
    }
    check_len(frame)?;

    let rgb = RgbImage::from_raw(frame.width, frame.height, frame.to_rgb8_over_white())
        .ok_or_else(|| PairframeError::encode("failed to create RGB image"))?;

    let mut buffer = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| PairframeError::encode(format!("JPEG: {e}")))?;
    Ok(buffer)
}

/// Lossless PNG with straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> PairframeResult<Vec<u8>> {
    check_len(frame)?;

    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_in_place(&mut rgba);
    }
    let img = RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| PairframeError::encode("failed to create RGBA image"))?;

    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| PairframeError::encode(format!("PNG: {e}")))?;
    Ok(buffer)
}

fn check_len(frame: &FrameRGBA) -> PairframeResult<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.width == 0 || frame.height == 0 || frame.data.len() != expected {
        return Err(PairframeError::encode(format!(
            "frame buffer of {} bytes does not match {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    Ok(())
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}
