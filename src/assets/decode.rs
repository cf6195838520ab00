use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::foundation::core::MAX_SURFACE_SIDE;
use crate::foundation::error::{PairframeError, PairframeResult};

/// Decoded source photo, ready to be painted.
///
/// Width and height are always non-zero; construction rejects anything the placer could not
/// cover-fit.
#[derive(Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl SourceImage {
    /// Decode an encoded image (any format enabled in `image`), honoring EXIF orientation.
    pub fn decode(bytes: &[u8]) -> PairframeResult<Self> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .context("sniff image format")?
            .into_decoder()
            .map_err(|e| PairframeError::decode(e.to_string()))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| PairframeError::decode(e.to_string()))?;
        let mut dyn_img = DynamicImage::from_decoder(decoder)
            .map_err(|e| PairframeError::decode(e.to_string()))?;
        dyn_img.apply_orientation(orientation);

        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> PairframeResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
        Self::decode(&bytes)
    }

    /// Build from straight-alpha RGBA8, row-major, tightly packed.
    pub fn from_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> PairframeResult<Self> {
        if width == 0 || height == 0 {
            return Err(PairframeError::validation(format!(
                "source image must have non-zero dimensions, got {width}x{height}"
            )));
        }
        if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
            return Err(PairframeError::validation(format!(
                "source image {width}x{height} exceeds {MAX_SURFACE_SIDE}px per side"
            )));
        }
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(PairframeError::validation(
                "source image byte length does not match dimensions",
            ));
        }

        premultiply_rgba8_in_place(&mut rgba8);
        let pixmap = premul_bytes_to_pixmap(&rgba8, width as u16, height as u16);
        Ok(Self {
            width,
            height,
            pixmap: Arc::new(pixmap),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height`.
    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

/// Opaque reference to a source photo.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

impl ImageSource {
    pub fn load(&self) -> PairframeResult<SourceImage> {
        match self {
            ImageSource::Path(p) => SourceImage::open(p),
            ImageSource::Bytes(b) => SourceImage::decode(b),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        ImageSource::Path(p)
    }
}

impl From<&Path> for ImageSource {
    fn from(p: &Path) -> Self {
        ImageSource::Path(p.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(b: Vec<u8>) -> Self {
        ImageSource::Bytes(b.into())
    }
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn premul_bytes_to_pixmap(rgba8_premul: &[u8], width: u16, height: u16) -> vello_cpu::Pixmap {
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, width, height, may_have_opacities)
}
