use crate::foundation::core::{FrameScale, MAX_SURFACE_SIDE, Rgba8Premul, Size};
use crate::foundation::error::{PairframeError, PairframeResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames come out of the compositor premultiplied; since the base layer is opaque white every
/// pixel has `a == 255` and premultiplied equals straight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha RGB flattened over white.
    pub fn to_rgb8_over_white(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            let bg = 255 - a;
            if self.premultiplied {
                out.extend([
                    px[0].saturating_add(bg),
                    px[1].saturating_add(bg),
                    px[2].saturating_add(bg),
                ]);
            } else {
                let blend = |c: u8| -> u8 {
                    ((u16::from(c) * u16::from(a) + 255 * u16::from(bg) + 127) / 255) as u8
                };
                out.extend([blend(px[0]), blend(px[1]), blend(px[2])]);
            }
        }
        out
    }
}

/// Destination surface for one compose call, sized `1920·s × 1080·s`.
///
/// Geometry is laid out against [`FrameSurface::logical_size`]; the pixel size is that extent
/// rounded to whole pixels.
pub struct FrameSurface {
    scale: FrameScale,
    width: u16,
    height: u16,
    pub(crate) ctx: vello_cpu::RenderContext,
}

impl FrameSurface {
    /// Allocate a surface; fails when `scale` yields no pixels or exceeds rasterizer limits.
    pub fn new(scale: FrameScale) -> PairframeResult<Self> {
        let logical = scale.logical_size();
        let width = pixel_extent(logical.width, "width")?;
        let height = pixel_extent(logical.height, "height")?;
        tracing::debug!(scale = scale.get(), width, height, "allocate frame surface");
        Ok(Self {
            scale,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    pub fn scale(&self) -> FrameScale {
        self.scale
    }

    pub fn logical_size(&self) -> Size {
        self.scale.logical_size()
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    /// Paint the whole surface with one opaque color.
    pub(crate) fn fill(&mut self, color: Rgba8Premul) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    /// Rasterize everything drawn so far and read the pixels back.
    pub fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

fn pixel_extent(logical: f64, axis: &str) -> PairframeResult<u16> {
    let px = logical.round();
    if px < 1.0 {
        return Err(PairframeError::surface(format!(
            "surface {axis} rounds to zero pixels ({logical})"
        )));
    }
    if px > f64::from(MAX_SURFACE_SIDE) {
        return Err(PairframeError::surface(format!(
            "surface {axis} {px} exceeds {MAX_SURFACE_SIDE}px"
        )));
    }
    Ok(px as u16)
}
