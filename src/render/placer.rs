//! Transform-aware image placement into one half of the frame.
//!
//! The source is cover-fitted to its region, centered, then adjusted by the caller's transform
//! about the region center in the order rotate, scale, translate. Overflow is clipped to the
//! region.

use vello_cpu::kurbo::Shape;

use crate::assets::decode::SourceImage;
use crate::foundation::core::{Affine, Region, Size, Vec2};
use crate::foundation::error::{PairframeError, PairframeResult};
use crate::model::ImageTransform;
use crate::render::surface::FrameSurface;

/// Where and how large a source lands on the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Cover-fitted size before the caller's transform.
    pub draw_size: Size,
    /// Maps source pixel coordinates to surface coordinates.
    pub transform: Affine,
}

/// Size that covers `region` while keeping the image's aspect ratio.
///
/// Relatively wider images take the full region height and overflow horizontally; all others
/// take the full width and overflow vertically.
pub fn cover_fit(image: Size, region: Size) -> PairframeResult<Size> {
    if !(image.width > 0.0 && image.height > 0.0) || !image.is_finite() {
        return Err(PairframeError::validation(format!(
            "cannot cover-fit a {}x{} image",
            image.width, image.height
        )));
    }
    if !(region.width > 0.0 && region.height > 0.0) || !region.is_finite() {
        return Err(PairframeError::validation(format!(
            "cannot cover-fit into a {}x{} region",
            region.width, region.height
        )));
    }

    let img_ratio = image.width / image.height;
    let target_ratio = region.width / region.height;
    Ok(if img_ratio > target_ratio {
        Size::new(region.height * img_ratio, region.height)
    } else {
        Size::new(region.width, region.width / img_ratio)
    })
}

/// Compute the placement of an `image`-sized source in `region`.
///
/// `frame_scale` converts the transform's translation from logical (scale 1) pixels to surface
/// pixels; rotation and the transform's own scale are dimensionless. `None` places the image
/// with [`ImageTransform::IDENTITY`].
pub fn plan_placement(
    image: Size,
    region: Region,
    transform: Option<&ImageTransform>,
    frame_scale: f64,
) -> PairframeResult<Placement> {
    let draw = cover_fit(image, Size::new(region.width, region.height))?;
    let t = transform.copied().unwrap_or(ImageTransform::IDENTITY);

    let local = Affine::translate(region.center().to_vec2())
        * Affine::rotate(t.rotation.to_radians())
        * Affine::scale(t.scale)
        * Affine::translate(t.position * frame_scale);
    let fitted = Affine::translate(Vec2::new(-draw.width / 2.0, -draw.height / 2.0))
        * Affine::scale_non_uniform(draw.width / image.width, draw.height / image.height);

    Ok(Placement {
        draw_size: draw,
        transform: local * fitted,
    })
}

/// Draw `image` into `region` of `surface`.
///
/// Returns `Ok(None)` when the transform produced a non-finite matrix; that side is left
/// showing the background.
pub fn place(
    surface: &mut FrameSurface,
    image: &SourceImage,
    region: Region,
    transform: Option<&ImageTransform>,
) -> PairframeResult<Option<Placement>> {
    let image_size = Size::new(f64::from(image.width()), f64::from(image.height()));
    let placement = plan_placement(image_size, region, transform, surface.scale().get())?;

    if !placement.transform.is_finite() {
        tracing::warn!(?transform, "non-finite placement transform; skipping draw");
        return Ok(None);
    }
    tracing::debug!(
        region_x = region.x,
        draw_w = placement.draw_size.width,
        draw_h = placement.draw_size.height,
        "place image"
    );

    let ctx = &mut surface.ctx;
    let r = region.rect();
    let clip = vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1).to_path(0.1);

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.push_clip_layer(&clip);

    ctx.set_transform(affine_to_cpu(placement.transform));
    ctx.set_paint(image.paint());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        image_size.width,
        image_size.height,
    ));

    ctx.pop_layer();
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(Some(placement))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}
