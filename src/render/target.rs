use crate::foundation::core::{BASE_WIDTH, FrameScale};
use crate::foundation::error::PairframeResult;

/// Width of a results-grid thumbnail in pixels.
pub const THUMBNAIL_WIDTH: u32 = 300;

/// Output resolutions the compositor is asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RenderTarget {
    /// Full 1920×1080 export.
    #[default]
    Export,
    /// Results-grid thumbnail, 300 pixels wide.
    Thumbnail,
    /// Live preview scaled to a display width.
    Preview { width_px: u32 },
    /// Explicit scale factor.
    Scaled { scale: f64 },
}

impl RenderTarget {
    pub fn scale(self) -> PairframeResult<FrameScale> {
        match self {
            RenderTarget::Export => Ok(FrameScale::FULL),
            RenderTarget::Thumbnail => FrameScale::new(f64::from(THUMBNAIL_WIDTH) / BASE_WIDTH),
            RenderTarget::Preview { width_px } => FrameScale::new(f64::from(width_px) / BASE_WIDTH),
            RenderTarget::Scaled { scale } => FrameScale::new(scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::FrameSurface;

    #[test]
    fn targets_map_to_scales() {
        assert_eq!(RenderTarget::Export.scale().unwrap().get(), 1.0);
        assert_eq!(RenderTarget::Thumbnail.scale().unwrap().get(), 0.15625);
        assert_eq!(
            RenderTarget::Preview { width_px: 960 }.scale().unwrap().get(),
            0.5
        );
        assert!(RenderTarget::Preview { width_px: 0 }.scale().is_err());
        assert!(RenderTarget::Scaled { scale: -1.0 }.scale().is_err());
    }

    #[test]
    fn thumbnail_surface_is_300_wide() {
        let s = FrameSurface::new(RenderTarget::Thumbnail.scale().unwrap()).unwrap();
        assert_eq!(s.pixel_size(), (300, 169));
    }

    #[test]
    fn targets_deserialize_from_tagged_json() {
        let t: RenderTarget = serde_json::from_str(r#"{"kind":"preview","width_px":640}"#).unwrap();
        assert_eq!(t, RenderTarget::Preview { width_px: 640 });
        let t: RenderTarget = serde_json::from_str(r#"{"kind":"thumbnail"}"#).unwrap();
        assert_eq!(t, RenderTarget::Thumbnail);
    }
}
