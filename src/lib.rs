//! Pairframe composes two photos side by side into a fixed 16:9 frame.
//!
//! Each photo fills its half of a 1920×1080 logical canvas (cover fit), can be scaled,
//! rotated, and dragged within that half, and an optional caption is anchored to a corner.
//! The same layout renders at any scale, so previews, thumbnails, and exports agree.
//!
//! - Decode photos into [`SourceImage`]s
//! - Compose them with a [`Compositor`] at a [`RenderTarget`]
//! - Encode with [`encode_jpeg`] or run many jobs through [`export_batch`]
#![forbid(unsafe_code)]

mod foundation;

/// Photo decoding.
pub mod assets;
/// Encoding and batch export.
pub mod export;
/// Job, transform, and caption model.
pub mod model;
/// Frame compositing.
pub mod render;
/// Caption fonts and shaping.
pub mod text;

pub use crate::foundation::color::{Rgba8, parse_hex};
pub use crate::foundation::core::{
    Affine, BASE_HEIGHT, BASE_WIDTH, FrameScale, Point, Rect, Region, Rgba8Premul, Side, Size,
    TEXT_MARGIN, Vec2,
};
pub use crate::foundation::error::{PairframeError, PairframeResult};

pub use crate::assets::decode::{ImageSource, SourceImage};
pub use crate::export::batch::{
    ExportOpts, ExportedImage, export_batch, export_file_name, export_pair, write_exports,
};
pub use crate::export::encode::{
    DEFAULT_JPEG_QUALITY, OutputFormat, encode, encode_jpeg, encode_png,
};
pub use crate::model::{
    ImageTransform, PairJob, PairTransforms, TextOptions, TextPosition, load_jobs_json,
    parse_jobs_json,
};
pub use crate::render::composer::{Compositor, FrameInputs};
pub use crate::render::coordinator::{RenderCoordinator, RenderOutcome, RenderTicket};
pub use crate::render::placer::{Placement, cover_fit, plan_placement};
pub use crate::render::surface::{FrameRGBA, FrameSurface};
pub use crate::render::target::{RenderTarget, THUMBNAIL_WIDTH};
pub use crate::render::text::{TextPlacement, text_origin};
pub use crate::text::fonts::{FaceStyle, FontBook, ResolvedFace};
