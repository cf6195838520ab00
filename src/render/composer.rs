use crate::assets::decode::SourceImage;
use crate::foundation::core::{FrameScale, Rgba8Premul, Side};
use crate::foundation::error::PairframeResult;
use crate::model::{PairTransforms, TextOptions};
use crate::render::placer::place;
use crate::render::surface::{FrameRGBA, FrameSurface};
use crate::render::target::RenderTarget;
use crate::render::text::render_text;
use crate::text::fonts::FontBook;
use crate::text::layout::TextLayoutEngine;

/// Everything one frame is composed from.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    pub left: &'a SourceImage,
    pub right: &'a SourceImage,
    pub transforms: PairTransforms,
    pub text: Option<&'a TextOptions>,
}

impl<'a> FrameInputs<'a> {
    pub fn new(left: &'a SourceImage, right: &'a SourceImage) -> Self {
        Self {
            left,
            right,
            transforms: PairTransforms::default(),
            text: None,
        }
    }

    pub fn with_transforms(mut self, transforms: PairTransforms) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn with_text(mut self, text: &'a TextOptions) -> Self {
        self.text = Some(text);
        self
    }

    fn image(&self, side: Side) -> &'a SourceImage {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Composes photo pairs into frames.
///
/// Holds the caption fonts and the shaping caches; composing is deterministic, so the same
/// inputs always produce the same pixels. Not `Sync`: parallel callers use one per worker.
pub struct Compositor {
    fonts: FontBook,
    text_engine: TextLayoutEngine,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(FontBook::default())
    }
}

impl Compositor {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            text_engine: TextLayoutEngine::new(),
        }
    }

    /// Paint a full frame onto `surface`: white base, left half, right half, caption.
    ///
    /// Nothing is read back; call [`FrameSurface::finish`] afterwards.
    pub fn compose_into(
        &mut self,
        surface: &mut FrameSurface,
        inputs: &FrameInputs<'_>,
    ) -> PairframeResult<()> {
        surface.fill(Rgba8Premul::WHITE);

        let scale = surface.scale();
        for side in [Side::Left, Side::Right] {
            place(
                surface,
                inputs.image(side),
                scale.region(side),
                inputs.transforms.get(side),
            )?;
        }

        if let Some(text) = inputs.text {
            render_text(surface, &self.fonts, &mut self.text_engine, text)?;
        }
        Ok(())
    }

    /// Compose at `scale` into a fresh surface and read it back.
    #[tracing::instrument(skip(self, inputs), fields(scale = scale.get()))]
    pub fn compose(
        &mut self,
        inputs: &FrameInputs<'_>,
        scale: FrameScale,
    ) -> PairframeResult<FrameRGBA> {
        let mut surface = FrameSurface::new(scale)?;
        self.compose_into(&mut surface, inputs)?;
        Ok(surface.finish())
    }

    /// Compose for one of the standard output targets.
    pub fn render(
        &mut self,
        inputs: &FrameInputs<'_>,
        target: RenderTarget,
    ) -> PairframeResult<FrameRGBA> {
        self.compose(inputs, target.scale()?)
    }
}
