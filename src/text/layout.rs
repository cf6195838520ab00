use std::collections::HashMap;

use crate::foundation::error::{PairframeError, PairframeResult};
use crate::text::fonts::{FaceStyle, ResolvedFace};

/// One shaped caption line.
pub struct ShapedLine {
    pub(crate) layout: parley::Layout<()>,
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Advance width including trailing whitespace (what `measureText` reports).
    pub width: f64,
    /// Distance from the top of the layout to the first baseline.
    pub baseline: f64,
    pub font_size: f32,
}

impl std::fmt::Debug for ShapedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLine")
            .field("width", &self.width)
            .field("baseline", &self.baseline)
            .field("font_size", &self.font_size)
            .finish_non_exhaustive()
    }
}

struct LoadedFace {
    font_ctx: parley::FontContext,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Stateful helper for shaping caption text from registered font bytes.
///
/// Every face gets its own font collection, so shaping always uses exactly the face the
/// renderer paints with.
pub struct TextLayoutEngine {
    faces: HashMap<(String, FaceStyle), LoadedFace>,
    layout_ctx: parley::LayoutContext<()>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            faces: HashMap::new(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape `text` as a single unwrapped line at `size_px`.
    pub fn shape_line(
        &mut self,
        text: &str,
        face: &ResolvedFace,
        size_px: f32,
    ) -> PairframeResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PairframeError::validation(
                "text size must be finite and > 0",
            ));
        }

        let key = (face.family.clone(), face.style);
        if !self.faces.contains_key(&key) {
            let loaded = load_face(face)?;
            self.faces.insert(key.clone(), loaded);
        }
        let loaded = self
            .faces
            .get_mut(&key)
            .ok_or_else(|| PairframeError::text("font face cache lost an entry"))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut loaded.font_ctx, text, 1.0, false);
        builder.push_default(parley::style::StyleProperty::FontStack(family_stack(
            &loaded.family_name,
        )));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        let width = f64::from(layout.full_width());

        Ok(ShapedLine {
            layout,
            font: loaded.font.clone(),
            width,
            baseline,
            font_size: size_px,
        })
    }
}

/// Exactly one named family; the name is never parsed as a CSS list.
fn family_stack(name: &str) -> parley::style::FontStack<'static> {
    parley::style::FontStack::Single(parley::style::FontFamily::Named(
        std::borrow::Cow::Owned(name.to_owned()),
    ))
}

fn load_face(face: &ResolvedFace) -> PairframeResult<LoadedFace> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(face.bytes.as_ref().clone()), None);
    let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
        PairframeError::text(format!(
            "font bytes for \"{}\" contain no usable face",
            face.family
        ))
    })?;
    let family_name = font_ctx
        .collection
        .family_name(family_id)
        .ok_or_else(|| PairframeError::text("registered font family has no name"))?
        .to_string();

    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
        0,
    );

    tracing::debug!(family = %face.family, style = ?face.style, %family_name, "load caption face");
    Ok(LoadedFace {
        font_ctx,
        family_name,
        font,
    })
}
