use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{PairframeError, PairframeResult};

/// Weight/slant slot of a face inside a family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FaceStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FaceStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => FaceStyle::Regular,
            (true, false) => FaceStyle::Bold,
            (false, true) => FaceStyle::Italic,
            (true, true) => FaceStyle::BoldItalic,
        }
    }

    fn is_bold(self) -> bool {
        matches!(self, FaceStyle::Bold | FaceStyle::BoldItalic)
    }

    /// Preference order when the exact face is not registered.
    fn fallbacks(self) -> [FaceStyle; 4] {
        match self {
            FaceStyle::Regular => [
                FaceStyle::Regular,
                FaceStyle::Italic,
                FaceStyle::Bold,
                FaceStyle::BoldItalic,
            ],
            FaceStyle::Bold => [
                FaceStyle::Bold,
                FaceStyle::BoldItalic,
                FaceStyle::Regular,
                FaceStyle::Italic,
            ],
            FaceStyle::Italic => [
                FaceStyle::Italic,
                FaceStyle::Regular,
                FaceStyle::BoldItalic,
                FaceStyle::Bold,
            ],
            FaceStyle::BoldItalic => [
                FaceStyle::BoldItalic,
                FaceStyle::Bold,
                FaceStyle::Regular,
                FaceStyle::Italic,
            ],
        }
    }
}

/// A face picked for a caption: its family key, the slot it came from, and its bytes.
#[derive(Clone, Debug)]
pub struct ResolvedFace {
    pub family: String,
    pub style: FaceStyle,
    pub bytes: Arc<Vec<u8>>,
}

/// Registry of caption fonts keyed by family name.
///
/// There is no system font discovery; everything a caption may use is registered up front.
/// Cloning is cheap (font bytes are shared).
#[derive(Clone, Debug, Default)]
pub struct FontBook {
    families: BTreeMap<String, BTreeMap<FaceStyle, Arc<Vec<u8>>>>,
    default_family: Option<String>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one face of `family`. The first family registered becomes the default.
    pub fn register(
        &mut self,
        family: &str,
        style: FaceStyle,
        bytes: Vec<u8>,
    ) -> PairframeResult<()> {
        let key = family_key(family);
        if key.is_empty() {
            return Err(PairframeError::validation("font family name must be non-empty"));
        }
        if bytes.is_empty() {
            return Err(PairframeError::validation(format!(
                "font bytes for \"{family}\" are empty"
            )));
        }

        tracing::debug!(family = %key, ?style, len = bytes.len(), "register font face");
        self.families
            .entry(key.clone())
            .or_default()
            .insert(style, Arc::new(bytes));
        if self.default_family.is_none() {
            self.default_family = Some(key);
        }
        Ok(())
    }

    /// Read a TrueType/OpenType file and register it as one face of `family`.
    pub fn register_file(
        &mut self,
        family: &str,
        style: FaceStyle,
        path: impl AsRef<Path>,
    ) -> PairframeResult<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read font {}", path.display()))?;
        self.register(family, style, bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// Pick the face for a CSS-like family list and bold/italic flags.
    ///
    /// The first listed family that is registered wins; otherwise the default family is used.
    /// Inside a family the exact style is preferred, then one that keeps the weight, then
    /// regular, then whatever is registered.
    pub fn resolve(&self, font: &str, bold: bool, italic: bool) -> PairframeResult<ResolvedFace> {
        let family = font
            .split(',')
            .map(family_key)
            .find(|k| self.families.contains_key(k))
            .or_else(|| self.default_family.clone())
            .ok_or_else(|| {
                PairframeError::text(format!("no fonts registered to render family \"{font}\""))
            })?;

        let faces = self
            .families
            .get(&family)
            .ok_or_else(|| PairframeError::text(format!("font family \"{family}\" vanished")))?;

        let wanted = FaceStyle::from_flags(bold, italic);
        let (style, bytes) = wanted
            .fallbacks()
            .into_iter()
            .find_map(|s| faces.get(&s).map(|b| (s, b)))
            .ok_or_else(|| PairframeError::text(format!("family \"{family}\" has no faces")))?;

        if style != wanted {
            tracing::debug!(%family, ?wanted, ?style, "caption face fell back");
        }
        if wanted.is_bold() && !style.is_bold() {
            tracing::warn!(%family, "bold requested but no bold face registered");
        }

        Ok(ResolvedFace {
            family,
            style,
            bytes: Arc::clone(bytes),
        })
    }
}

fn family_key(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}
