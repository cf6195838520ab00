//! Caller-owned data fed into the compositor.
//!
//! Field names follow the JSON shape used by the photo-pairing front end (`strokeColor`,
//! `leftPhoto`, `"bottom-right"`), so job files round-trip without adapters.

use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Side, Vec2};
use crate::foundation::error::{PairframeError, PairframeResult};

/// Per-side placement adjustment: rotate, then scale, then translate.
///
/// `position` is measured in the rotated and scaled space of the image, so a drag of `N`
/// pixels at `scale = 2` moves the image `2N` pixels on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageTransform {
    pub scale: f64,
    /// Degrees, clockwise in canvas space (y points down).
    pub rotation: f64,
    pub position: Vec2,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ImageTransform {
    pub const IDENTITY: ImageTransform = ImageTransform {
        scale: 1.0,
        rotation: 0.0,
        position: Vec2::ZERO,
    };
}

/// Caption anchor corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextPosition {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl TextPosition {
    pub fn is_right(self) -> bool {
        matches!(self, TextPosition::TopRight | TextPosition::BottomRight)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, TextPosition::BottomLeft | TextPosition::BottomRight)
    }
}

/// Caption styling snapshot for one render call.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub enabled: bool,
    pub text: String,
    /// CSS-like family list, e.g. `"Inter, sans-serif"`.
    pub font: String,
    /// Font size in logical pixels (at scale 1).
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    /// Fill color as hex.
    pub color: String,
    pub stroke: bool,
    pub stroke_color: String,
    /// Outline width in logical pixels (at scale 1).
    pub stroke_width: f64,
    pub position: TextPosition,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            text: String::new(),
            font: "sans-serif".to_owned(),
            size: 36.0,
            bold: false,
            italic: false,
            color: "#000000".to_owned(),
            stroke: false,
            stroke_color: "#FFFFFF".to_owned(),
            stroke_width: 2.0,
            position: TextPosition::TopLeft,
        }
    }
}

impl TextOptions {
    /// Enabled caption with default styling.
    pub fn caption(text: impl Into<String>) -> Self {
        Self {
            enabled: true,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Whether anything would be drawn.
    pub fn is_drawable(&self) -> bool {
        self.enabled && !self.text.is_empty()
    }

    /// CSS font shorthand at `scale`, e.g. `"bold italic 36px Inter"`.
    pub fn font_descriptor(&self, scale: f64) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.bold {
            parts.push("bold".to_owned());
        }
        if self.italic {
            parts.push("italic".to_owned());
        }
        parts.push(format!("{}px", self.size * scale));
        parts.push(self.font.clone());
        parts.join(" ")
    }
}

/// Transforms for both halves; a missing side is placed untransformed.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PairTransforms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<ImageTransform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<ImageTransform>,
}

impl PairTransforms {
    pub fn get(&self, side: Side) -> Option<&ImageTransform> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }
}

/// One export job: a named photo pair plus its adjustments.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairJob {
    pub name: String,
    pub left_photo: String,
    pub right_photo: String,
    #[serde(default)]
    pub transform: PairTransforms,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_options: Option<TextOptions>,
}

impl PairJob {
    pub fn photo(&self, side: Side) -> &str {
        match side {
            Side::Left => &self.left_photo,
            Side::Right => &self.right_photo,
        }
    }
}

/// Parse a JSON array of [`PairJob`]s.
pub fn parse_jobs_json(json: &str) -> PairframeResult<Vec<PairJob>> {
    serde_json::from_str(json)
        .map_err(|e| PairframeError::validation(format!("invalid job list: {e}")))
}

/// Read and parse a JSON job list from disk.
pub fn load_jobs_json(path: impl AsRef<Path>) -> PairframeResult<Vec<PairJob>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read job list {}", path.display()))?;
    parse_jobs_json(&json)
}
