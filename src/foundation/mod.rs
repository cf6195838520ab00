//! Shared geometry, colors, and error types.

/// Colors and hex parsing.
pub mod color;
/// Frame geometry and scale.
pub mod core;
/// Crate error type.
pub mod error;
