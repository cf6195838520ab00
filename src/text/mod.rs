//! Caption fonts and shaping.

/// Font registry and family resolution.
pub mod fonts;
/// Single-line shaping via parley.
pub mod layout;
