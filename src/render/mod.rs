//! CPU compositing of photo pairs.
//!
//! A frame is painted in a fixed order: white base, left half, right half, caption. Each half
//! is cover-fitted to its region, then the user transform is applied, clipped to the half.

/// Frame composition entry points.
pub mod composer;
/// Latest-wins publication for asynchronous renders.
pub mod coordinator;
/// Cover-fit and placement transforms.
pub mod placer;
/// Render surfaces and readback.
pub mod surface;
/// Output resolutions.
pub mod target;
/// Caption anchoring and drawing.
pub mod text;
