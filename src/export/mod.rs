//! Encoding and batch export of composed frames.

/// Parallel batch export.
pub mod batch;
/// JPEG and PNG encoding.
pub mod encode;
