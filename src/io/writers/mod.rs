//! Low-level image writers: grayscale JPEG (slice previews) and RGB PNG
//! (plot output).
pub mod jpeg;
pub mod png;
pub mod preview;
