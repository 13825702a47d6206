//! I/O layer for reading and writing NIfTI volumes and for the image
//! writers used by previews and plots.
pub mod nifti;
pub use nifti::{load_volume, save_volume};

pub mod writers;
