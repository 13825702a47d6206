//! Pre-processing filters and the pipeline that chains them.
//!
//! Every filter is configured at construction and implements
//! [`VolumeFilter`]; a [`Pipeline`] runs filters in order, feeding each
//! output into the next input. Intensity filters preserve the input
//! geometry; resampling and registration define their output grid
//! explicitly.
use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::image::Volume;
use crate::io::writers::preview::write_slice_preview;
use crate::types::Plane;

pub mod denoise;
pub mod normalize;
pub mod register;
pub mod resample;
pub mod skull_strip;

pub use denoise::WienerDenoising;
pub use normalize::IntensityNormalization;
pub use register::{AtlasRegistration, AtlasRegistrationParams};
pub use resample::Resampling;
pub use skull_strip::{SkullStripping, SkullStrippingParams};

/// A single pre-processing step over a volume.
pub trait VolumeFilter {
    fn name(&self) -> &'static str;

    fn execute(&self, image: &Volume) -> Result<Volume>;
}

/// An ordered chain of filters.
///
/// With a preview directory set, the pipeline writes a mid-axial JPEG of
/// every stage output, numbered in execution order.
#[derive(Default)]
pub struct Pipeline {
    filters: Vec<Box<dyn VolumeFilter>>,
    preview_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filter: Box<dyn VolumeFilter>) {
        self.filters.push(filter);
    }

    pub fn with_preview_dir(mut self, dir: PathBuf) -> Self {
        self.preview_dir = Some(dir);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run all filters in order. An empty pipeline returns the input.
    pub fn execute(&self, image: &Volume) -> Result<Volume> {
        let mut current = image.clone();
        for (stage, filter) in self.filters.iter().enumerate() {
            let start = Instant::now();
            current = filter.execute(&current)?;
            info!(
                "[{}] done in {:.2?}, output shape {:?}",
                filter.name(),
                start.elapsed(),
                current.shape()
            );
            if let Some(dir) = &self.preview_dir {
                let path = dir.join(format!("{:02}_{}.jpg", stage, filter.name()));
                write_slice_preview(&current, Plane::Axial, &path)?;
                debug!("[{}] preview written to {:?}", filter.name(), path);
            }
        }
        Ok(current)
    }
}
