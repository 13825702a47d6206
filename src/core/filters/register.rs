//! Atlas registration by precomputed transform.
//!
//! Registration itself (estimating the transform) is out of scope; the
//! transform is supplied and only applied here, resampling the subject
//! volume onto the atlas grid.
use crate::core::filters::VolumeFilter;
use crate::core::filters::resample::resample_onto;
use crate::error::Result;
use crate::image::{AffineTransform, Volume};
use crate::types::Interpolation;

/// Atlas registration parameters.
#[derive(Debug, Clone)]
pub struct AtlasRegistrationParams {
    /// The atlas image defining the output grid.
    pub atlas: Volume,
    /// Precomputed transform mapping atlas physical points into subject space.
    pub transform: AffineTransform,
    /// Label maps (e.g. ground-truth segmentations) are resampled with
    /// nearest-neighbour interpolation so label values stay intact.
    pub is_label_map: bool,
}

impl AtlasRegistrationParams {
    pub fn new(atlas: Volume, transform: AffineTransform, is_label_map: bool) -> Self {
        Self {
            atlas,
            transform,
            is_label_map,
        }
    }
}

/// Applies a precomputed transform, resampling onto the atlas grid.
#[derive(Debug, Clone)]
pub struct AtlasRegistration {
    params: AtlasRegistrationParams,
}

impl AtlasRegistration {
    pub fn new(params: AtlasRegistrationParams) -> Self {
        Self { params }
    }
}

impl VolumeFilter for AtlasRegistration {
    fn name(&self) -> &'static str {
        "atlas_registration"
    }

    fn execute(&self, image: &Volume) -> Result<Volume> {
        let interpolation = if self.params.is_label_map {
            Interpolation::Nearest
        } else {
            Interpolation::Linear
        };
        let atlas = &self.params.atlas;
        resample_onto(
            image,
            atlas.shape(),
            atlas.spacing(),
            atlas.origin(),
            atlas.direction(),
            &self.params.transform,
            interpolation,
            0.0,
        )
    }
}
