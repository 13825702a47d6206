//! Min-max intensity normalization.
use tracing::warn;

use crate::core::filters::VolumeFilter;
use crate::error::Result;
use crate::image::Volume;

/// Linear rescale of the intensity range to [0, 1].
///
/// A volume without any intensity range (max == min) is passed through
/// unchanged with a warning carrying the sanity statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntensityNormalization;

impl IntensityNormalization {
    pub fn new() -> Self {
        Self
    }
}

impl VolumeFilter for IntensityNormalization {
    fn name(&self) -> &'static str {
        "intensity_normalization"
    }

    fn execute(&self, image: &Volume) -> Result<Volume> {
        let min = image.min();
        let max = image.max();

        if !(max > min) {
            warn!(
                "Image has no intensity range (max == min). Returning unprocessed image. mean: {:.2}, std: {:.2}",
                image.mean(),
                image.std()
            );
            return Ok(image.clone());
        }

        let range = max - min;
        let mut out = Volume::from_data(image.data().mapv(|v| (v - min) / range));
        out.copy_information(image);
        Ok(out)
    }
}
