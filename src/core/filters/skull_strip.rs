//! Skull stripping by brain-mask application.
use ndarray::Zip;

use crate::core::filters::VolumeFilter;
use crate::error::{Error, Result};
use crate::image::Volume;

/// Skull-stripping parameters: the brain mask volume.
#[derive(Debug, Clone)]
pub struct SkullStrippingParams {
    pub mask: Volume,
}

impl SkullStrippingParams {
    pub fn new(mask: Volume) -> Self {
        Self { mask }
    }
}

/// Zeroes every voxel outside the brain mask.
///
/// The mask must match the image shape; a mismatch is an error.
#[derive(Debug, Clone)]
pub struct SkullStripping {
    params: SkullStrippingParams,
}

impl SkullStripping {
    pub fn new(params: SkullStrippingParams) -> Self {
        Self { params }
    }
}

impl VolumeFilter for SkullStripping {
    fn name(&self) -> &'static str {
        "skull_stripping"
    }

    fn execute(&self, image: &Volume) -> Result<Volume> {
        let mask = &self.params.mask;
        if mask.shape() != image.shape() {
            return Err(Error::ShapeMismatch {
                expected: image.shape(),
                actual: mask.shape(),
            });
        }

        let mut data = image.data().clone();
        Zip::from(&mut data).and(mask.data()).for_each(|v, &m| {
            if m == 0.0 {
                *v = 0.0;
            }
        });

        let mut out = Volume::from_data(data);
        out.copy_information(image);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn zeroes_outside_mask() {
        let image = Volume::from_data(Array3::from_elem((4, 4, 4), 7.0));
        let mut mask_data = Array3::zeros((4, 4, 4));
        mask_data[[1, 1, 1]] = 1.0;
        mask_data[[2, 2, 2]] = 1.0;
        let filter = SkullStripping::new(SkullStrippingParams::new(Volume::from_data(mask_data)));
        let out = filter.execute(&image).unwrap();
        assert_eq!(out.data()[[1, 1, 1]], 7.0);
        assert_eq!(out.data()[[2, 2, 2]], 7.0);
        assert_eq!(out.data()[[0, 0, 0]], 0.0);
        assert_eq!(out.data()[[3, 3, 3]], 0.0);
    }

    #[test]
    fn mismatched_mask_is_an_error() {
        let image = Volume::from_data(Array3::zeros((4, 4, 4)));
        let mask = Volume::from_data(Array3::zeros((4, 4, 5)));
        let filter = SkullStripping::new(SkullStrippingParams::new(mask));
        assert!(matches!(
            filter.execute(&image),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
