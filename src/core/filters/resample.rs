//! Grid resampling filter.
//!
//! Resamples a volume onto a new voxel grid defined by a target spacing,
//! keeping the input origin and direction. The shared [`resample_onto`]
//! mapper also backs atlas registration: output index -> output physical
//! point -> transform -> input physical point -> interpolated sample.
use ndarray::{Array3, Zip};

use crate::core::filters::VolumeFilter;
use crate::error::{Error, Result};
use crate::image::transform::{mat3_inverse, mat3_mul_vec};
use crate::image::{AffineTransform, Volume, interp};
use crate::types::Interpolation;

/// Resampling to a target voxel spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resampling {
    target_spacing: [f64; 3],
    interpolation: Interpolation,
}

impl Resampling {
    pub fn new(target_spacing: [f64; 3], interpolation: Interpolation) -> Self {
        Self {
            target_spacing,
            interpolation,
        }
    }
}

impl Default for Resampling {
    /// 1 mm isotropic, nearest neighbour.
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0], Interpolation::Nearest)
    }
}

/// Output size per axis: `round(size * spacing / target_spacing)`, at least 1.
pub fn output_size(size: [usize; 3], spacing: [f64; 3], target_spacing: [f64; 3]) -> [usize; 3] {
    let mut out = [0usize; 3];
    for axis in 0..3 {
        let n = (size[axis] as f64 * (spacing[axis] / target_spacing[axis])).round() as usize;
        out[axis] = n.max(1);
    }
    out
}

impl VolumeFilter for Resampling {
    fn name(&self) -> &'static str {
        "resampling"
    }

    fn execute(&self, image: &Volume) -> Result<Volume> {
        for s in self.target_spacing {
            if !(s.is_finite() && s > 0.0) {
                return Err(Error::InvalidArgument {
                    arg: "target_spacing",
                    value: format!("{:?}", self.target_spacing),
                });
            }
        }
        let new_size = output_size(image.shape(), image.spacing(), self.target_spacing);
        resample_onto(
            image,
            new_size,
            self.target_spacing,
            image.origin(),
            image.direction(),
            &AffineTransform::identity(),
            self.interpolation,
            0.0,
        )
    }
}

/// Resample `input` onto an explicit output grid.
///
/// `transform` maps output physical points into input physical space
/// (identity for plain grid resampling). Out-of-field samples take
/// `default_value`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resample_onto(
    input: &Volume,
    out_shape: [usize; 3],
    out_spacing: [f64; 3],
    out_origin: [f64; 3],
    out_direction: [[f64; 3]; 3],
    transform: &AffineTransform,
    interpolation: Interpolation,
    default_value: f32,
) -> Result<Volume> {
    let in_inv_dir = mat3_inverse(&input.direction()).ok_or(Error::SingularTransform)?;
    let in_origin = input.origin();
    let in_spacing = input.spacing();
    let data = input.data();

    let mut out = Array3::<f32>::zeros((out_shape[0], out_shape[1], out_shape[2]));
    Zip::indexed(&mut out).par_for_each(|(i, j, k), voxel| {
        let scaled = [
            i as f64 * out_spacing[0],
            j as f64 * out_spacing[1],
            k as f64 * out_spacing[2],
        ];
        let rotated = mat3_mul_vec(&out_direction, &scaled);
        let out_point = [
            out_origin[0] + rotated[0],
            out_origin[1] + rotated[1],
            out_origin[2] + rotated[2],
        ];
        let in_point = transform.apply(out_point);
        let diff = [
            in_point[0] - in_origin[0],
            in_point[1] - in_origin[1],
            in_point[2] - in_origin[2],
        ];
        let rotated = mat3_mul_vec(&in_inv_dir, &diff);
        let index = [
            rotated[0] / in_spacing[0],
            rotated[1] / in_spacing[1],
            rotated[2] / in_spacing[2],
        ];
        *voxel = interp::sample(data, index, interpolation, default_value);
    });

    Volume::new(out, out_spacing, out_origin, out_direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn output_size_follows_spacing_ratio() {
        assert_eq!(
            output_size([10, 10, 10], [2.0, 2.0, 2.0], [1.0, 1.0, 1.0]),
            [20, 20, 20]
        );
        assert_eq!(
            output_size([181, 217, 181], [1.0, 1.0, 1.0], [0.6, 0.6, 0.6]),
            [302, 362, 302]
        );
        // Never collapses below one voxel.
        assert_eq!(output_size([2, 2, 2], [1.0, 1.0, 1.0], [100.0, 100.0, 100.0]), [1, 1, 1]);
    }

    #[test]
    fn identity_spacing_reproduces_volume() {
        let data = Array3::from_shape_fn((5, 6, 7), |(x, y, z)| (x + 10 * y + 100 * z) as f32);
        let vol = Volume::from_data(data.clone());
        let out = Resampling::new([1.0, 1.0, 1.0], Interpolation::Nearest)
            .execute(&vol)
            .unwrap();
        assert_eq!(out.shape(), [5, 6, 7]);
        assert_eq!(out.data(), &data);
    }

    #[test]
    fn downsampling_by_two_picks_alternate_voxels() {
        let data = Array3::from_shape_fn((8, 8, 8), |(x, _, _)| x as f32);
        let vol = Volume::from_data(data);
        let out = Resampling::new([2.0, 2.0, 2.0], Interpolation::Nearest)
            .execute(&vol)
            .unwrap();
        assert_eq!(out.shape(), [4, 4, 4]);
        assert_eq!(out.spacing(), [2.0, 2.0, 2.0]);
        for i in 0..4 {
            assert_eq!(out.data()[[i, 0, 0]], (2 * i) as f32);
        }
    }

    #[test]
    fn upsampling_with_linear_interpolates_midpoints() {
        let data = Array3::from_shape_fn((4, 4, 4), |(x, _, _)| x as f32);
        let vol = Volume::from_data(data);
        let out = Resampling::new([0.5, 0.5, 0.5], Interpolation::Linear)
            .execute(&vol)
            .unwrap();
        assert_eq!(out.shape(), [8, 8, 8]);
        // Output index 3 sits at physical 1.5, between input voxels 1 and 2.
        assert!((out.data()[[3, 0, 0]] - 1.5).abs() < 1e-5);
    }

    #[test]
    fn keeps_origin_and_direction() {
        let vol = Volume::new(
            Array3::zeros((4, 4, 4)),
            [2.0, 2.0, 2.0],
            [5.0, 6.0, 7.0],
            crate::image::IDENTITY_DIRECTION,
        )
        .unwrap();
        let out = Resampling::default().execute(&vol).unwrap();
        assert_eq!(out.origin(), [5.0, 6.0, 7.0]);
        assert_eq!(out.spacing(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn rejects_non_positive_spacing() {
        let vol = Volume::from_data(Array3::zeros((4, 4, 4)));
        assert!(Resampling::new([0.0, 1.0, 1.0], Interpolation::Nearest).execute(&vol).is_err());
        assert!(Resampling::new([1.0, -0.5, 1.0], Interpolation::Nearest).execute(&vol).is_err());
    }
}
