//! Volume type with physical-space metadata.
//!
//! A [`Volume`] couples a 3-D scalar array with the metadata that maps voxel
//! indices to physical coordinates (origin, spacing, direction), the way
//! medical-imaging toolkits model images. Index order is (x, y, z).
use ndarray::Array3;

use crate::error::{Error, Result};

pub mod interp;
pub mod transform;

pub use transform::AffineTransform;

/// A 3-D scalar volume with physical-space metadata.
///
/// Intensity filters must leave the metadata untouched; geometry filters
/// (resampling, registration) construct their output grid explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<f32>,
    /// Physical distance between voxel centers along each axis, in mm.
    spacing: [f64; 3],
    /// Physical coordinate of voxel (0, 0, 0).
    origin: [f64; 3],
    /// Axis orientation matrix, row-major. Identity for axis-aligned volumes.
    direction: [[f64; 3]; 3],
}

impl Volume {
    pub fn new(
        data: Array3<f32>,
        spacing: [f64; 3],
        origin: [f64; 3],
        direction: [[f64; 3]; 3],
    ) -> Result<Self> {
        for s in spacing {
            if !(s.is_finite() && s > 0.0) {
                return Err(Error::InvalidArgument {
                    arg: "spacing",
                    value: format!("{:?}", spacing),
                });
            }
        }
        Ok(Self {
            data,
            spacing,
            origin,
            direction,
        })
    }

    /// A volume with unit spacing, zero origin, and identity direction.
    pub fn from_data(data: Array3<f32>) -> Self {
        Self {
            data,
            spacing: [1.0; 3],
            origin: [0.0; 3],
            direction: IDENTITY_DIRECTION,
        }
    }

    /// Adopt another volume's spacing, origin, and direction.
    ///
    /// Intensity filters call this after rebuilding voxel data so geometry
    /// is carried through unchanged.
    pub fn copy_information(&mut self, other: &Volume) {
        self.spacing = other.spacing;
        self.origin = other.origin;
        self.direction = other.direction;
    }

    pub fn shape(&self) -> [usize; 3] {
        let (x, y, z) = self.data.dim();
        [x, y, z]
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn into_data(self) -> Array3<f32> {
        self.data
    }

    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    pub fn direction(&self) -> [[f64; 3]; 3] {
        self.direction
    }

    /// Map a continuous index to a physical point:
    /// `point = origin + D * (index * spacing)`.
    pub fn continuous_index_to_physical(&self, index: [f64; 3]) -> [f64; 3] {
        let scaled = [
            index[0] * self.spacing[0],
            index[1] * self.spacing[1],
            index[2] * self.spacing[2],
        ];
        let rotated = transform::mat3_mul_vec(&self.direction, &scaled);
        [
            self.origin[0] + rotated[0],
            self.origin[1] + rotated[1],
            self.origin[2] + rotated[2],
        ]
    }

    /// Map a physical point to a continuous index:
    /// `index = D^-1 * (point - origin) / spacing`.
    pub fn physical_to_continuous_index(&self, point: [f64; 3]) -> Result<[f64; 3]> {
        let inv = transform::mat3_inverse(&self.direction).ok_or(Error::SingularTransform)?;
        let diff = [
            point[0] - self.origin[0],
            point[1] - self.origin[1],
            point[2] - self.origin[2],
        ];
        let rotated = transform::mat3_mul_vec(&inv, &diff);
        Ok([
            rotated[0] / self.spacing[0],
            rotated[1] / self.spacing[1],
            rotated[2] / self.spacing[2],
        ])
    }

    pub fn min(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn mean(&self) -> f64 {
        let n = self.data.len();
        if n == 0 {
            return 0.0;
        }
        self.data.iter().map(|&v| v as f64).sum::<f64>() / n as f64
    }

    /// Population standard deviation of the voxel intensities.
    pub fn std(&self) -> f64 {
        let n = self.data.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        var.sqrt()
    }
}

pub const IDENTITY_DIRECTION: [[f64; 3]; 3] =
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
