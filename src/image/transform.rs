//! 3-D affine transforms and small matrix helpers.
//!
//! Registration in this crate applies precomputed transforms only; the
//! transform maps output (atlas) physical points into input physical space,
//! following the resampling convention of ITK-style toolkits.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An affine map `y = A * x + t` over physical points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub matrix: [[f64; 3]; 3],
    pub translation: [f64; 3],
}

impl AffineTransform {
    /// The identity transform, the default for plain resampling.
    pub fn identity() -> Self {
        Self {
            matrix: crate::image::IDENTITY_DIRECTION,
            translation: [0.0; 3],
        }
    }

    pub fn translation(offset: [f64; 3]) -> Self {
        Self {
            matrix: crate::image::IDENTITY_DIRECTION,
            translation: offset,
        }
    }

    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let rotated = mat3_mul_vec(&self.matrix, &point);
        [
            rotated[0] + self.translation[0],
            rotated[1] + self.translation[1],
            rotated[2] + self.translation[2],
        ]
    }

    /// Invert the transform: `x = A^-1 * (y - t)`.
    pub fn inverse(&self) -> Result<Self> {
        let inv = mat3_inverse(&self.matrix).ok_or(Error::SingularTransform)?;
        let t = mat3_mul_vec(&inv, &self.translation);
        Ok(Self {
            matrix: inv,
            translation: [-t[0], -t[1], -t[2]],
        })
    }

    /// Load a transform from a JSON file, e.g. one shipped alongside an atlas.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(Error::external)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

pub(crate) fn mat3_mul_vec(m: &[[f64; 3]; 3], v: &[f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

pub(crate) fn mat3_inverse(m: &[[f64; 3]; 3]) -> Option<[[f64; 3]; 3]> {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
    if det.abs() < 1e-12 {
        return None;
    }
    let inv_det = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ],
    ])
}
