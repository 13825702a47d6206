use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::Interpolation;

/// Wiener denoising parameters.
///
/// `noise_power: None` estimates the noise as the mean local variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DenoiseParams {
    pub kernel_size: usize,
    pub noise_power: Option<f64>,
}

impl Default for DenoiseParams {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            noise_power: Some(0.1),
        }
    }
}

/// Grid resampling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResampleParams {
    /// Target voxel spacing in mm per axis.
    pub target_spacing: [f64; 3],
    pub interpolation: Interpolation,
}

impl Default for ResampleParams {
    fn default() -> Self {
        Self {
            target_spacing: [1.0, 1.0, 1.0],
            interpolation: Interpolation::Nearest,
        }
    }
}

/// Atlas registration inputs: the atlas defines the output grid, the
/// transform file holds the precomputed affine mapping atlas space into
/// subject space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationParams {
    pub atlas: PathBuf,
    pub transform: PathBuf,
    /// Label maps are resampled with nearest-neighbour interpolation.
    pub is_label_map: bool,
}

/// Pre-processing parameters suitable for config files and presets.
///
/// `None` / `false` disables the corresponding pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingParams {
    pub denoise: Option<DenoiseParams>,
    pub resample: Option<ResampleParams>,
    pub normalize: bool,
    /// Brain mask volume for skull stripping.
    pub brain_mask: Option<PathBuf>,
    pub registration: Option<RegistrationParams>,
    /// If set, a mid-axial JPEG preview is written after every stage.
    pub preview_dir: Option<PathBuf>,
}

impl Default for PreprocessingParams {
    fn default() -> Self {
        Self {
            denoise: Some(DenoiseParams::default()),
            resample: Some(ResampleParams::default()),
            normalize: true,
            brain_mask: None,
            registration: None,
            preview_dir: None,
        }
    }
}
