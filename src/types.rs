//! Shared types and enums used across MRIPRO.
//! Includes the `Interpolation` method selector and the anatomical `Plane`
//! used for slice previews.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Interpolation method used when sampling a volume at non-integer indices.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Interpolation {
    Nearest,
    Linear,
    Bspline,
}

impl std::fmt::Display for Interpolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Interpolation::Nearest => "Nearest",
            Interpolation::Linear => "Linear",
            Interpolation::Bspline => "Bspline",
        };
        write!(f, "{}", s)
    }
}

/// Anatomical plane used when extracting 2-D preview slices from a volume.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Plane {
    Axial,
    Coronal,
    Sagittal,
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Plane::Axial => "Axial",
            Plane::Coronal => "Coronal",
            Plane::Sagittal => "Sagittal",
        };
        write!(f, "{}", s)
    }
}
