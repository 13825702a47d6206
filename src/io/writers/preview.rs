//! Mid-volume slice previews.
//!
//! Extracts the middle slice of a volume along an anatomical plane,
//! min-max scales it for display, and writes a grayscale JPEG. Used by the
//! pipeline to document every stage output.
use std::path::Path;

use ndarray::{Array2, Axis};

use crate::error::{Error, Result};
use crate::image::Volume;
use crate::io::writers::jpeg::write_gray_jpeg;
use crate::types::Plane;

pub fn write_slice_preview(volume: &Volume, plane: Plane, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let slice = middle_slice(volume, plane);
    let (cols, rows) = slice.dim();

    let min = slice.iter().copied().fold(f32::INFINITY, f32::min);
    let max = slice.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;

    let mut bytes = vec![0u8; cols * rows];
    for ((x, y), &v) in slice.indexed_iter() {
        let scaled = if range > 0.0 {
            ((v - min) / range * 255.0).round() as u8
        } else {
            0
        };
        bytes[y * cols + x] = scaled;
    }

    write_gray_jpeg(output, cols, rows, &bytes).map_err(Error::external)
}

/// Middle slice as a (col, row) array: axial keeps (x, y), coronal (x, z),
/// sagittal (y, z).
fn middle_slice(volume: &Volume, plane: Plane) -> Array2<f32> {
    let shape = volume.shape();
    let data = volume.data();
    match plane {
        Plane::Axial => data.index_axis(Axis(2), shape[2] / 2).to_owned(),
        Plane::Coronal => data.index_axis(Axis(1), shape[1] / 2).to_owned(),
        Plane::Sagittal => data.index_axis(Axis(0), shape[0] / 2).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn middle_slice_dimensions_follow_plane() {
        let vol = Volume::from_data(Array3::zeros((4, 6, 8)));
        assert_eq!(middle_slice(&vol, Plane::Axial).dim(), (4, 6));
        assert_eq!(middle_slice(&vol, Plane::Coronal).dim(), (4, 8));
        assert_eq!(middle_slice(&vol, Plane::Sagittal).dim(), (6, 8));
    }

    #[test]
    fn middle_slice_picks_center_plane() {
        let data = Array3::from_shape_fn((3, 3, 5), |(_, _, z)| z as f32);
        let vol = Volume::from_data(data);
        let slice = middle_slice(&vol, Plane::Axial);
        assert!(slice.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn preview_roundtrip_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.jpg");
        let data = Array3::from_shape_fn((8, 8, 8), |(x, y, _)| (x * y) as f32);
        let vol = Volume::from_data(data);
        write_slice_preview(&vol, Plane::Axial, &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
