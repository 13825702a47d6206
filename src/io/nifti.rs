//! NIfTI volume reading and writing.
//!
//! Volumes are loaded as f32 with spacing, origin, and direction taken
//! from the sform affine when present, falling back to pixdim/qoffset.
//! Only 3-D volumes are supported.
use std::path::Path;

use ndarray::Ix3;
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::{IDENTITY_DIRECTION, Volume};

/// Load a `.nii` / `.nii.gz` file into a [`Volume`].
pub fn load_volume(path: &Path) -> Result<Volume> {
    let obj = ReaderOptions::new().read_file(path)?;
    let header = obj.header().clone();
    let data = obj.into_volume().into_ndarray::<f32>()?;

    let ndim = data.ndim();
    let data = data.into_dimensionality::<Ix3>().map_err(|_| {
        Error::Processing(format!(
            "expected a 3-D volume, got {} dimensions in {:?}",
            ndim, path
        ))
    })?;

    let (spacing, origin, direction) = decompose_affine(&header);
    debug!(
        "loaded {:?}: shape {:?}, spacing {:?}, origin {:?}",
        path,
        data.dim(),
        spacing,
        origin
    );
    Volume::new(data, spacing, origin, direction)
}

/// Save a [`Volume`] as NIfTI, preserving its geometry in the sform.
pub fn save_volume(volume: &Volume, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let header = compose_header(volume);
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(volume.data())?;
    Ok(())
}

fn decompose_affine(header: &NiftiHeader) -> ([f64; 3], [f64; 3], [[f64; 3]; 3]) {
    if header.sform_code > 0 {
        let rows = [header.srow_x, header.srow_y, header.srow_z];
        let mut spacing = [0.0f64; 3];
        for col in 0..3 {
            spacing[col] = (0..3)
                .map(|row| (rows[row][col] as f64).powi(2))
                .sum::<f64>()
                .sqrt();
        }
        if spacing.iter().all(|&s| s > 0.0) {
            let mut direction = [[0.0f64; 3]; 3];
            for row in 0..3 {
                for col in 0..3 {
                    direction[row][col] = rows[row][col] as f64 / spacing[col];
                }
            }
            let origin = [rows[0][3] as f64, rows[1][3] as f64, rows[2][3] as f64];
            return (spacing, origin, direction);
        }
    }

    // qform-less fallback: pixdim spacing, qoffset origin, axis-aligned.
    let mut spacing = [1.0f64; 3];
    for axis in 0..3 {
        let p = header.pixdim[axis + 1].abs() as f64;
        if p > 0.0 {
            spacing[axis] = p;
        }
    }
    let origin = [
        header.qoffset_x as f64,
        header.qoffset_y as f64,
        header.qoffset_z as f64,
    ];
    (spacing, origin, IDENTITY_DIRECTION)
}

fn compose_header(volume: &Volume) -> NiftiHeader {
    let spacing = volume.spacing();
    let origin = volume.origin();
    let direction = volume.direction();

    let mut header = NiftiHeader::default();
    header.pixdim = [
        1.0,
        spacing[0] as f32,
        spacing[1] as f32,
        spacing[2] as f32,
        0.0,
        0.0,
        0.0,
        0.0,
    ];
    let mut rows = [[0.0f32; 4]; 3];
    for (r, row) in rows.iter_mut().enumerate() {
        for c in 0..3 {
            row[c] = (direction[r][c] * spacing[c]) as f32;
        }
        row[3] = origin[r] as f32;
    }
    header.srow_x = rows[0];
    header.srow_y = rows[1];
    header.srow_z = rows[2];
    header.sform_code = 1;
    header.qform_code = 0;
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn save_load_roundtrip_preserves_data_and_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vol.nii");

        let data = Array3::from_shape_fn((6, 5, 4), |(x, y, z)| (x + 10 * y + 100 * z) as f32);
        let vol = Volume::new(
            data.clone(),
            [0.6, 0.6, 1.2],
            [-90.0, -126.0, -72.0],
            IDENTITY_DIRECTION,
        )
        .unwrap();

        save_volume(&vol, &path).unwrap();
        let loaded = load_volume(&path).unwrap();

        assert_eq!(loaded.shape(), [6, 5, 4]);
        for (a, b) in loaded.data().iter().zip(data.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
        for axis in 0..3 {
            assert!((loaded.spacing()[axis] - vol.spacing()[axis]).abs() < 1e-4);
            assert!((loaded.origin()[axis] - vol.origin()[axis]).abs() < 1e-3);
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_volume(Path::new("/nonexistent/vol.nii")).is_err());
    }

    #[test]
    fn compose_header_carries_sform() {
        let vol = Volume::new(
            Array3::zeros((2, 2, 2)),
            [2.0, 3.0, 4.0],
            [1.0, 2.0, 3.0],
            IDENTITY_DIRECTION,
        )
        .unwrap();
        let header = compose_header(&vol);
        assert_eq!(header.sform_code, 1);
        assert_eq!(header.srow_x, [2.0, 0.0, 0.0, 1.0]);
        assert_eq!(header.srow_y, [0.0, 3.0, 0.0, 2.0]);
        assert_eq!(header.srow_z, [0.0, 0.0, 4.0, 3.0]);
    }
}
