//! High-level, ergonomic library API: pre-process NIfTI volumes to files or
//! in-memory `Volume`s, plus batch helpers for directories. Prefer these
//! entrypoints over the low-level filter modules when embedding MRIPRO.
use std::path::Path;

use tracing::{info, warn};

use crate::core::filters::{
    AtlasRegistration, AtlasRegistrationParams, IntensityNormalization, Pipeline, Resampling,
    SkullStripping, SkullStrippingParams, WienerDenoising,
};
use crate::core::params::PreprocessingParams;
use crate::error::Result;
use crate::image::{AffineTransform, Volume};
use crate::io::nifti::{load_volume, save_volume};

/// Outcome of a directory batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Build the filter pipeline described by `params`, loading any mask,
/// atlas, and transform files it references.
pub fn build_pipeline(params: &PreprocessingParams) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new();

    if let Some(denoise) = &params.denoise {
        pipeline.push(Box::new(WienerDenoising::new(
            denoise.kernel_size,
            denoise.noise_power,
        )));
    }
    if let Some(resample) = &params.resample {
        pipeline.push(Box::new(Resampling::new(
            resample.target_spacing,
            resample.interpolation,
        )));
    }
    if params.normalize {
        pipeline.push(Box::new(IntensityNormalization::new()));
    }
    if let Some(mask_path) = &params.brain_mask {
        let mask = load_volume(mask_path)?;
        pipeline.push(Box::new(SkullStripping::new(SkullStrippingParams::new(
            mask,
        ))));
    }
    if let Some(registration) = &params.registration {
        let atlas = load_volume(&registration.atlas)?;
        let transform = AffineTransform::from_json_file(&registration.transform)?;
        pipeline.push(Box::new(AtlasRegistration::new(
            AtlasRegistrationParams::new(atlas, transform, registration.is_label_map),
        )));
    }

    if let Some(dir) = &params.preview_dir {
        pipeline = pipeline.with_preview_dir(dir.clone());
    }
    Ok(pipeline)
}

/// Pre-process one NIfTI volume in memory.
pub fn preprocess_volume_to_buffer(input: &Path, params: &PreprocessingParams) -> Result<Volume> {
    let volume = load_volume(input)?;
    let pipeline = build_pipeline(params)?;
    info!(
        "Pre-processing {:?} through {} stage(s)",
        input,
        pipeline.len()
    );
    pipeline.execute(&volume)
}

/// Pre-process one NIfTI volume and save the result.
pub fn preprocess_volume_to_path(
    input: &Path,
    output: &Path,
    params: &PreprocessingParams,
) -> Result<()> {
    let processed = preprocess_volume_to_buffer(input, params)?;
    save_volume(&processed, output)
}

fn is_nifti(path: &Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name,
        None => return false,
    };
    name.ends_with(".nii") || name.ends_with(".nii.gz")
}

/// Pre-process every NIfTI file in `input_dir` into `output_dir`.
///
/// Non-NIfTI entries are skipped. With `continue_on_error`, a failing
/// subject is counted and the batch goes on; otherwise the first failure
/// aborts the run.
pub fn preprocess_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &PreprocessingParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    let mut entries: Vec<_> = std::fs::read_dir(input_dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        if !path.is_file() || !is_nifti(&path) {
            info!("Skipping non-NIfTI entry: {:?}", path);
            report.skipped += 1;
            continue;
        }
        let Some(file_name) = path.file_name() else {
            report.skipped += 1;
            continue;
        };
        let output = output_dir.join(file_name);
        info!("Processing: {:?} -> {:?}", path, output);
        match preprocess_volume_to_path(&path, &output, params) {
            Ok(()) => report.processed += 1,
            Err(e) if continue_on_error => {
                warn!("Error processing {:?}: {}", path, e);
                report.errors += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Batch complete: processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::{DenoiseParams, ResampleParams};
    use crate::image::IDENTITY_DIRECTION;
    use ndarray::Array3;

    fn write_test_volume(path: &Path, shape: (usize, usize, usize)) {
        let data = Array3::from_shape_fn(shape, |(x, y, z)| (x + y + z) as f32);
        let vol = Volume::new(data, [2.0, 2.0, 2.0], [0.0; 3], IDENTITY_DIRECTION).unwrap();
        save_volume(&vol, path).unwrap();
    }

    #[test]
    fn default_pipeline_has_three_stages() {
        let pipeline = build_pipeline(&PreprocessingParams::default()).unwrap();
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn empty_params_build_empty_pipeline() {
        let params = PreprocessingParams {
            denoise: None,
            resample: None,
            normalize: false,
            brain_mask: None,
            registration: None,
            preview_dir: None,
        };
        let pipeline = build_pipeline(&params).unwrap();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn end_to_end_single_volume() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("subject.nii");
        let output = dir.path().join("out/subject.nii");
        write_test_volume(&input, (8, 8, 8));

        let params = PreprocessingParams {
            denoise: Some(DenoiseParams::default()),
            resample: Some(ResampleParams::default()),
            normalize: true,
            brain_mask: None,
            registration: None,
            preview_dir: None,
        };
        preprocess_volume_to_path(&input, &output, &params).unwrap();

        let result = load_volume(&output).unwrap();
        // 8 voxels at 2 mm resampled to 1 mm.
        assert_eq!(result.shape(), [16, 16, 16]);
        // Normalized intensity range.
        assert!(result.min() >= 0.0 && result.max() <= 1.0);
    }

    #[test]
    fn batch_skips_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let input_dir = dir.path().join("in");
        let output_dir = dir.path().join("out");
        std::fs::create_dir_all(&input_dir).unwrap();
        write_test_volume(&input_dir.join("a.nii"), (6, 6, 6));
        write_test_volume(&input_dir.join("b.nii"), (6, 6, 6));
        std::fs::write(input_dir.join("notes.txt"), "not a volume").unwrap();
        // A file that claims to be NIfTI but is not readable as one.
        std::fs::write(input_dir.join("broken.nii"), "garbage").unwrap();

        let report = preprocess_directory_to_path(
            &input_dir,
            &output_dir,
            &PreprocessingParams::default(),
            true,
        )
        .unwrap();
        assert_eq!(report.processed, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.errors, 1);
        assert!(output_dir.join("a.nii").exists());
    }
}
