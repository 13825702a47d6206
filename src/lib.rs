#![doc = r#"
MRIPRO — a brain MRI pre-processing toolkit.

This crate provides a typed, ergonomic API for pre-processing brain MRI
volumes before segmentation or analysis: Wiener denoising, grid resampling,
min-max intensity normalization, skull stripping by brain mask, and atlas
registration with precomputed transforms. It also ships standalone plotting
helpers that render metric box plots and intensity histograms to PNG.

Volumes are read and written as NIfTI (`.nii` / `.nii.gz`); filters operate
on an in-memory [`Volume`] carrying spacing, origin, and direction metadata
so physical geometry survives every step.

Quick start: pre-process a volume to a file
-------------------------------------------
```rust,no_run
use std::path::Path;
use mripro::{PreprocessingParams, preprocess_volume_to_path};

fn main() -> mripro::Result<()> {
    // Denoise (kernel 3, noise 0.1), resample to 1 mm, normalize to [0, 1].
    let params = PreprocessingParams::default();
    preprocess_volume_to_path(
        Path::new("/data/subject_t1.nii.gz"),
        Path::new("/out/subject_t1.nii.gz"),
        &params,
    )
}
```

Compose a pipeline by hand
--------------------------
```rust,no_run
use std::path::Path;
use mripro::{
    AtlasRegistration, AtlasRegistrationParams, AffineTransform, Interpolation,
    IntensityNormalization, Pipeline, Resampling, WienerDenoising, load_volume,
};

fn main() -> mripro::Result<()> {
    let subject = load_volume(Path::new("/data/subject_t1.nii.gz"))?;
    let atlas = load_volume(Path::new("/data/atlas_t1.nii.gz"))?;
    let transform = AffineTransform::from_json_file(Path::new("/data/subject_to_atlas.json"))?;

    let mut pipeline = Pipeline::new();
    pipeline.push(Box::new(WienerDenoising::new(3, Some(0.1))));
    pipeline.push(Box::new(Resampling::new([1.0, 1.0, 1.0], Interpolation::Linear)));
    pipeline.push(Box::new(IntensityNormalization::new()));
    pipeline.push(Box::new(AtlasRegistration::new(
        AtlasRegistrationParams::new(atlas, transform, false),
    )));

    let processed = pipeline.execute(&subject)?;
    println!("output shape: {:?}", processed.shape());
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use mripro::{PreprocessingParams, preprocess_directory_to_path};

fn main() -> mripro::Result<()> {
    let report = preprocess_directory_to_path(
        Path::new("/data/subjects"),
        Path::new("/out"),
        &PreprocessingParams::default(),
        true, // continue_on_error
    )?;
    println!(
        "processed={} skipped={} errors={}",
        report.processed, report.skipped, report.errors
    );
    Ok(())
}
```

Plotting
--------
```rust,no_run
use std::path::Path;
use mripro::plot::{ResultsTable, boxplot_labels};

fn main() -> mripro::Result<()> {
    let table = ResultsTable::from_csv_path(Path::new("/out/results.csv"))?;
    boxplot_labels(
        &table,
        &["DICE", "HDRFDST"],
        &["WhiteMatter", "GreyMatter", "Hippocampus"],
        "baseline",
        Path::new("/out/plots"),
    )?;
    Ok(())
}
```

Error handling
--------------
All public functions return `mripro::Result<T>`; match on `mripro::Error`
to handle specific cases, e.g. NIfTI reader errors or shape mismatches.

Useful modules
--------------
- [`api`] — high-level, ergonomic entry points.
- [`core`] — filters, pipeline, parameters, and SNR estimation.
- [`image`] — the `Volume` type, affine transforms, and interpolators.
- [`io`] — NIfTI readers/writers and preview/plot image writers.
- [`plot`] — box-plot and histogram rendering.
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod image;
pub mod io;
pub mod plot;
pub mod types;

// Curated public API surface
// Types
pub use core::params::{
    DenoiseParams, PreprocessingParams, RegistrationParams, ResampleParams,
};
pub use error::{Error, Result};
pub use image::{AffineTransform, Volume};
pub use types::{Interpolation, Plane};

// Filters and pipeline
pub use core::filters::{
    AtlasRegistration, AtlasRegistrationParams, IntensityNormalization, Pipeline, Resampling,
    SkullStripping, SkullStrippingParams, VolumeFilter, WienerDenoising,
};
pub use core::snr::{SnrEstimate, estimate_snr_histogram};

// Readers and writers
pub use io::nifti::{load_volume, save_volume};

// High-level API re-exports
pub use api::{
    BatchReport, build_pipeline, preprocess_directory_to_path, preprocess_volume_to_buffer,
    preprocess_volume_to_path,
};
