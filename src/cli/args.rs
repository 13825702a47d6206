use clap::Parser;
use std::path::PathBuf;

use mripro::types::Interpolation;

#[derive(Parser)]
#[command(name = "mripro", version, about = "MRIPRO CLI")]
pub struct CliArgs {
    /// Input NIfTI volume (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory containing NIfTI volumes (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output filename (single file mode)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing (batch mode)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Disable Wiener denoising
    #[arg(long, default_value_t = false)]
    pub no_denoise: bool,

    /// Wiener window size in voxels (odd)
    #[arg(long, default_value_t = 3)]
    pub denoise_kernel: usize,

    /// Wiener noise power, or "auto" to estimate it from the image
    #[arg(long, default_value = "0.1")]
    pub noise_power: String,

    /// Target voxel spacing in mm. Options:
    /// - Isotropic: a single value (e.g., 1.0)
    /// - Per-axis: three comma-separated values (e.g., 0.6,0.6,1.2)
    /// - Original: "original" (no resampling)
    #[arg(long, default_value = "1.0")]
    pub spacing: String,

    /// Interpolation used by resampling
    #[arg(long, value_enum, default_value_t = Interpolation::Nearest)]
    pub interpolation: Interpolation,

    /// Disable min-max intensity normalization
    #[arg(long, default_value_t = false)]
    pub no_normalize: bool,

    /// Brain mask volume for skull stripping
    #[arg(long)]
    pub mask: Option<PathBuf>,

    /// Atlas volume defining the registration output grid
    #[arg(long)]
    pub atlas: Option<PathBuf>,

    /// JSON affine transform mapping atlas points into subject space
    #[arg(long)]
    pub transform: Option<PathBuf>,

    /// Treat the input as a label map (nearest-neighbour registration)
    #[arg(long, default_value_t = false)]
    pub label_map: bool,

    /// Directory for per-stage mid-slice JPEG previews
    #[arg(long)]
    pub preview_dir: Option<PathBuf>,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Batch mode: continue processing other volumes when a subject fails
    #[arg(long, default_value_t = false)]
    pub batch: bool,
}
