use tracing::info;

use mripro::api::{preprocess_directory_to_path, preprocess_volume_to_path};
use mripro::core::params::{
    DenoiseParams, PreprocessingParams, RegistrationParams, ResampleParams,
};

use super::args::CliArgs;
use super::errors::AppError;

/// Parse `--spacing`: one positive value (isotropic), three comma-separated
/// values, or "original" for no resampling.
fn parse_spacing(spacing: &str) -> Result<Option<[f64; 3]>, AppError> {
    if spacing == "original" {
        return Ok(None);
    }
    let invalid = || AppError::InvalidSpacing {
        spacing: spacing.to_string(),
    };
    let parts: Vec<&str> = spacing.split(',').collect();
    let values: Vec<f64> = parts
        .iter()
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| invalid())?;
    let target = match values.as_slice() {
        [iso] => [*iso; 3],
        [x, y, z] => [*x, *y, *z],
        _ => return Err(invalid()),
    };
    if target.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
        return Err(invalid());
    }
    Ok(Some(target))
}

/// Parse `--noise-power`: a non-negative number, or "auto" to estimate.
fn parse_noise_power(value: &str) -> Result<Option<f64>, AppError> {
    if value == "auto" {
        return Ok(None);
    }
    let parsed = value.parse::<f64>().map_err(|_| AppError::InvalidNoisePower {
        value: value.to_string(),
    })?;
    if !(parsed.is_finite() && parsed >= 0.0) {
        return Err(AppError::InvalidNoisePower {
            value: value.to_string(),
        });
    }
    Ok(Some(parsed))
}

fn params_from_args(args: &CliArgs) -> Result<PreprocessingParams, AppError> {
    let denoise = if args.no_denoise {
        None
    } else {
        Some(DenoiseParams {
            kernel_size: args.denoise_kernel,
            noise_power: parse_noise_power(&args.noise_power)?,
        })
    };

    let resample = parse_spacing(&args.spacing)?.map(|target_spacing| ResampleParams {
        target_spacing,
        interpolation: args.interpolation,
    });

    let registration = match (&args.atlas, &args.transform) {
        (Some(atlas), Some(transform)) => Some(RegistrationParams {
            atlas: atlas.clone(),
            transform: transform.clone(),
            is_label_map: args.label_map,
        }),
        (None, None) => None,
        _ => return Err(AppError::AtlasWithoutTransform),
    };

    Ok(PreprocessingParams {
        denoise,
        resample,
        normalize: !args.no_normalize,
        brain_mask: args.mask.clone(),
        registration,
        preview_dir: args.preview_dir.clone(),
    })
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let params = params_from_args(&args)?;
    let batch_mode = args.batch || args.input_dir.is_some();

    if batch_mode {
        let input_dir = args.input_dir.ok_or(AppError::MissingArgument {
            arg: "--input-dir".to_string(),
        })?;
        let output_dir = args.output_dir.ok_or(AppError::MissingArgument {
            arg: "--output-dir".to_string(),
        })?;

        info!("Starting batch processing from directory: {:?}", input_dir);
        info!("Output directory: {:?}", output_dir);

        let report = preprocess_directory_to_path(&input_dir, &output_dir, &params, true)?;

        info!("Batch processing complete!");
        info!("Processed: {}", report.processed);
        info!("Skipped: {}", report.skipped);
        info!("Errors: {}", report.errors);
    } else {
        let input = args.input.ok_or(AppError::MissingArgument {
            arg: "--input".to_string(),
        })?;
        let output = args.output.ok_or(AppError::MissingArgument {
            arg: "--output".to_string(),
        })?;

        preprocess_volume_to_path(&input, &output, &params)?;
        info!("Successfully processed: {:?} -> {:?}\n", input, output);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_parses_isotropic_and_per_axis() {
        assert_eq!(parse_spacing("1.0").unwrap(), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_spacing("0.6,0.6,1.2").unwrap(), Some([0.6, 0.6, 1.2]));
        assert_eq!(parse_spacing("original").unwrap(), None);
        assert!(parse_spacing("0").is_err());
        assert!(parse_spacing("1,2").is_err());
        assert!(parse_spacing("abc").is_err());
    }

    #[test]
    fn noise_power_parses_auto_and_values() {
        assert_eq!(parse_noise_power("0.1").unwrap(), Some(0.1));
        assert_eq!(parse_noise_power("auto").unwrap(), None);
        assert!(parse_noise_power("-1").is_err());
        assert!(parse_noise_power("abc").is_err());
    }
}
