//! Histogram-based SNR estimation.
//!
//! Splits the foreground intensities at the sparsest histogram bin (taken
//! as the noise threshold) and reports `20 * log10(mean(signal) /
//! std(noise))` in dB.
use crate::error::{Error, Result};
use crate::image::Volume;

const NUM_BINS: usize = 50;
const RANGE_MIN: f64 = 1.0;
const RANGE_MAX: f64 = 255.0;

/// SNR estimate plus the histogram it was derived from.
#[derive(Debug, Clone)]
pub struct SnrEstimate {
    pub snr_db: f64,
    pub noise_threshold: f64,
    pub histogram: Vec<u64>,
    pub bin_edges: Vec<f64>,
}

/// Estimate the SNR of a volume from its foreground intensity histogram.
///
/// Background (non-positive) voxels are masked out; the histogram spans
/// [1, 255] with 50 bins. A noise region with zero spread yields +inf.
pub fn estimate_snr_histogram(volume: &Volume) -> Result<SnrEstimate> {
    let foreground: Vec<f64> = volume
        .data()
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| v as f64)
        .collect();
    if foreground.is_empty() {
        return Err(Error::Processing(
            "SNR estimation requires foreground voxels, volume is all background".to_string(),
        ));
    }

    let width = (RANGE_MAX - RANGE_MIN) / NUM_BINS as f64;
    let mut histogram = vec![0u64; NUM_BINS];
    for &v in &foreground {
        if v < RANGE_MIN || v > RANGE_MAX {
            continue;
        }
        let mut bin = ((v - RANGE_MIN) / width) as usize;
        if bin >= NUM_BINS {
            bin = NUM_BINS - 1;
        }
        histogram[bin] += 1;
    }
    let bin_edges: Vec<f64> = (0..=NUM_BINS).map(|i| RANGE_MIN + i as f64 * width).collect();

    // The sparsest bin separates the noise floor from the signal mass.
    let noise_bin = histogram
        .iter()
        .enumerate()
        .min_by_key(|(_, &count)| count)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let noise_threshold = bin_edges[noise_bin];

    let noise: Vec<f64> = foreground.iter().copied().filter(|&v| v <= noise_threshold).collect();
    let signal: Vec<f64> = foreground.iter().copied().filter(|&v| v > noise_threshold).collect();
    if signal.is_empty() {
        return Err(Error::Processing(
            "SNR estimation found no signal voxels above the noise threshold".to_string(),
        ));
    }

    let signal_mean = signal.iter().sum::<f64>() / signal.len() as f64;
    let noise_std = if noise.is_empty() {
        0.0
    } else {
        let mean = noise.iter().sum::<f64>() / noise.len() as f64;
        (noise.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / noise.len() as f64).sqrt()
    };

    let snr_db = if noise_std == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (signal_mean / noise_std).log10()
    };

    Ok(SnrEstimate {
        snr_db,
        noise_threshold,
        histogram,
        bin_edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn all_background_is_an_error() {
        let vol = Volume::from_data(Array3::zeros((4, 4, 4)));
        assert!(estimate_snr_histogram(&vol).is_err());
    }

    #[test]
    fn clean_signal_has_infinite_snr() {
        // A single intensity: the noise region is empty, std is zero.
        let vol = Volume::from_data(Array3::from_elem((4, 4, 4), 200.0));
        let est = estimate_snr_histogram(&vol).unwrap();
        assert!(est.snr_db.is_infinite());
    }

    #[test]
    fn noisy_floor_lowers_snr() {
        // Low-intensity spread around 5 plus a strong signal mass at 200.
        let mut data = Array3::from_elem((10, 10, 10), 200.0);
        for (i, v) in data.iter_mut().enumerate().take(100) {
            *v = 3.0 + (i % 5) as f32;
        }
        let vol = Volume::from_data(data);
        let est = estimate_snr_histogram(&vol).unwrap();
        assert!(est.snr_db.is_finite());
        assert!(est.snr_db > 0.0);
        assert_eq!(est.histogram.len(), 50);
        assert_eq!(est.bin_edges.len(), 51);
    }

    #[test]
    fn histogram_counts_in_range_voxels() {
        let mut data = Array3::zeros((4, 4, 4));
        data[[0, 0, 0]] = 100.0;
        data[[1, 0, 0]] = 100.0;
        data[[2, 0, 0]] = 300.0; // outside [1, 255], not counted
        let vol = Volume::from_data(data);
        let est = estimate_snr_histogram(&vol).unwrap();
        assert_eq!(est.histogram.iter().sum::<u64>(), 2);
    }
}
