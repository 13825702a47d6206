//! Volume sampling at continuous indices.
//!
//! Three interpolators are supported: nearest neighbour, trilinear, and
//! cubic (Keys kernel, the B-spline-family choice of the resampling and
//! registration filters). Samples outside the volume yield the caller's
//! default value.
use ndarray::Array3;

use crate::types::Interpolation;

/// Sample `data` at a continuous index with the given method.
///
/// Coordinates outside `[0, n-1]` on any axis (or NaN) yield `default`.
pub fn sample(data: &Array3<f32>, index: [f64; 3], method: Interpolation, default: f32) -> f32 {
    let (nx, ny, nz) = data.dim();
    if nx == 0 || ny == 0 || nz == 0 {
        return default;
    }
    let dims = [nx, ny, nz];
    for axis in 0..3 {
        let c = index[axis];
        if !c.is_finite() || c < 0.0 || c > (dims[axis] - 1) as f64 {
            return default;
        }
    }
    match method {
        Interpolation::Nearest => sample_nearest(data, index),
        Interpolation::Linear => sample_linear(data, index),
        Interpolation::Bspline => sample_cubic(data, index),
    }
}

fn sample_nearest(data: &Array3<f32>, index: [f64; 3]) -> f32 {
    let (nx, ny, nz) = data.dim();
    let x = (index[0].round() as usize).min(nx - 1);
    let y = (index[1].round() as usize).min(ny - 1);
    let z = (index[2].round() as usize).min(nz - 1);
    data[[x, y, z]]
}

fn sample_linear(data: &Array3<f32>, index: [f64; 3]) -> f32 {
    let (nx, ny, nz) = data.dim();
    let x0 = index[0].floor() as usize;
    let y0 = index[1].floor() as usize;
    let z0 = index[2].floor() as usize;
    let x1 = (x0 + 1).min(nx - 1);
    let y1 = (y0 + 1).min(ny - 1);
    let z1 = (z0 + 1).min(nz - 1);
    let fx = index[0] - x0 as f64;
    let fy = index[1] - y0 as f64;
    let fz = index[2] - z0 as f64;

    let mut acc = 0.0_f64;
    for (xi, wx) in [(x0, 1.0 - fx), (x1, fx)] {
        for (yi, wy) in [(y0, 1.0 - fy), (y1, fy)] {
            for (zi, wz) in [(z0, 1.0 - fz), (z1, fz)] {
                let w = wx * wy * wz;
                if w != 0.0 {
                    acc += w * data[[xi, yi, zi]] as f64;
                }
            }
        }
    }
    acc as f32
}

/// Keys cubic convolution kernel with a = -0.5.
fn cubic_kernel(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        (1.5 * t - 2.5) * t * t + 1.0
    } else if t < 2.0 {
        ((-0.5 * t + 2.5) * t - 4.0) * t + 2.0
    } else {
        0.0
    }
}

fn sample_cubic(data: &Array3<f32>, index: [f64; 3]) -> f32 {
    let (nx, ny, nz) = data.dim();
    let dims = [nx as isize, ny as isize, nz as isize];
    let base = [
        index[0].floor() as isize,
        index[1].floor() as isize,
        index[2].floor() as isize,
    ];

    // Per-axis weights over the 4-tap support; edge taps clamp to the border.
    let mut weights = [[0.0_f64; 4]; 3];
    for axis in 0..3 {
        let frac = index[axis] - base[axis] as f64;
        for (tap, w) in weights[axis].iter_mut().enumerate() {
            *w = cubic_kernel(frac - (tap as f64 - 1.0));
        }
    }

    let mut acc = 0.0_f64;
    for (tx, &wx) in weights[0].iter().enumerate() {
        let xi = (base[0] + tx as isize - 1).clamp(0, dims[0] - 1) as usize;
        for (ty, &wy) in weights[1].iter().enumerate() {
            let yi = (base[1] + ty as isize - 1).clamp(0, dims[1] - 1) as usize;
            for (tz, &wz) in weights[2].iter().enumerate() {
                let zi = (base[2] + tz as isize - 1).clamp(0, dims[2] - 1) as usize;
                acc += wx * wy * wz * data[[xi, yi, zi]] as f64;
            }
        }
    }
    acc as f32
}
