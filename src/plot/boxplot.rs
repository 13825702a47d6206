//! Box-plot and histogram rendering.
//!
//! Styling follows the course plots: grey boxes with black medians, no
//! whisker caps, flier dots, a red dashed line at the overall median,
//! thick left/bottom spines and no top/right spines. Plots are written as
//! `<name>_<timestamp>.png` with a JSON sidecar holding the annotations.
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::image::Volume;
use crate::io::writers::png::write_rgb_png;
use crate::plot::canvas::{BLACK, Canvas, GREY, RED, WHITE};
use crate::plot::stats::{BoxStats, median};
use crate::plot::table::ResultsTable;

const WIDTH: usize = 1000;
const HEIGHT: usize = 600;
const MARGIN_LEFT: usize = 80;
const MARGIN_RIGHT: usize = 20;
const MARGIN_TOP: usize = 40;
const MARGIN_BOTTOM: usize = 50;

/// Textual annotations the raster cannot carry; written next to the PNG.
#[derive(Debug, Serialize)]
struct PlotSidecar<'a> {
    title: String,
    xlabel: &'a str,
    ylabel: &'a str,
    x_tick_labels: Vec<String>,
    overall_median: Option<f64>,
    ylim: [f64; 2],
    generated: String,
}

/// One box plot per metric, one box per label, saved under `output_dir`.
/// Returns the written PNG paths.
pub fn boxplot_labels(
    table: &ResultsTable,
    metrics: &[&str],
    labels: &[&str],
    title: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if labels.is_empty() {
        return Err(Error::MissingArgument {
            arg: "labels".to_string(),
        });
    }
    let mut written = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        let mut groups = Vec::with_capacity(labels.len());
        for &label in labels {
            let values = table.values(label, metric);
            if values.is_empty() {
                return Err(Error::Processing(format!(
                    "no values for label {:?}, metric {:?}",
                    label, metric
                )));
            }
            groups.push(BoxStats::from_values(&values)?);
        }
        let all = table.metric_values(metric);
        let overall_median = median(&all)?;

        // Bottom pinned to zero, top follows the data.
        let data_max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let top = if data_max > 0.0 { data_max * 1.05 } else { 1.0 };
        let ylim = [0.0, top];

        let canvas = render_box_canvas(&groups, Some(overall_median), ylim);
        let sidecar = PlotSidecar {
            title: format!("{}:{}", metric, title),
            xlabel: "LABEL",
            ylabel: metric,
            x_tick_labels: labels.iter().map(|&l| l.to_string()).collect(),
            overall_median: Some(overall_median),
            ylim,
            generated: Local::now().to_rfc3339(),
        };
        written.push(save_plot(
            &canvas,
            &sidecar,
            &format!("{}_{}", metric, title),
            output_dir,
        )?);
    }
    Ok(written)
}

/// One box per experiment series for a single metric.
pub fn boxplot_experiment_comparison(
    series: &[Vec<f64>],
    metric: &str,
    x_titles: &[&str],
    title: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    if series.is_empty() {
        return Err(Error::MissingArgument {
            arg: "series".to_string(),
        });
    }
    if series.len() != x_titles.len() {
        return Err(Error::Processing(format!(
            "{} series but {} x titles",
            series.len(),
            x_titles.len()
        )));
    }
    let mut groups = Vec::with_capacity(series.len());
    for values in series {
        groups.push(BoxStats::from_values(values)?);
    }
    let all: Vec<f64> = series.iter().flatten().copied().collect();
    let overall_median = median(&all)?;

    // [0, 1] expanded to cover the data.
    let data_min = all.iter().copied().fold(f64::INFINITY, f64::min);
    let data_max = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ylim = [data_min.min(0.0), data_max.max(1.0)];

    let canvas = render_box_canvas(&groups, Some(overall_median), ylim);
    let sidecar = PlotSidecar {
        title: format!("{}:{}", metric, title),
        xlabel: "",
        ylabel: metric,
        x_tick_labels: x_titles.iter().map(|&t| t.to_string()).collect(),
        overall_median: Some(overall_median),
        ylim,
        generated: Local::now().to_rfc3339(),
    };
    save_plot(&canvas, &sidecar, &format!("{}_{}", metric, title), output_dir)
}

/// Bar plot of a volume's intensity histogram.
pub fn plot_histogram(volume: &Volume, bins: usize, output_dir: &Path) -> Result<PathBuf> {
    if bins == 0 {
        return Err(Error::InvalidArgument {
            arg: "bins",
            value: bins.to_string(),
        });
    }
    let min = volume.min() as f64;
    let max = volume.max() as f64;
    let range = max - min;

    let mut counts = vec![0u64; bins];
    if range > 0.0 {
        for &v in volume.data() {
            let mut bin = (((v as f64) - min) / range * bins as f64) as usize;
            if bin >= bins {
                bin = bins - 1;
            }
            counts[bin] += 1;
        }
    } else {
        counts[0] = volume.data().len() as u64;
    }

    let canvas = render_histogram_canvas(&counts);
    let edges: Vec<String> = (0..=bins)
        .map(|i| format!("{:.2}", min + range * i as f64 / bins as f64))
        .collect();
    let peak = counts.iter().copied().max().unwrap_or(0);
    let sidecar = PlotSidecar {
        title: "Histogram of Image Intensities".to_string(),
        xlabel: "Intensity",
        ylabel: "Frequency",
        x_tick_labels: edges,
        overall_median: None,
        ylim: [0.0, peak as f64],
        generated: Local::now().to_rfc3339(),
    };
    save_plot(&canvas, &sidecar, "histogram_plot", output_dir)
}

struct Axes {
    left: usize,
    top: usize,
    width: usize,
    height: usize,
    ymin: f64,
    ymax: f64,
}

impl Axes {
    fn new(ylim: [f64; 2]) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: WIDTH - MARGIN_LEFT - MARGIN_RIGHT,
            height: HEIGHT - MARGIN_TOP - MARGIN_BOTTOM,
            ymin: ylim[0],
            ymax: ylim[1],
        }
    }

    fn bottom(&self) -> usize {
        self.top + self.height
    }

    fn y_px(&self, value: f64) -> usize {
        let span = self.ymax - self.ymin;
        let frac = if span > 0.0 {
            ((value - self.ymin) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.top + ((1.0 - frac) * (self.height - 1) as f64).round() as usize
    }

    /// Left/bottom spines (thick) and tick marks; top/right spines absent.
    fn draw_frame(&self, canvas: &mut Canvas, group_centers: &[usize]) {
        canvas.vline(self.left.saturating_sub(2), self.top, self.bottom(), BLACK, 2);
        canvas.hline(self.bottom(), self.left.saturating_sub(2), self.left + self.width, BLACK, 2);
        for tick in 0..=4 {
            let y = self.top + self.height * tick / 4;
            canvas.hline(y, self.left.saturating_sub(8), self.left.saturating_sub(3), BLACK, 1);
        }
        for &cx in group_centers {
            canvas.vline(cx, self.bottom() + 2, self.bottom() + 7, BLACK, 1);
        }
    }
}

fn render_box_canvas(groups: &[BoxStats], overall_median: Option<f64>, ylim: [f64; 2]) -> Canvas {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, WHITE);
    let axes = Axes::new(ylim);
    let n = groups.len().max(1);
    let slot = axes.width / n;
    let box_width = ((slot as f64 * 0.6) as usize).max(1);

    let centers: Vec<usize> = (0..groups.len())
        .map(|i| axes.left + slot * i + slot / 2)
        .collect();

    for (stats, &cx) in groups.iter().zip(&centers) {
        let bx = cx.saturating_sub(box_width / 2);
        let q3_px = axes.y_px(stats.q3);
        let q1_px = axes.y_px(stats.q1);
        canvas.fill_rect(bx, q3_px, box_width, q1_px.saturating_sub(q3_px) + 1, GREY);

        // Whiskers without caps.
        canvas.vline(cx, axes.y_px(stats.whisker_high), q3_px, BLACK, 1);
        canvas.vline(cx, q1_px, axes.y_px(stats.whisker_low), BLACK, 1);

        canvas.hline(axes.y_px(stats.median), bx, bx + box_width.saturating_sub(1), BLACK, 2);

        for &flier in &stats.fliers {
            canvas.dot(cx, axes.y_px(flier), BLACK, 1);
        }
    }

    if let Some(m) = overall_median {
        canvas.dashed_hline(axes.y_px(m), axes.left, axes.left + axes.width - 1, RED, 2, 9, 5);
    }

    axes.draw_frame(&mut canvas, &centers);
    canvas
}

fn render_histogram_canvas(counts: &[u64]) -> Canvas {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, WHITE);
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);
    let axes = Axes::new([0.0, peak as f64]);
    let n = counts.len().max(1);
    let slot = axes.width / n;

    for (i, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x = axes.left + slot * i;
        let y = axes.y_px(count as f64);
        canvas.fill_rect(x, y, slot.saturating_sub(1).max(1), axes.bottom() - y, GREY);
    }

    axes.draw_frame(&mut canvas, &[]);
    canvas
}

fn save_plot(
    canvas: &Canvas,
    sidecar: &PlotSidecar<'_>,
    name: &str,
    output_dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let stem = format!("{}_{}", name.replace(' ', "_"), timestamp);

    let png_path = output_dir.join(format!("{}.png", stem));
    write_rgb_png(&png_path, canvas.width(), canvas.height(), canvas.as_bytes())
        .map_err(Error::external)?;

    let sidecar_path = output_dir.join(format!("{}.json", stem));
    let text = serde_json::to_string_pretty(sidecar).map_err(Error::external)?;
    std::fs::write(&sidecar_path, text)?;

    info!("plot saved to {:?}", png_path);
    Ok(png_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn sample_table() -> ResultsTable {
        ResultsTable::from_csv_str(
            "SUBJECT;LABEL;DICE\n\
             s01;WhiteMatter;0.80\n\
             s02;WhiteMatter;0.84\n\
             s03;WhiteMatter;0.82\n\
             s01;GreyMatter;0.70\n\
             s02;GreyMatter;0.74\n\
             s03;GreyMatter;0.72\n",
            ';',
        )
        .unwrap()
    }

    #[test]
    fn renders_boxes_and_median_line() {
        let groups = vec![
            BoxStats::from_values(&[0.2, 0.3, 0.4, 0.5]).unwrap(),
            BoxStats::from_values(&[0.6, 0.7, 0.8, 0.9]).unwrap(),
        ];
        let canvas = render_box_canvas(&groups, Some(0.5), [0.0, 1.0]);
        let mut has_grey = false;
        let mut has_red = false;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                match canvas.pixel(x, y) {
                    GREY => has_grey = true,
                    RED => has_red = true,
                    _ => {}
                }
            }
        }
        assert!(has_grey, "box bodies missing");
        assert!(has_red, "overall median line missing");
    }

    #[test]
    fn boxplot_labels_writes_png_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        let written = boxplot_labels(
            &table,
            &["DICE"],
            &["WhiteMatter", "GreyMatter"],
            "baseline",
            dir.path(),
        )
        .unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].exists());
        let sidecar = written[0].with_extension("json");
        assert!(sidecar.exists());
        let text = std::fs::read_to_string(sidecar).unwrap();
        assert!(text.contains("DICE:baseline"));
        assert!(text.contains("WhiteMatter"));
    }

    #[test]
    fn unknown_label_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        assert!(boxplot_labels(&table, &["DICE"], &["Thalamus"], "t", dir.path()).is_err());
    }

    #[test]
    fn experiment_comparison_checks_titles() {
        let dir = tempfile::tempdir().unwrap();
        let series = vec![vec![0.1, 0.2], vec![0.3, 0.4]];
        assert!(
            boxplot_experiment_comparison(&series, "DICE", &["a"], "exp", dir.path()).is_err()
        );
        let path =
            boxplot_experiment_comparison(&series, "DICE", &["a", "b"], "exp", dir.path()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn histogram_plot_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let vol = Volume::from_data(Array3::from_shape_fn((8, 8, 8), |(x, y, z)| {
            (x + y + z) as f32
        }));
        let path = plot_histogram(&vol, 20, dir.path()).unwrap();
        assert!(path.exists());
        assert!(plot_histogram(&vol, 0, dir.path()).is_err());
    }
}
