//! Plotting helpers for experiment metrics.
//!
//! Standalone presentation-layer glue: box plots of metric distributions
//! (per label, or across experiments) and intensity histograms, rendered on
//! a raster canvas and written as timestamped PNGs with a JSON sidecar
//! carrying the textual annotations.
pub mod boxplot;
pub mod canvas;
pub mod stats;
pub mod table;

pub use boxplot::{boxplot_experiment_comparison, boxplot_labels, plot_histogram};
pub use stats::{BoxStats, median, percentile};
pub use table::{ResultRow, ResultsTable};
