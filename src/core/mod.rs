//! Core processing building blocks: the pre-processing filters, pipeline
//! chaining, parameter presets, and SNR estimation. These are the primitives
//! consumed by the high-level `api` module.
pub mod filters;
pub mod params;
pub mod snr;
