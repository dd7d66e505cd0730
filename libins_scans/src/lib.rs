//! # ins_scans
//!
//! ins_scans is a small toolkit for inelastic neutron scattering (INS) data
//! taken at ILL triple-axis spectrometers, written in Rust. It merges repeated
//! scans by a tolerance-binned key and plots the measured intensity against
//! Takin simulation output for comparison.
//!
//! Two binaries sit on top of this library:
//!
//! - `ins_merge_cli` concatenates the scan files named in a configuration,
//!   bins them on QH or EN with a configurable step size, collapses each bin
//!   with per-column reduction rules (counts and times accumulate, coordinates
//!   and motor positions keep their first value), and writes the result as a
//!   fixed-width text table behind the original 58-line instrument preamble.
//! - `ins_analysis_cli` overlays monitor-normalized scan data and calibrated
//!   Takin curves in a 2D or 3D comparison plot.
//!
//! ## Configuration
//!
//! Both binaries read a YAML configuration; `<binary> new <path>` writes a
//! template to start from. The merge configuration looks like:
//!
//! ```yml
//! scan_files:
//! - '042802'
//! - '042807'
//! data_dir: ./rawdata
//! save_file: 2-20_300mK_CuCu_E_9meV
//! save_dir: ./merged_data
//! scan_constant: EN
//! step_size: 0.005
//! ```
//!
//! `scan_constant` selects the merge mode: a constant-QH scan is binned on EN
//! and a constant-EN scan on QH, with `step_size` the rounding step of the
//! tolerance bins.
//!
//! The analysis configuration names the labeled raw and simulation files
//! (each entry carries the file name, the delta offset label and the nominal
//! temperature), the columns to read from each format, the Takin intensity
//! calibration (`scale`, `offset`) and the plot axis ranges, tick steps,
//! titles and output file names.
//!
//! ## File formats
//!
//! Raw scan files are text: a fixed 58-line instrument preamble, one row of
//! column names, then whitespace-delimited numeric columns. Takin output has
//! no header; lines starting with `#` are comments and column names are
//! supplied by the configuration.
pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod merge;
pub mod plot;
pub mod scan_file;
pub mod takin;
