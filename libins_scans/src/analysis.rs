use std::path::PathBuf;

use super::config::AnalysisConfig;
use super::dataset::{read_labeled_scans, read_labeled_takin};
use super::error::AnalysisError;
use super::plot::{plot_2d, plot_3d};

/// Which comparison plot to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    TwoD,
    ThreeD,
}

impl PlotKind {
    /// Parse the CLI plot-type flag. Returns None for anything but 2D/3D.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "2D" => Some(PlotKind::TwoD),
            "3D" => Some(PlotKind::ThreeD),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlotKind::TwoD => write!(f, "2D"),
            PlotKind::ThreeD => write!(f, "3D"),
        }
    }
}

/// The main loop of the analysis pipeline.
///
/// Loads the labeled raw and Takin datasets named by the config and renders
/// the requested comparison plot. Returns the path of the written image, or
/// None if there was nothing to plot.
pub fn run_analysis(
    config: &AnalysisConfig,
    kind: PlotKind,
) -> Result<Option<PathBuf>, AnalysisError> {
    let scans = if config.scan_files.is_empty() {
        Vec::new()
    } else {
        log::info!("Reading original data...");
        read_labeled_scans(&config.data_dir, &config.scan_files, &config.scan_columns)?
    };
    let sims = if config.takin_files.is_empty() {
        Vec::new()
    } else {
        log::info!("Reading takin simulation data...");
        read_labeled_takin(
            &config.takin_dir,
            &config.takin_files,
            &config.takin_columns,
            config.takin.scale,
            config.takin.offset,
        )?
    };
    log::info!(
        "Loaded {} measured points and {} simulated points",
        scans.len(),
        sims.len()
    );

    if scans.is_empty() && sims.is_empty() {
        log::warn!("No data was loaded for the {kind} plot. Exiting.");
        return Ok(None);
    }

    std::fs::create_dir_all(&config.save_dir)?;
    let output = match kind {
        PlotKind::TwoD => config.save_dir.join(&config.plot.output_2d_filename),
        PlotKind::ThreeD => config.save_dir.join(&config.plot.output_3d_filename),
    };
    match kind {
        PlotKind::TwoD => plot_2d(&scans, &sims, &config.plot, &output)?,
        PlotKind::ThreeD => plot_3d(&scans, &sims, &config.plot, &output)?,
    }
    Ok(Some(output))
}
