use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ScanFileError {
    #[error("Could not open scan file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Scan file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Scan file {1:?} ended before the {0}-line instrument preamble and column row")]
    MissingHeader(usize, PathBuf),
    #[error("Column {0} was not found in scan file {1:?}")]
    MissingColumn(String, PathBuf),
    #[error("Could not parse value {0} in column {1} of scan file {2:?}")]
    BadFloat(String, String, PathBuf),
    #[error("Data line {0} of scan file {1:?} has too few columns")]
    MalformedRow(usize, PathBuf),
}

#[derive(Debug, Error)]
pub enum TakinFileError {
    #[error("Could not open Takin file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Takin file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Data line {0} of Takin file {1:?} has fewer fields than the configured column names")]
    MalformedRow(usize, PathBuf),
    #[error("Could not parse value {0} in column {1} of Takin file {2:?}")]
    BadFloat(String, String, PathBuf),
    #[error("Column {0} was not found among the configured Takin columns")]
    MissingColumn(String),
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Merge step size must be positive and finite, got {0}")]
    BadStepSize(f64),
    #[error("No scan data was loaded, nothing to merge")]
    NoDataLoaded,
    #[error("Merge rules reference column {0} which is not present in the loaded table")]
    MissingColumn(String),
    #[error("Merger failed due to scan file error: {0}")]
    ScanFile(#[from] ScanFileError),
    #[error("Merger failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("No data points were given to the plot renderer")]
    NoData,
    #[error("Plot renderer failed while drawing: {0}")]
    Render(String),
    #[error("Plot renderer failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis failed due to scan file error: {0}")]
    ScanFile(#[from] ScanFileError),
    #[error("Analysis failed due to Takin file error: {0}")]
    TakinFile(#[from] TakinFileError),
    #[error("Analysis failed due to plotting error: {0}")]
    Plot(#[from] PlotError),
    #[error("Analysis failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
}
