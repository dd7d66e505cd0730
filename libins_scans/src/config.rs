use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::merge::ScanConstant;

/// Configuration for the merge pipeline. Contains the scan file list, pathing
/// and the tolerance-binning parameters.
/// Configs are serializable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    pub scan_files: Vec<String>,
    pub data_dir: PathBuf,
    pub save_file: String,
    pub save_dir: PathBuf,
    pub scan_constant: ScanConstant,
    pub step_size: f64,
}

impl Default for MergeConfig {
    /// Generate a new MergeConfig object with placeholder values
    fn default() -> Self {
        Self {
            scan_files: vec![],
            data_dir: PathBuf::from("./rawdata"),
            save_file: String::from("merged_scans"),
            save_dir: PathBuf::from("./merged_data"),
            scan_constant: ScanConstant::En,
            step_size: 0.005,
        }
    }
}

impl MergeConfig {
    /// Read the configuration in a YAML file
    /// Returns a MergeConfig if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Path the merged table will be written to
    pub fn save_path(&self) -> PathBuf {
        self.save_dir.join(format!("{}.txt", self.save_file))
    }
}

/// One input file together with the labels attached to every row read from it.
/// Delta is the configured momentum-offset label of the scan, not derived from
/// the data; temperature is the nominal sample temperature in Kelvin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLabel {
    pub file: String,
    pub delta: f64,
    pub temperature: f64,
}

/// Linear intensity calibration applied to Takin S(Q,E) output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakinParams {
    pub scale: f64,
    pub offset: f64,
}

impl Default for TakinParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

/// Axis ranges, tick steps, titles and output names for both plot modes.
///
/// x is energy transfer (meV), y is normalized intensity. The delta axis only
/// applies to the 3D mode, where the per-scan delta label becomes the depth
/// axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotParams {
    pub x_min: f64,
    pub x_max: f64,
    pub x_tick: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub y_tick: f64,
    pub delta_min: f64,
    pub delta_max: f64,
    pub delta_tick: f64,
    pub title_2d: String,
    pub title_3d: String,
    pub output_2d_filename: String,
    pub output_3d_filename: String,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 16.25,
            x_tick: 2.0,
            y_min: 0.0,
            y_max: 0.0018,
            y_tick: 0.0005,
            delta_min: -0.07,
            delta_max: 0.0,
            delta_tick: 0.015,
            title_2d: String::from(""),
            title_3d: String::from(""),
            output_2d_filename: String::from("comparison_2d.png"),
            output_3d_filename: String::from("comparison_3d.png"),
        }
    }
}

/// Configuration for the analysis/plot pipeline: labeled raw and simulation
/// file lists, the columns to read from each, and the plot styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub data_dir: PathBuf,
    pub takin_dir: PathBuf,
    pub save_dir: PathBuf,
    pub scan_files: Vec<FileLabel>,
    pub takin_files: Vec<FileLabel>,
    pub scan_columns: Vec<String>,
    pub takin_columns: Vec<String>,
    pub takin: TakinParams,
    pub plot: PlotParams,
}

impl Default for AnalysisConfig {
    /// Generate a new AnalysisConfig object with the standard IN8 column sets
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./rawdata"),
            takin_dir: PathBuf::from("./takin"),
            save_dir: PathBuf::from("./plots"),
            scan_files: vec![],
            takin_files: vec![],
            scan_columns: ["QH", "QK", "QL", "EN", "M1", "CNTS"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            takin_columns: ["h", "k", "l", "E", "S(Q,E)"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            takin: TakinParams::default(),
            plot: PlotParams::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read the configuration in a YAML file
    /// Returns an AnalysisConfig if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_config_roundtrip() {
        let config = MergeConfig::default();
        let yaml_str = serde_yaml::to_string(&config).unwrap();
        let back = serde_yaml::from_str::<MergeConfig>(&yaml_str).unwrap();
        assert_eq!(back.scan_constant, ScanConstant::En);
        assert_eq!(back.step_size, config.step_size);
        assert_eq!(back.save_file, config.save_file);
    }

    #[test]
    fn test_analysis_config_roundtrip() {
        let config = AnalysisConfig::default();
        let yaml_str = serde_yaml::to_string(&config).unwrap();
        let back = serde_yaml::from_str::<AnalysisConfig>(&yaml_str).unwrap();
        assert_eq!(back.scan_columns, config.scan_columns);
        assert_eq!(back.takin_columns.last().unwrap(), "S(Q,E)");
        assert_eq!(back.plot.x_max, config.plot.x_max);
    }

    #[test]
    fn test_missing_config_file() {
        let result = MergeConfig::read_config_file(std::path::Path::new(
            "/definitely/not/a/real/config.yaml",
        ));
        assert!(matches!(result, Err(ConfigError::BadFilePath(_))));
    }

    #[test]
    fn test_missing_field_is_parse_error() {
        let yaml_str = "scan_files: []\ndata_dir: ./rawdata\n";
        let result = serde_yaml::from_str::<MergeConfig>(yaml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_scan_constant_rejected() {
        let mut config = MergeConfig::default();
        config.scan_files = vec![String::from("042802")];
        let yaml_str = serde_yaml::to_string(&config)
            .unwrap()
            .replace("scan_constant: EN", "scan_constant: QK");
        let result = serde_yaml::from_str::<MergeConfig>(&yaml_str);
        assert!(result.is_err());
    }
}
