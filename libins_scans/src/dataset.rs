use std::path::Path;

use super::config::FileLabel;
use super::error::{ScanFileError, TakinFileError};
use super::scan_file::read_scan_table;
use super::takin::read_takin_table;

/// One measured point ready for plotting: monitor-normalized counts with the
/// counting error sqrt(CNTS)/M1, tagged with the source file's labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPoint {
    pub energy: f64,
    pub intensity: f64,
    pub error: f64,
    pub delta: f64,
    pub temperature: f64,
}

/// One simulated point: Takin S(Q,E) mapped onto the measured intensity scale
#[derive(Debug, Clone, PartialEq)]
pub struct SimPoint {
    pub energy: f64,
    pub intensity: f64,
    pub delta: f64,
    pub temperature: f64,
}

/// Read every labeled scan file under `dir` and concatenate the normalized
/// points in file-list order.
///
/// Missing files are skipped with a warning; any other read error aborts.
/// Rows with a non-positive monitor count cannot be normalized and are
/// dropped with a warning.
pub fn read_labeled_scans(
    dir: &Path,
    labels: &[FileLabel],
    columns: &[String],
) -> Result<Vec<ScanPoint>, ScanFileError> {
    let selection: Vec<&str> = columns.iter().map(String::as_str).collect();
    let mut points = Vec::new();
    for label in labels {
        let path = dir.join(&label.file);
        let table = match read_scan_table(&path, &selection) {
            Ok(t) => t,
            Err(ScanFileError::BadFilePath(p)) => {
                log::warn!("Scan file not found: {}. Skipping.", p.display());
                continue;
            }
            Err(e) => return Err(e),
        };
        let en = table
            .column_index("EN")
            .ok_or_else(|| ScanFileError::MissingColumn(String::from("EN"), path.clone()))?;
        let m1 = table
            .column_index("M1")
            .ok_or_else(|| ScanFileError::MissingColumn(String::from("M1"), path.clone()))?;
        let cnts = table
            .column_index("CNTS")
            .ok_or_else(|| ScanFileError::MissingColumn(String::from("CNTS"), path.clone()))?;
        for row in table.rows() {
            let monitor = row[m1];
            if !(monitor > 0.0) {
                log::warn!(
                    "Row with non-positive monitor count M1={monitor} in {}, cannot normalize. Skipping.",
                    path.display()
                );
                continue;
            }
            let counts = row[cnts];
            points.push(ScanPoint {
                energy: row[en],
                intensity: counts / monitor,
                error: counts.sqrt() / monitor,
                delta: label.delta,
                temperature: label.temperature,
            });
        }
    }
    Ok(points)
}

/// Read every labeled Takin file under `dir`, applying the configured linear
/// intensity calibration, concatenated in file-list order.
pub fn read_labeled_takin(
    dir: &Path,
    labels: &[FileLabel],
    columns: &[String],
    scale: f64,
    offset: f64,
) -> Result<Vec<SimPoint>, TakinFileError> {
    let mut points = Vec::new();
    for label in labels {
        let path = dir.join(&label.file);
        let table = match read_takin_table(&path, columns) {
            Ok(t) => t,
            Err(TakinFileError::BadFilePath(p)) => {
                log::warn!("Takin file not found: {}. Skipping.", p.display());
                continue;
            }
            Err(e) => return Err(e),
        };
        let e = table
            .column_index("E")
            .ok_or_else(|| TakinFileError::MissingColumn(String::from("E")))?;
        let sqe = table
            .column_index("S(Q,E)")
            .ok_or_else(|| TakinFileError::MissingColumn(String::from("S(Q,E)")))?;
        for row in table.rows() {
            points.push(SimPoint {
                energy: row[e],
                intensity: row[sqe] * scale + offset,
                delta: label.delta,
                temperature: label.temperature,
            });
        }
    }
    Ok(points)
}
