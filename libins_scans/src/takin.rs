use std::path::Path;

use super::error::TakinFileError;
use super::scan_file::ScanTable;

/// Lines beginning with this marker are comments in Takin output
const COMMENT_MARKER: char = '#';

/// Read a Takin simulation output file into a ScanTable.
///
/// The format carries no header row, so column names are supplied by the
/// caller and assigned to fields left to right. Comment lines and empty lines
/// are skipped; extra trailing fields beyond the named columns are ignored.
pub fn read_takin_table(path: &Path, columns: &[String]) -> Result<ScanTable, TakinFileError> {
    if !path.exists() {
        return Err(TakinFileError::BadFilePath(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;

    let mut table = ScanTable::new(columns.to_vec());
    for (offset, line) in contents.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < columns.len() {
            return Err(TakinFileError::MalformedRow(offset + 1, path.to_path_buf()));
        }
        let mut row = Vec::with_capacity(columns.len());
        for (raw, col) in fields.iter().zip(columns.iter()) {
            let value: f64 = raw.parse().map_err(|_| {
                TakinFileError::BadFloat(raw.to_string(), col.clone(), path.to_path_buf())
            })?;
            row.push(value);
        }
        table.push_row(row);
    }

    log::info!(
        "Read {} ({} simulated points)",
        path.display(),
        table.n_rows()
    );
    Ok(table)
}
