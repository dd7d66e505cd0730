use std::path::Path;

use fxhash::FxHashMap;

use super::error::ScanFileError;

/// Number of instrument metadata lines before the column-name row in an ILL
/// scan file. The preamble is copied verbatim into merge output, never parsed.
pub const SCAN_HEADER_LINES: usize = 58;

/// An ordered numeric table: named columns, f64 cells, rows in file order.
///
/// Missing values are represented as NaN (the literal `nan` in the file).
#[derive(Debug, Clone, Default)]
pub struct ScanTable {
    columns: Vec<String>,
    index: FxHashMap<String, usize>,
    rows: Vec<Vec<f64>>,
}

impl ScanTable {
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().map(|r| r.as_slice())
    }

    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.rows[row][column]
    }

    pub fn push_row(&mut self, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Append all rows of another table with the same column layout
    pub fn append(&mut self, mut other: ScanTable) {
        debug_assert_eq!(self.columns, other.columns);
        self.rows.append(&mut other.rows);
    }
}

/// Read the selected columns of an instrument scan file into a ScanTable.
///
/// The fixed instrument preamble is skipped, the next line is taken as the
/// column-name row, and every remaining non-empty line is parsed as one
/// whitespace-delimited numeric row. Columns are returned in the order of
/// `columns`, not file order.
pub fn read_scan_table(path: &Path, columns: &[&str]) -> Result<ScanTable, ScanFileError> {
    if !path.exists() {
        return Err(ScanFileError::BadFilePath(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;

    let mut lines = contents.lines().skip(SCAN_HEADER_LINES);
    let name_row = lines
        .next()
        .ok_or_else(|| ScanFileError::MissingHeader(SCAN_HEADER_LINES, path.to_path_buf()))?;
    let names: Vec<&str> = name_row.split_whitespace().collect();

    let mut picks = Vec::with_capacity(columns.len());
    for col in columns {
        match names.iter().position(|n| n == col) {
            Some(i) => picks.push(i),
            None => {
                return Err(ScanFileError::MissingColumn(
                    col.to_string(),
                    path.to_path_buf(),
                ))
            }
        }
    }

    let mut table = ScanTable::new(columns.iter().map(|c| c.to_string()).collect());
    for (offset, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        // 1-based line number in the file, past the preamble and name row
        let line_number = SCAN_HEADER_LINES + 2 + offset;
        let mut row = Vec::with_capacity(picks.len());
        for (&src, col) in picks.iter().zip(columns.iter()) {
            let raw = *fields
                .get(src)
                .ok_or_else(|| ScanFileError::MalformedRow(line_number, path.to_path_buf()))?;
            let value: f64 = raw.parse().map_err(|_| {
                ScanFileError::BadFloat(raw.to_string(), col.to_string(), path.to_path_buf())
            })?;
            row.push(value);
        }
        table.push_row(row);
    }

    log::info!(
        "Read {} ({}, {} rows)",
        path.display(),
        human_bytes::human_bytes(contents.len() as f64),
        table.n_rows()
    );
    Ok(table)
}

/// Read the first `n` lines of a file verbatim, as the merge-output preamble
pub fn read_header_lines(path: &Path, n: usize) -> Result<String, ScanFileError> {
    if !path.exists() {
        return Err(ScanFileError::BadFilePath(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let mut header = String::new();
    for line in contents.lines().take(n) {
        header.push_str(line);
        header.push('\n');
    }
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_scan_fixture(
        dir: &Path,
        name: &str,
        column_row: &str,
        data_rows: &[&str],
    ) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for i in 0..SCAN_HEADER_LINES {
            writeln!(file, "INSTR_META_{i}: value").unwrap();
        }
        writeln!(file, "{column_row}").unwrap();
        for row in data_rows {
            writeln!(file, "{row}").unwrap();
        }
        path
    }

    #[test]
    fn test_reads_selected_columns_after_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scan_fixture(
            dir.path(),
            "042802",
            "PNT QH EN M1 CNTS",
            &["1 2.0 9.001 100.0 400.0", "2 2.0 9.002 100.0 20.0"],
        );
        let table = read_scan_table(&path, &["EN", "CNTS"]).unwrap();
        assert_eq!(table.columns(), ["EN", "CNTS"]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.value(0, 0), 9.001);
        assert_eq!(table.value(1, 1), 20.0);
    }

    #[test]
    fn test_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scan_fixture(dir.path(), "042802", "PNT QH EN", &["1 2.0 9.0"]);
        let result = read_scan_table(&path, &["CNTS"]);
        assert!(matches!(result, Err(ScanFileError::MissingColumn(c, _)) if c == "CNTS"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_scan_table(&dir.path().join("nope"), &["EN"]);
        assert!(matches!(result, Err(ScanFileError::BadFilePath(_))));
    }

    #[test]
    fn test_file_shorter_than_preamble() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short");
        std::fs::write(&path, "only\nthree\nlines\n").unwrap();
        let result = read_scan_table(&path, &["EN"]);
        assert!(matches!(result, Err(ScanFileError::MissingHeader(_, _))));
    }

    #[test]
    fn test_bad_float() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scan_fixture(dir.path(), "042802", "PNT EN", &["1 not_a_number"]);
        let result = read_scan_table(&path, &["EN"]);
        assert!(matches!(result, Err(ScanFileError::BadFloat(v, c, _)) if v == "not_a_number" && c == "EN"));
    }

    #[test]
    fn test_nan_literal_becomes_missing_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scan_fixture(dir.path(), "042802", "PNT EN", &["1 nan"]);
        let table = read_scan_table(&path, &["EN"]).unwrap();
        assert!(table.value(0, 0).is_nan());
    }

    #[test]
    fn test_short_data_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scan_fixture(dir.path(), "042802", "PNT QH EN", &["1 2.0"]);
        let result = read_scan_table(&path, &["EN"]);
        assert!(matches!(result, Err(ScanFileError::MalformedRow(60, _))));
    }

    #[test]
    fn test_header_lines_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scan_fixture(dir.path(), "042802", "PNT EN", &["1 9.0"]);
        let header = read_header_lines(&path, SCAN_HEADER_LINES).unwrap();
        assert_eq!(header.lines().count(), SCAN_HEADER_LINES);
        assert!(header.starts_with("INSTR_META_0: value\n"));
        assert!(!header.contains("PNT"));
    }
}
