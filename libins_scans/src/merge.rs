use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::config::MergeConfig;
use super::error::{MergeError, ScanFileError};
use super::scan_file::{read_header_lines, read_scan_table, ScanTable, SCAN_HEADER_LINES};

/// Name of the derived grouping-key column appended to merge output
pub const TOLERANCE_BINS_COLUMN: &str = "tolerance_bins";

/// Minimum width of each column in the saved fixed-width table
const MIN_COLUMN_WIDTH: usize = 10;

/// Which quantity a scan holds constant. A constant-Q scan varies EN, so the
/// tolerance binning collapses repeated sweeps on EN; symmetric for
/// constant-E scans, which are binned on QH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanConstant {
    #[serde(rename = "QH")]
    Qh,
    #[serde(rename = "EN")]
    En,
}

impl ScanConstant {
    pub fn rule_set(&self) -> &'static RuleSet {
        match self {
            ScanConstant::Qh => &RULES_CONST_QH,
            ScanConstant::En => &RULES_CONST_EN,
        }
    }
}

impl std::fmt::Display for ScanConstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanConstant::Qh => write!(f, "QH"),
            ScanConstant::En => write!(f, "EN"),
        }
    }
}

/// How a value column is collapsed across the rows of one tolerance bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    /// First non-missing value in original row order; missing if the whole
    /// group is missing
    First,
    /// Sum over non-missing values; 0.0 if the whole group is missing
    Sum,
}

/// Grouping column plus the ordered per-column reduction table for one merge
/// mode. The table order is the output column order.
#[derive(Debug)]
pub struct RuleSet {
    pub group_column: &'static str,
    pub rules: &'static [(&'static str, Reduce)],
}

/// Counts and counting-time columns accumulate across repeated sweeps; every
/// motor position and coordinate keeps its first recorded value.
const VALUE_RULES: &[(&str, Reduce)] = &[
    ("PNT", Reduce::First),
    ("QH", Reduce::First),
    ("QK", Reduce::First),
    ("QL", Reduce::First),
    ("EN", Reduce::First),
    ("M1", Reduce::Sum),
    ("M2", Reduce::Sum),
    ("TIME", Reduce::Sum),
    ("CNTS", Reduce::Sum),
    ("A2", Reduce::First),
    ("A3", Reduce::First),
    ("A4", Reduce::First),
    ("A6", Reduce::First),
    ("QM", Reduce::First),
    ("TT", Reduce::First),
    ("TRT", Reduce::First),
    ("GU", Reduce::First),
    ("GL", Reduce::First),
];

pub static RULES_CONST_QH: RuleSet = RuleSet {
    group_column: "EN",
    rules: VALUE_RULES,
};

pub static RULES_CONST_EN: RuleSet = RuleSet {
    group_column: "QH",
    rules: VALUE_RULES,
};

/// Round a grouping value to the nearest multiple of the step size
pub fn tolerance_bin(value: f64, step_size: f64) -> f64 {
    (value / step_size).round() * step_size
}

/// Merge every configured scan file into one tolerance-binned table and write
/// it under the save directory with the instrument preamble reattached.
///
/// Returns the path of the written file.
pub fn merge_scans(config: &MergeConfig) -> Result<PathBuf, MergeError> {
    if !(config.step_size > 0.0 && config.step_size.is_finite()) {
        return Err(MergeError::BadStepSize(config.step_size));
    }
    let rules = config.scan_constant.rule_set();
    let columns: Vec<&str> = rules.rules.iter().map(|(c, _)| *c).collect();

    let mut merged: Option<ScanTable> = None;
    let mut header_source: Option<PathBuf> = None;
    for file in &config.scan_files {
        let path = config.data_dir.join(file);
        log::info!("Reading file: {}", path.display());
        let table = match read_scan_table(&path, &columns) {
            Ok(t) => t,
            Err(ScanFileError::BadFilePath(p)) => {
                log::warn!("File not found: {}. Skipping.", p.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if header_source.is_none() {
            header_source = Some(path);
        }
        match &mut merged {
            Some(all) => all.append(table),
            None => merged = Some(table),
        }
    }

    let Some(merged) = merged else {
        return Err(MergeError::NoDataLoaded);
    };

    log::info!("Number of rows: {}", merged.n_rows());
    if let Some(cnts) = merged.column_index("CNTS") {
        let missing = merged.rows().filter(|r| r[cnts].is_nan()).count();
        if missing > 0 {
            log::warn!("Number of missing values in CNTS column: {missing}");
        }
    }

    let reduced = reduce_by_tolerance_bins(&merged, rules, config.step_size)?;
    log::info!(
        "Merged by constant {} into {} tolerance bins on {}",
        config.scan_constant,
        reduced.n_rows(),
        rules.group_column
    );

    let mut preamble = String::new();
    if let Some(source) = &header_source {
        match read_header_lines(source, SCAN_HEADER_LINES) {
            Ok(header) => preamble = header,
            Err(e) => log::warn!(
                "Could not read header from {}: {e}. Writing without preamble.",
                source.display()
            ),
        }
    }

    std::fs::create_dir_all(&config.save_dir)?;
    let save_path = config.save_path();
    let mut file = std::fs::File::create(&save_path)?;
    file.write_all(preamble.as_bytes())?;
    write_fixed_width(&mut file, &reduced)?;

    log::info!(
        "Successfully processed and saved data to {}",
        save_path.display()
    );
    Ok(save_path)
}

/// Partition rows by the rounded grouping key and reduce each group per the
/// rule table, one output row per bin in ascending key order.
///
/// Grouping is an exact match on the integer multiple round(v / step), not a
/// windowed comparison. Rows whose grouping value is non-finite belong to no
/// bin and are dropped.
pub fn reduce_by_tolerance_bins(
    table: &ScanTable,
    rules: &RuleSet,
    step_size: f64,
) -> Result<ScanTable, MergeError> {
    if !(step_size > 0.0 && step_size.is_finite()) {
        return Err(MergeError::BadStepSize(step_size));
    }
    let group_idx = table
        .column_index(rules.group_column)
        .ok_or_else(|| MergeError::MissingColumn(rules.group_column.to_string()))?;
    let mut value_indices = Vec::with_capacity(rules.rules.len());
    for (col, _) in rules.rules {
        let idx = table
            .column_index(col)
            .ok_or_else(|| MergeError::MissingColumn(col.to_string()))?;
        value_indices.push(idx);
    }

    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    let mut dropped = 0usize;
    for (row, values) in table.rows().enumerate() {
        let key = values[group_idx];
        if !key.is_finite() {
            dropped += 1;
            continue;
        }
        let multiple = (key / step_size).round() as i64;
        groups.entry(multiple).or_default().push(row);
    }
    if dropped > 0 {
        log::warn!(
            "Dropped {dropped} rows with non-finite {} values",
            rules.group_column
        );
    }
    log::debug!(
        "Tolerance bins: {:?}",
        groups
            .keys()
            .map(|m| *m as f64 * step_size)
            .collect::<Vec<_>>()
    );

    let mut output_columns: Vec<String> = rules.rules.iter().map(|(c, _)| c.to_string()).collect();
    output_columns.push(TOLERANCE_BINS_COLUMN.to_string());
    let mut reduced = ScanTable::new(output_columns);

    for (multiple, members) in &groups {
        let mut row = Vec::with_capacity(rules.rules.len() + 1);
        for ((_, reduce), &idx) in rules.rules.iter().zip(value_indices.iter()) {
            let mut values = members.iter().map(|&r| table.value(r, idx));
            let reduced_value = match reduce {
                Reduce::First => values.find(|v| !v.is_nan()).unwrap_or(f64::NAN),
                Reduce::Sum => values.filter(|v| !v.is_nan()).sum::<f64>(),
            };
            row.push(reduced_value);
        }
        row.push(*multiple as f64 * step_size);
        reduced.push_row(row);
    }

    Ok(reduced)
}

/// Write the table as left-justified fixed-width text: a header row of column
/// names, then one line per row, columns separated by a single space and
/// padded to at least the minimum width.
fn write_fixed_width<W: Write>(out: &mut W, table: &ScanTable) -> std::io::Result<()> {
    let formatted: Vec<Vec<String>> = table
        .rows()
        .map(|row| row.iter().map(|v| format_value(*v)).collect())
        .collect();

    let mut widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|c| c.len().max(MIN_COLUMN_WIDTH))
        .collect();
    for row in &formatted {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let header = table
        .columns()
        .iter()
        .zip(widths.iter())
        .map(|(name, &width)| format!("{name:<width$}"))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{}", header.trim_end())?;

    for row in &formatted {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value == value.trunc() && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
