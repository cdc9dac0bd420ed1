//! Plain-text list inputs: device lists and check-frequency files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::CheckFrequencySet;
use crate::error::{AppError, ErrorKind};

/// Default device list file name inside the data directory.
pub const DEVICE_LIST_FILE: &str = "all_s2p_files";

/// One entry of the device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceEntry {
    /// The path as written in the list; used as the device label.
    pub label: String,
    /// `label` resolved against the data directory.
    pub path: PathBuf,
}

/// Read a device list: one path per line, blank lines ignored, deduplicated and sorted.
pub fn read_device_list(path: &Path, base_dir: &Path) -> Result<Vec<DeviceEntry>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::input_missing("device list", path, e))?;
    Ok(parse_device_list(&text, base_dir))
}

pub fn parse_device_list(text: &str, base_dir: &Path) -> Vec<DeviceEntry> {
    let labels: BTreeSet<&str> = text.lines().map(str::trim).filter(|s| !s.is_empty()).collect();
    labels
        .into_iter()
        .map(|label| DeviceEntry {
            label: label.to_string(),
            path: resolve(base_dir, label),
        })
        .collect()
}

/// Read a check-frequency file: one GHz value per line.
///
/// Every line must hold a number once surrounding whitespace is trimmed; a
/// blank or non-numeric line is fatal.
pub fn read_check_frequencies(path: &Path) -> Result<CheckFrequencySet, AppError> {
    let text = fs::read_to_string(path).map_err(|e| AppError::input_missing("check-frequency file", path, e))?;
    parse_check_frequencies(&text, path)
}

pub fn parse_check_frequencies(text: &str, source: &Path) -> Result<CheckFrequencySet, AppError> {
    let mut values = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let v: f64 = line.parse().map_err(|e| {
            AppError::new(
                ErrorKind::MalformedFrequencyEntry,
                format!(
                    "Invalid frequency '{line}' in '{}' line {}: {e}",
                    source.display(),
                    idx + 1
                ),
            )
        })?;
        values.push(v);
    }
    Ok(values.into_iter().collect())
}

fn resolve(base_dir: &Path, label: &str) -> PathBuf {
    let p = Path::new(label);
    if p.is_absolute() { p.to_path_buf() } else { base_dir.join(p) }
}
