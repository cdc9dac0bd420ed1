//! Touchstone (v1) 2-port network loading.
//!
//! Only the forward transmission `S21` is kept, converted to dB, with
//! frequencies normalized to GHz. The core never touches file contents; it only
//! sees the `ResponseCurve` produced here.
//!
//! Supported input:
//! - `!` comments (whole-line or trailing)
//! - option line `# <unit> S <format> R <z0>`, defaulting to `GHZ S MA R 50`
//! - data formats `DB`, `MA`, `RI`
//! - data rows wrapped across lines (tokens are grouped in nines)
//! - v2 keyword lines (`[Version]`, `[Network Data]`, ...) are skipped
//! - network data ends at the first row whose frequency does not increase
//!   (the trailing noise-parameter block of 2-port files is dropped)

use std::fs;
use std::path::Path;

use crate::domain::{ResponseCurve, Sample};
use crate::error::{AppError, ErrorKind};

/// Source of measured device responses.
pub trait NetworkLoader: Sync {
    fn load(&self, path: &Path) -> Result<ResponseCurve, AppError>;
}

/// Reads `.s2p` files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchstoneLoader;

impl NetworkLoader for TouchstoneLoader {
    fn load(&self, path: &Path) -> Result<ResponseCurve, AppError> {
        let text = fs::read_to_string(path).map_err(|e| AppError::input_missing("network file", path, e))?;
        let curve = parse_s2p(&text).map_err(|msg| {
            AppError::new(
                ErrorKind::MalformedNetwork,
                format!("Invalid Touchstone file '{}': {msg}", path.display()),
            )
        })?;
        tracing::debug!(path = %path.display(), samples = curve.len(), "loaded network");
        Ok(curve)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Db,
    Ma,
    Ri,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Options {
    /// Divide file frequencies by this to get GHz.
    ghz_divisor: f64,
    format: DataFormat,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ghz_divisor: 1.0,
            format: DataFormat::Ma,
        }
    }
}

const VALUES_PER_ROW: usize = 9;

/// Parse 2-port Touchstone text into an S21 (dB) response curve.
pub fn parse_s2p(text: &str) -> Result<ResponseCurve, String> {
    let mut options: Option<Options> = None;
    let mut values: Vec<f64> = Vec::new();
    let mut last_frequency: Option<f64> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.split('!').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('#') {
            // Only the first option line counts.
            if options.is_none() {
                options = Some(parse_options(rest).map_err(|e| format!("line {line_no}: {e}"))?);
            }
            continue;
        }

        if is_keyword_line(line) {
            continue;
        }

        let tokens = line
            .split_whitespace()
            .map(|token| parse_number(token).ok_or_else(|| format!("line {line_no}: invalid number '{token}'")))
            .collect::<Result<Vec<f64>, String>>()?;

        // A row starting at or below the previous frequency opens the noise block.
        if values.len() % VALUES_PER_ROW == 0 {
            if let (Some(&first), Some(prev)) = (tokens.first(), last_frequency) {
                if first <= prev {
                    tracing::debug!(line = line_no, "noise parameters ignored");
                    break;
                }
            }
        }

        for v in tokens {
            if values.len() % VALUES_PER_ROW == 0 {
                last_frequency = Some(v);
            }
            values.push(v);
        }
    }

    if values.is_empty() {
        return Err("no network data".to_string());
    }
    if values.len() % VALUES_PER_ROW != 0 {
        return Err(format!(
            "expected 2-port rows of {VALUES_PER_ROW} values, found {} trailing value(s)",
            values.len() % VALUES_PER_ROW
        ));
    }

    let options = options.unwrap_or_default();
    let samples = values
        .chunks_exact(VALUES_PER_ROW)
        .map(|row| {
            // freq, S11 (2), S21 (2), S12 (2), S22 (2)
            let frequency = row[0] / options.ghz_divisor;
            let magnitude_db = s21_db(options.format, row[3], row[4]);
            Sample::new(frequency, magnitude_db)
        })
        .collect();

    ResponseCurve::new(samples).map_err(|e| e.message().to_string())
}

fn parse_options(rest: &str) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut tokens = rest.split_whitespace();
    while let Some(token) = tokens.next() {
        match token.to_ascii_uppercase().as_str() {
            "HZ" => opts.ghz_divisor = 1e9,
            "KHZ" => opts.ghz_divisor = 1e6,
            "MHZ" => opts.ghz_divisor = 1e3,
            "GHZ" => opts.ghz_divisor = 1.0,
            "S" => {}
            "Y" | "Z" | "H" | "G" => {
                return Err(format!("unsupported network parameter '{token}' (only S is supported)"));
            }
            "DB" => opts.format = DataFormat::Db,
            "MA" => opts.format = DataFormat::Ma,
            "RI" => opts.format = DataFormat::Ri,
            "R" => {
                // Reference impedance does not affect S21 magnitude.
                tokens.next();
            }
            other => return Err(format!("unknown option '{other}'")),
        }
    }
    Ok(opts)
}

fn is_keyword_line(line: &str) -> bool {
    line.strip_prefix('[')
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()))
}

/// Parse a numeric token, unwrapping `[...]` brackets some exporters emit.
fn parse_number(token: &str) -> Option<f64> {
    let bare = token.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn s21_db(format: DataFormat, a: f64, b: f64) -> f64 {
    match format {
        DataFormat::Db => a,
        DataFormat::Ma => 20.0 * a.log10(),
        DataFormat::Ri => 20.0 * a.hypot(b).log10(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freqs(curve: &ResponseCurve) -> Vec<f64> {
        curve.samples().iter().map(|s| s.frequency.ghz()).collect()
    }

    #[test]
    fn parses_db_format_in_ghz() {
        let text = "! measured filter\n\
                    # GHz S DB R 50\n\
                    6.3 -20 0 -5.0 10 -5.0 10 -20 0\n\
                    6.5 -20 0 -3.0 12 -3.0 12 -20 0\n";
        let curve = parse_s2p(text).unwrap();
        assert_eq!(freqs(&curve), vec![6.3, 6.5]);
        assert_eq!(curve.samples()[0].magnitude_db, -5.0);
        assert_eq!(curve.samples()[1].magnitude_db, -3.0);
    }

    #[test]
    fn hz_frequencies_match_ghz_check_values() {
        let text = "# HZ S DB R 50\n6300000000 0 0 -5 0 -5 0 0 0\n";
        let curve = parse_s2p(text).unwrap();
        assert_eq!(freqs(&curve), vec![6.3]);
    }

    #[test]
    fn ma_and_ri_convert_to_db() {
        let ma = parse_s2p("# GHZ S MA R 50\n1 0 0 0.1 0 0.1 0 0 0\n").unwrap();
        assert!((ma.samples()[0].magnitude_db + 20.0).abs() < 1e-9);

        let ri = parse_s2p("# GHZ S RI R 50\n1 0 0 0.6 0.8 0 0 0 0\n").unwrap();
        assert!(ri.samples()[0].magnitude_db.abs() < 1e-9);
    }

    #[test]
    fn defaults_to_ghz_ma_without_option_line() {
        let curve = parse_s2p("2.0 0 0 1.0 0 1.0 0 0 0\n").unwrap();
        assert_eq!(freqs(&curve), vec![2.0]);
        assert!(curve.samples()[0].magnitude_db.abs() < 1e-12);
    }

    #[test]
    fn rows_may_wrap_and_carry_brackets() {
        let text = "# GHZ S DB R 50\n[Network Data]\n6.3 0 0\n[-5.0] 0 0 0\n0 0 ! trailing comment\n";
        let curve = parse_s2p(text).unwrap();
        assert_eq!(curve.samples()[0].magnitude_db, -5.0);
    }

    #[test]
    fn noise_parameter_block_is_not_read_as_network_data() {
        let text = "# GHZ S DB R 50\n\
                    1.0 0 0 -3 0 -3 0 0 0\n\
                    2.0 0 0 -4 0 -4 0 0 0\n\
                    ! noise parameters\n\
                    1.0 0.5 0.3 10 0.2\n\
                    1.5 0.6 0.3 20 0.2\n\
                    2.0 0.7 0.3 30 0.2\n";
        let curve = parse_s2p(text).unwrap();
        assert_eq!(freqs(&curve), vec![1.0, 2.0]);
        assert_eq!(curve.samples()[0].magnitude_db, -3.0);
        assert_eq!(curve.samples()[1].magnitude_db, -4.0);
    }

    #[test]
    fn rejects_partial_rows_and_other_parameters() {
        assert!(parse_s2p("# GHZ S DB R 50\n6.3 0 0 -5\n").is_err());
        assert!(parse_s2p("# GHZ Z DB R 50\n6.3 0 0 -5 0 -5 0 0 0\n").is_err());
        assert!(parse_s2p("! only comments\n").is_err());
        assert!(parse_s2p("6.3 abc 0 -5 0 -5 0 0 0\n").is_err());
    }
}
