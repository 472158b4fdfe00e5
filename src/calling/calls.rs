//! Calls produced by the external somatic caller and their final classification.
//!

use crate::utils::Result;
use std::{fmt, io::BufRead};

const EXPECTED_FIELD_COUNT: usize = 10;

/// One line of caller output.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    /// Variant type symbol as emitted by the caller (`-` deletion, `+` insertion).
    pub kind: String,
    pub chrom: String,
    pub pos: i64,
    pub len: i64,
    pub healthy_vaf: Option<f64>,
    pub case_vaf: Option<f64>,
    pub max_log_likelihood: Option<f64>,
    pub p_somatic: Option<f64>,
    pub p_germline: Option<f64>,
    pub p_not_present: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Somatic,
    NotSomatic,
    Unknown,
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStatus::Somatic => write!(f, "SOMATIC"),
            CallStatus::NotSomatic => write!(f, "NOT-SOMATIC"),
            CallStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl CallRecord {
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() != EXPECTED_FIELD_COUNT {
            return Err(format!(
                "Expected {} tab-separated fields, found {}",
                EXPECTED_FIELD_COUNT,
                fields.len()
            ));
        }
        let parse_int = |name: &str, value: &str| {
            value
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("Invalid {} '{}': {}", name, value, e))
        };

        Ok(CallRecord {
            kind: fields[0].trim().to_string(),
            chrom: fields[1].trim().to_string(),
            pos: parse_int("position", fields[2])?,
            len: parse_int("length", fields[3])?,
            healthy_vaf: parse_fraction("healthy VAF", fields[4])?,
            case_vaf: parse_fraction("case VAF", fields[5])?,
            max_log_likelihood: parse_optional("log-likelihood", fields[6])?,
            p_somatic: parse_fraction("somatic posterior", fields[7])?,
            p_germline: parse_fraction("germline posterior", fields[8])?,
            p_not_present: parse_fraction("not-present posterior", fields[9])?,
        })
    }

    /// Classifies the call against a somatic posterior threshold.
    ///
    /// Calls without any posterior are `Unknown`; a missing somatic posterior next to
    /// other posteriors counts as not somatic.
    pub fn status(&self, threshold: f64) -> CallStatus {
        if self.p_somatic.is_none() && self.p_germline.is_none() && self.p_not_present.is_none() {
            return CallStatus::Unknown;
        }
        match self.p_somatic {
            Some(p) if p >= threshold => CallStatus::Somatic,
            _ => CallStatus::NotSomatic,
        }
    }
}

fn parse_optional(name: &str, value: &str) -> Result<Option<f64>> {
    let parsed = match value.trim() {
        "." => return Ok(None),
        v => v
            .parse::<f64>()
            .map_err(|e| format!("Invalid {} '{}': {}", name, v, e))?,
    };
    if parsed.is_nan() {
        return Err(format!("Invalid {} '{}': not a number", name, value.trim()));
    }
    Ok(Some(parsed))
}

/// Parses a missing-or-fraction field; values must lie in [0, 1].
fn parse_fraction(name: &str, value: &str) -> Result<Option<f64>> {
    match parse_optional(name, value)? {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(format!(
            "Invalid {} '{}': must be within [0, 1]",
            name,
            value.trim()
        )),
        parsed => Ok(parsed),
    }
}

/// Reads every call, reporting failures with their 1-based line number.
pub fn read_calls<R: BufRead>(reader: R) -> Result<Vec<CallRecord>> {
    let mut calls = Vec::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Error reading line {}: {}", line_number + 1, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let call = CallRecord::from_line(&line)
            .map_err(|e| format!("Error at calls line {}: {}", line_number + 1, e))?;
        calls.push(call);
    }
    Ok(calls)
}
