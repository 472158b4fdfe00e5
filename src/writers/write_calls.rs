use crate::calling::{CallRecord, CallStatus};
use crate::utils::{create_text_writer, Result};
use std::{io::Write, path::Path};

/// Writes classified calls: the caller's ten columns followed by the call status.
pub struct CallWriter {
    writer: Box<dyn Write + Send>,
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| ".".to_string(), |v| format!("{:.6}", v))
}

impl CallWriter {
    pub fn new(output_path: &Path) -> Result<CallWriter> {
        Ok(CallWriter {
            writer: create_text_writer(output_path)?,
        })
    }

    pub fn write(&mut self, call: &CallRecord, status: CallStatus) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            call.kind,
            call.chrom,
            call.pos,
            call.len,
            format_optional(call.healthy_vaf),
            format_optional(call.case_vaf),
            format_optional(call.max_log_likelihood),
            format_optional(call.p_somatic),
            format_optional(call.p_germline),
            format_optional(call.p_not_present),
            status
        )
        .map_err(|e| format!("Failed to write call: {}", e))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush calls: {}", e))
    }
}
