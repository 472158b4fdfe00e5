use crate::calling::{read_calls, select_threshold, CallRecord, CallStatus};
use crate::cli::FinalizeArgs;
use crate::support::site_from_record;
use crate::utils::{open_text_reader, Result};
use crate::writers::{CallWriter, CandidateRecord, SomaticVcfWriter};
use rust_htslib::bcf::{self, Read};
use std::path::Path;

/// Forward-only walk over the candidate VCF, which lists sites in the same order as the calls.
struct CandidateCursor {
    reader: bcf::Reader,
    header: bcf::header::HeaderView,
    record: bcf::Record,
    record_number: usize,
}

impl CandidateCursor {
    fn from_path(path: &Path) -> Result<Self> {
        let reader = bcf::Reader::from_path(path)
            .map_err(|e| format!("Failed to open VCF file {}: {}", path.display(), e))?;
        let header = reader.header().clone();
        let record = reader.empty_record();
        Ok(CandidateCursor {
            reader,
            header,
            record,
            record_number: 0,
        })
    }

    /// Skips ahead to the record the call was made for.
    fn seek(&mut self, call: &CallRecord) -> Result<CandidateRecord> {
        while let Some(result) = self.reader.read(&mut self.record) {
            self.record_number += 1;
            result.map_err(|e| format!("Error at VCF record {}: {}", self.record_number, e))?;
            let site = match site_from_record(&self.header, &self.record)? {
                Some(site) => site,
                None => continue,
            };
            if site.chrom == call.chrom
                && site.vcf_pos() == call.pos
                && site.indel.indel_len() == call.len
                && call.kind.starts_with(site.type_symbol())
            {
                let alleles = self.record.alleles();
                return Ok(CandidateRecord {
                    site,
                    ref_allele: alleles[0].to_vec(),
                    alt_allele: alleles[1].to_vec(),
                });
            }
        }
        Err(format!(
            "No candidate VCF record for call {} {}:{} (length {})",
            call.kind, call.chrom, call.pos, call.len
        ))
    }
}

pub fn finalize(args: FinalizeArgs) -> Result<()> {
    let reader = open_text_reader(&args.calls_path)?;
    let calls = read_calls(reader)?;
    log::info!(
        "Loaded {} calls from {}",
        calls.len(),
        args.calls_path.display()
    );

    let posteriors: Vec<f64> = calls.iter().filter_map(|call| call.p_somatic).collect();
    let threshold = select_threshold(&posteriors, args.beta)?;
    log::info!(
        "Somatic posterior threshold {:.6} (beta = {})",
        threshold,
        args.beta
    );

    let mut somatic_vcf = match (&args.vcf_path, &args.vcf_output_path) {
        (Some(vcf_path), Some(output_path)) => {
            let cursor = CandidateCursor::from_path(vcf_path)?;
            let writer = SomaticVcfWriter::new(output_path, &cursor.header, &args.source)?;
            Some((cursor, writer))
        }
        _ => None,
    };

    let mut writer = CallWriter::new(&args.output_path)?;
    let (mut n_somatic, mut n_not_somatic, mut n_unknown) = (0, 0, 0);
    for call in &calls {
        let status = call.status(threshold);
        match status {
            CallStatus::Somatic => n_somatic += 1,
            CallStatus::NotSomatic => n_not_somatic += 1,
            CallStatus::Unknown => n_unknown += 1,
        }
        if status == CallStatus::Somatic {
            if let Some((cursor, vcf_writer)) = somatic_vcf.as_mut() {
                vcf_writer.write(&cursor.seek(call)?)?;
            }
        }
        if args.somatic_only && status != CallStatus::Somatic {
            continue;
        }
        writer.write(call, status)?;
    }
    writer.flush()?;

    log::info!(
        "{} somatic, {} not somatic, {} unknown",
        n_somatic,
        n_not_somatic,
        n_unknown
    );
    Ok(())
}
