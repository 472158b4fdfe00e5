//! VCF output of somatic calls, annotated with their structural-variant fields.
//!

use crate::support::IndelSite;
use crate::utils::{is_gzipped, Result};
use itertools::Itertools;
use rust_htslib::bcf::{self, header::HeaderRecord, Format};
use std::path::Path;

const INFO_LINES: [&str; 4] = [
    r#"##INFO=<ID=END,Number=1,Type=Integer,Description="End position of the variant described in this record">"#,
    r#"##INFO=<ID=SOMATIC,Number=0,Type=Flag,Description="Indicates if record is a somatic mutation">"#,
    r#"##INFO=<ID=SVTYPE,Number=1,Type=String,Description="Type of structural variant">"#,
    r#"##INFO=<ID=SVLEN,Number=.,Type=Integer,Description="Difference in length between REF and ALT alleles">"#,
];

/// Candidate VCF record matched to a call.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub site: IndelSite,
    pub ref_allele: Vec<u8>,
    pub alt_allele: Vec<u8>,
}

/// `SVTYPE`, `END` and `SVLEN` of a site; `END` is 1-based and inclusive.
pub fn sv_annotation(site: &IndelSite) -> (&'static str, i64, i64) {
    let len = site.indel.indel_len();
    if site.indel.is_deletion() {
        ("DEL", site.vcf_pos() + len, -len)
    } else {
        ("INS", site.vcf_pos(), len)
    }
}

pub struct SomaticVcfWriter {
    writer: bcf::Writer,
}

impl SomaticVcfWriter {
    /// Creates the output with the contigs of `template` and the annotation INFO fields.
    pub fn new(
        output_path: &Path,
        template: &bcf::header::HeaderView,
        source: &str,
    ) -> Result<SomaticVcfWriter> {
        let mut header = bcf::Header::new();
        header.push_record(format!("##source={}", source).as_bytes());
        for record in template.header_records() {
            if let HeaderRecord::Contig { values, .. } = record {
                let fields = values
                    .iter()
                    .filter(|(key, _)| key.as_str() != "IDX")
                    .map(|(key, value)| format!("{}={}", key, value))
                    .join(",");
                header.push_record(format!("##contig=<{}>", fields).as_bytes());
            }
        }
        for line in INFO_LINES {
            header.push_record(line.as_bytes());
        }

        let writer = bcf::Writer::from_path(
            output_path,
            &header,
            !is_gzipped(output_path),
            Format::Vcf,
        )
        .map_err(|e| format!("Failed to create VCF {}: {}", output_path.display(), e))?;
        Ok(SomaticVcfWriter { writer })
    }

    pub fn write(&mut self, candidate: &CandidateRecord) -> Result<()> {
        let site = &candidate.site;
        let err = |e: rust_htslib::errors::Error| {
            format!(
                "Failed to write somatic record {}:{}: {}",
                site.chrom,
                site.vcf_pos(),
                e
            )
        };
        let (sv_type, end, sv_len) = sv_annotation(site);
        let end = i32::try_from(end).map_err(|_| format!("END {} out of range", end))?;
        let sv_len = i32::try_from(sv_len).map_err(|_| format!("SVLEN {} out of range", sv_len))?;

        let rid = self
            .writer
            .header()
            .name2rid(site.chrom.as_bytes())
            .map_err(err)?;
        let mut record = self.writer.empty_record();
        record.set_rid(Some(rid));
        record.set_pos(site.pos);
        record
            .set_alleles(&[candidate.ref_allele.as_slice(), candidate.alt_allele.as_slice()])
            .map_err(err)?;
        record.push_filter("PASS".as_bytes()).map_err(err)?;
        record.push_info_flag(b"SOMATIC").map_err(err)?;
        record
            .push_info_string(b"SVTYPE", &[sv_type.as_bytes()])
            .map_err(err)?;
        record.push_info_integer(b"END", &[end]).map_err(err)?;
        record.push_info_integer(b"SVLEN", &[sv_len]).map_err(err)?;
        self.writer.write(&record).map_err(err)
    }
}
