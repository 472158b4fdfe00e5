//! Candidate indels read from a VCF file.
//!

use super::CandidateIndel;
use crate::utils::{GenomicRegion, Result};
use crossbeam_channel::Sender;
use rust_htslib::bcf::{self, Read};
use std::path::Path;

/// Candidate indel placed on a named contig.
#[derive(Debug, Clone, PartialEq)]
pub struct IndelSite {
    pub chrom: String,
    /// 0-based position of the VCF anchor base.
    pub pos: i64,
    pub indel: CandidateIndel,
}

impl IndelSite {
    /// 1-based position as written in the VCF.
    pub fn vcf_pos(&self) -> i64 {
        self.pos + 1
    }

    /// `-` for deletions, `+` for insertions.
    pub fn type_symbol(&self) -> char {
        if self.indel.is_deletion() {
            '-'
        } else {
            '+'
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndelTypes {
    #[default]
    Both,
    Deletions,
    Insertions,
}

/// Restricts which candidates are processed.
#[derive(Debug, Clone, Default)]
pub struct SiteFilter {
    pub types: IndelTypes,
    pub min_len: Option<i64>,
    pub max_len: Option<i64>,
    pub region: Option<GenomicRegion>,
}

impl SiteFilter {
    pub fn accepts(&self, site: &IndelSite) -> bool {
        let type_ok = match self.types {
            IndelTypes::Both => true,
            IndelTypes::Deletions => site.indel.is_deletion(),
            IndelTypes::Insertions => !site.indel.is_deletion(),
        };
        let len = site.indel.indel_len();
        let len_ok = self.min_len.map_or(true, |min| len >= min)
            && self.max_len.map_or(true, |max| len <= max);
        let region_ok = self.region.as_ref().map_or(true, |region| {
            u32::try_from(site.pos).is_ok_and(|pos| region.contains(&site.chrom, pos))
        });
        type_ok && len_ok && region_ok
    }
}

/// Converts a VCF record into a site, or `None` if its first ALT allele is not an indel.
pub fn site_from_record(
    header: &bcf::header::HeaderView,
    rec: &bcf::Record,
) -> Result<Option<IndelSite>> {
    let rid = rec.rid().ok_or("Record without contig")?;
    let chrom = header.rid2name(rid).map_err(|e| e.to_string())?;
    let chrom = String::from_utf8_lossy(chrom).into_owned();
    let alleles = rec.alleles();
    let (ref_allele, alt_allele) = match alleles.as_slice() {
        [ref_allele, alt_allele, ..] => (*ref_allele, *alt_allele),
        _ => return Ok(None),
    };
    let indel = CandidateIndel::from_alleles(rec.pos(), ref_allele, alt_allele)?;
    Ok(indel.map(|indel| IndelSite {
        chrom,
        pos: rec.pos(),
        indel,
    }))
}

/// Streams accepted sites, numbered in VCF order, into `sender`.
///
/// Record-level failures are forwarded as errors and streaming continues; failing to
/// open the VCF ends the stream.
pub fn stream_sites_into_channel(
    vcf_path: &Path,
    filter: &SiteFilter,
    sender: Sender<Result<(usize, IndelSite)>>,
) -> Result<()> {
    let mut reader = bcf::Reader::from_path(vcf_path)
        .map_err(|e| format!("Failed to open VCF file {}: {}", vcf_path.display(), e))?;
    let header = reader.header().clone();

    let mut index = 0;
    let mut n_skipped = 0;
    for (record_number, record) in reader.records().enumerate() {
        let site = record
            .map_err(|e| e.to_string())
            .and_then(|rec| site_from_record(&header, &rec))
            .map_err(|e| format!("Error at VCF record {}: {}", record_number + 1, e));
        let message = match site {
            Ok(Some(site)) if filter.accepts(&site) => {
                index += 1;
                Ok((index - 1, site))
            }
            Ok(_) => {
                n_skipped += 1;
                continue;
            }
            Err(e) => Err(e),
        };
        sender
            .send(message)
            .map_err(|e| format!("Failed to send site through channel: {}", e))?;
    }
    log::info!(
        "Streamed {} candidate indels, skipped {} records",
        index,
        n_skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Write;

    fn site(chrom: &str, pos: i64, indel: CandidateIndel) -> IndelSite {
        IndelSite {
            chrom: chrom.to_string(),
            pos,
            indel,
        }
    }

    #[test]
    fn test_type_symbol_and_vcf_pos() {
        let del = site("chr1", 99, CandidateIndel::deletion_at(100, 3).unwrap());
        let ins = site("chr1", 99, CandidateIndel::insertion(100, 3).unwrap());
        assert_eq!(del.type_symbol(), '-');
        assert_eq!(ins.type_symbol(), '+');
        assert_eq!(del.vcf_pos(), 100);
    }

    #[test]
    fn test_filter_by_type_and_length() {
        let del = site("chr1", 99, CandidateIndel::deletion_at(100, 3).unwrap());
        let ins = site("chr1", 99, CandidateIndel::insertion(100, 30).unwrap());

        assert!(SiteFilter::default().accepts(&del));
        assert!(SiteFilter::default().accepts(&ins));

        let deletions = SiteFilter {
            types: IndelTypes::Deletions,
            ..Default::default()
        };
        assert!(deletions.accepts(&del));
        assert!(!deletions.accepts(&ins));

        let bounded = SiteFilter {
            min_len: Some(3),
            max_len: Some(29),
            ..Default::default()
        };
        assert!(bounded.accepts(&del));
        assert!(!bounded.accepts(&ins));
    }

    #[test]
    fn test_filter_by_region() {
        let del = site("chr1", 150, CandidateIndel::deletion_at(151, 3).unwrap());
        let filter = SiteFilter {
            region: Some(GenomicRegion::from_string("chr1:100-200").unwrap()),
            ..Default::default()
        };
        assert!(filter.accepts(&del));
        let elsewhere = site("chr2", 150, CandidateIndel::deletion_at(151, 3).unwrap());
        assert!(!filter.accepts(&elsewhere));
    }

    #[test]
    fn test_stream_sites_from_vcf() {
        let mut vcf = tempfile::Builder::new().suffix(".vcf").tempfile().unwrap();
        writeln!(
            vcf,
            "##fileformat=VCFv4.2\n\
             ##contig=<ID=chr1,length=10000>\n\
             #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
             chr1\t100\t.\tACGT\tA\t.\tPASS\t.\n\
             chr1\t200\t.\tA\tG\t.\tPASS\t.\n\
             chr1\t300\t.\tT\tTAA\t.\tPASS\t.\n\
             chr1\t400\t.\tGCCCCC\tG\t.\tPASS\t."
        )
        .unwrap();
        vcf.flush().unwrap();

        let filter = SiteFilter {
            max_len: Some(4),
            ..Default::default()
        };
        let (sender, receiver) = unbounded();
        stream_sites_into_channel(vcf.path(), &filter, sender).unwrap();
        let sites: Vec<(usize, IndelSite)> = receiver.iter().map(|s| s.unwrap()).collect();

        assert_eq!(
            sites,
            vec![
                (0, site("chr1", 99, CandidateIndel::deletion_at(100, 3).unwrap())),
                (1, site("chr1", 299, CandidateIndel::insertion(300, 2).unwrap())),
            ]
        );
    }

    #[test]
    fn test_stream_sites_missing_vcf() {
        let (sender, _receiver) = unbounded();
        let result = stream_sites_into_channel(
            Path::new("/nonexistent/candidates.vcf"),
            &SiteFilter::default(),
            sender,
        );
        assert!(result.is_err());
    }
}
