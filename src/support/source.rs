//! Collaborators that hand alignments to the support engine.
//!

use super::Alignment;
use crate::utils::{GenomicRegion, Result};
use rust_htslib::bam::{self, Read, Record};
use std::path::Path;

/// Anything able to return the alignments overlapping a reference region.
pub trait AlignmentSource {
    fn fetch(&mut self, region: &GenomicRegion) -> Result<Vec<Alignment>>;
}

/// Alignments served from an indexed BAM/CRAM file.
pub struct BamAlignmentSource {
    reader: bam::IndexedReader,
    primary_only: bool,
}

impl BamAlignmentSource {
    pub fn from_path(path: &Path, primary_only: bool) -> Result<Self> {
        let reader = bam::IndexedReader::from_path(path)
            .map_err(|e| format!("Failed to create bam reader for {}: {}", path.display(), e))?;
        Ok(Self {
            reader,
            primary_only,
        })
    }
}

impl AlignmentSource for BamAlignmentSource {
    fn fetch(&mut self, region: &GenomicRegion) -> Result<Vec<Alignment>> {
        let mut alignments = Vec::new();
        if let Err(msg) = self
            .reader
            .fetch((region.contig.as_str(), region.start, region.end))
        {
            log::warn!("Fetch error: {}", msg);
            return Ok(alignments);
        }

        let mut record = Record::new();
        while let Some(result) = self.reader.read(&mut record) {
            result.map_err(|e| e.to_string())?;
            if record.is_unmapped() {
                continue;
            }
            if self.primary_only && (record.is_secondary() || record.is_supplementary()) {
                continue;
            }
            alignments.push(Alignment::from_hts_rec(&record));
        }
        Ok(alignments)
    }
}

/// In-memory source filtering alignments by their reference start.
impl AlignmentSource for Vec<Alignment> {
    fn fetch(&mut self, region: &GenomicRegion) -> Result<Vec<Alignment>> {
        Ok(self
            .iter()
            .filter(|aln| aln.ref_start >= 0 && region.intersect_position(aln.ref_start as u32))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_source_filters_by_window() {
        let mut source = vec![
            Alignment::from_cigar_str(100, "50M").unwrap(),
            Alignment::from_cigar_str(5000, "50M").unwrap(),
            Alignment::from_cigar_str(200, "50M").unwrap(),
        ];
        let region = GenomicRegion::around("chr1", 150, 60).unwrap();
        let fetched = source.fetch(&region).unwrap();
        assert_eq!(
            fetched.iter().map(|a| a.ref_start).collect::<Vec<_>>(),
            vec![100, 200]
        );
    }

    #[test]
    fn test_missing_bam_is_an_error() {
        let result = BamAlignmentSource::from_path(Path::new("/nonexistent/reads.bam"), false);
        assert!(result.is_err());
    }
}
