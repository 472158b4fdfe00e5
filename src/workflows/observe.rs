use crate::support::{AlignmentSource, IndelSite, MatchPolicy, SampleSupport};
use crate::utils::{GenomicRegion, Result};

pub struct Params {
    pub policy: MatchPolicy,
    /// Bases fetched on either side of a candidate.
    pub search_range: u32,
}

/// Support for one candidate in the healthy and tumour samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub site: IndelSite,
    pub healthy: SampleSupport,
    pub tumour: SampleSupport,
}

pub fn observe_site<H, T>(
    site: IndelSite,
    params: &Params,
    healthy: &mut H,
    tumour: &mut T,
) -> Result<Observation>
where
    H: AlignmentSource + ?Sized,
    T: AlignmentSource + ?Sized,
{
    let pos = u32::try_from(site.pos)
        .map_err(|_| format!("Position {} out of range", site.vcf_pos()))?;
    let region = GenomicRegion::around(site.chrom.as_str(), pos, params.search_range)?;

    let healthy_alns = healthy.fetch(&region)?;
    let healthy = SampleSupport::tally(&site.indel, &healthy_alns, &params.policy)?;
    let tumour_alns = tumour.fetch(&region)?;
    let tumour = SampleSupport::tally(&site.indel, &tumour_alns, &params.policy)?;

    log::debug!(
        "{}:{} {}{}: healthy {}/{}, tumour {}/{}",
        site.chrom,
        site.vcf_pos(),
        site.type_symbol(),
        site.indel.indel_len(),
        healthy.support,
        healthy.total,
        tumour.support,
        tumour.total
    );

    Ok(Observation {
        site,
        healthy,
        tumour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{Alignment, CandidateIndel, SupportThresholds};

    fn alignments(cigars: &[(i64, &str)]) -> Vec<Alignment> {
        cigars
            .iter()
            .map(|(start, cigar)| Alignment::from_cigar_str(*start, cigar).unwrap())
            .collect()
    }

    fn site() -> IndelSite {
        IndelSite {
            chrom: "chr1".to_string(),
            pos: 1049,
            indel: CandidateIndel::deletion_at(1050, 6).unwrap(),
        }
    }

    #[test]
    fn test_observe_site_counts_both_samples() {
        let mut healthy = alignments(&[(1000, "100M"), (1010, "100M")]);
        let mut tumour = alignments(&[
            (1000, "50M6D50M"),
            (1020, "30M6D70M"),
            (1000, "100M"),
            // Outside the search window
            (90_000, "50M6D50M"),
        ]);
        let params = Params {
            policy: MatchPolicy::Tolerant(SupportThresholds::default()),
            search_range: 500,
        };
        let obs = observe_site(site(), &params, &mut healthy, &mut tumour).unwrap();
        assert_eq!(obs.healthy, SampleSupport { support: 0, total: 2 });
        assert_eq!(obs.tumour, SampleSupport { support: 2, total: 3 });
    }

    #[test]
    fn test_observe_site_propagates_malformed_alignment() {
        let mut healthy = vec![Alignment::new(
            1000,
            vec![crate::support::Operation::new(
                crate::support::OpKind::Deletion,
                -6,
            )],
        )];
        let mut tumour: Vec<Alignment> = Vec::new();
        let params = Params {
            policy: MatchPolicy::Exact,
            search_range: 500,
        };
        let err = observe_site(site(), &params, &mut healthy, &mut tumour).unwrap_err();
        assert!(err.starts_with("Malformed alignment"));
    }
}
