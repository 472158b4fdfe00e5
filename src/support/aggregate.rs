use super::{Alignment, CandidateIndel, MatchPolicy, SupportError};

/// Number of alignments in `alignments` supporting `candidate` under `policy`.
pub fn count_support<'a, I>(
    candidate: &CandidateIndel,
    alignments: I,
    policy: &MatchPolicy,
) -> Result<usize, SupportError>
where
    I: IntoIterator<Item = &'a Alignment>,
{
    alignments.into_iter().try_fold(0, |count, aln| {
        policy
            .supports(candidate, aln)
            .map(|supported| count + usize::from(supported))
    })
}

/// Support observed in one sample for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleSupport {
    /// Alignments consistent with the candidate.
    pub support: usize,
    /// Alignments examined.
    pub total: usize,
}

impl SampleSupport {
    pub fn tally(
        candidate: &CandidateIndel,
        alignments: &[Alignment],
        policy: &MatchPolicy,
    ) -> Result<Self, SupportError> {
        Ok(Self {
            support: count_support(candidate, alignments, policy)?,
            total: alignments.len(),
        })
    }
}
