use super::SupportError;
use arrayvec::ArrayVec;

/// One or two reference coordinates used as position anchors.
pub type Points = ArrayVec<i64, 2>;

/// Centerpoint(s) of an event of length `len` starting at reference position `start`.
///
/// Even lengths straddle the midpoint and yield two adjacent positions, odd lengths one.
pub fn centerpoint_split(start: i64, len: i64) -> Points {
    let half = len.div_euclid(2);
    let mut points = Points::new();
    if len % 2 == 0 {
        points.push(start + half - 1);
    }
    points.push(start + half);
    points
}

/// Candidate somatic indel tested against read alignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateIndel {
    Deletion { len: i64, centerpoints: Points },
    Insertion { pos: i64, len: i64 },
}

impl CandidateIndel {
    pub fn deletion(len: i64, centerpoints: &[i64]) -> Result<Self, SupportError> {
        check_len(len)?;
        if centerpoints.is_empty() || centerpoints.len() > 2 {
            return Err(SupportError::InvalidCandidate(format!(
                "deletion needs one or two centerpoints, got {}",
                centerpoints.len()
            )));
        }
        Ok(CandidateIndel::Deletion {
            len,
            centerpoints: centerpoints.iter().copied().collect(),
        })
    }

    /// Deletion of `len` reference bases, the first of which is at `start`.
    pub fn deletion_at(start: i64, len: i64) -> Result<Self, SupportError> {
        check_len(len)?;
        Ok(CandidateIndel::Deletion {
            len,
            centerpoints: centerpoint_split(start, len),
        })
    }

    /// Insertion of `len` bases placed before reference position `pos`.
    pub fn insertion(pos: i64, len: i64) -> Result<Self, SupportError> {
        check_len(len)?;
        Ok(CandidateIndel::Insertion { pos, len })
    }

    /// Derives a candidate from an anchored VCF record.
    ///
    /// `pos` is the 0-based position of the anchor base shared by both alleles.
    /// Returns `None` for SNVs, MNVs and complex substitutions.
    pub fn from_alleles(
        pos: i64,
        ref_allele: &[u8],
        alt_allele: &[u8],
    ) -> Result<Option<Self>, SupportError> {
        let anchored = |long: &[u8], short: &[u8]| {
            short.len() == 1 && long.len() > 1 && long[0].eq_ignore_ascii_case(&short[0])
        };
        if anchored(ref_allele, alt_allele) {
            let len = (ref_allele.len() - 1) as i64;
            return Self::deletion_at(pos + 1, len).map(Some);
        }
        if anchored(alt_allele, ref_allele) {
            let len = (alt_allele.len() - 1) as i64;
            return Self::insertion(pos + 1, len).map(Some);
        }
        Ok(None)
    }

    pub fn indel_len(&self) -> i64 {
        match self {
            CandidateIndel::Deletion { len, .. } | CandidateIndel::Insertion { len, .. } => *len,
        }
    }

    pub fn is_deletion(&self) -> bool {
        matches!(self, CandidateIndel::Deletion { .. })
    }

    /// Reference positions an alignment event must land near to support this candidate.
    pub fn anchor_points(&self) -> Points {
        match self {
            CandidateIndel::Deletion { centerpoints, .. } => centerpoints.clone(),
            CandidateIndel::Insertion { pos, .. } => [*pos, *pos + 1].into(),
        }
    }
}

fn check_len(len: i64) -> Result<(), SupportError> {
    if len <= 0 {
        return Err(SupportError::InvalidCandidate(format!(
            "length must be positive, got {}",
            len
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centerpoint_split_parity() {
        for len in 1..50 {
            let split = centerpoint_split(1000, len);
            if len % 2 == 0 {
                assert_eq!(split.len(), 2);
                assert_eq!(split[1] - split[0], 1);
            } else {
                assert_eq!(split.len(), 1);
            }
        }
    }

    #[test]
    fn test_centerpoint_split_values() {
        assert_eq!(centerpoint_split(150, 10).as_slice(), &[154, 155]);
        assert_eq!(centerpoint_split(150, 9).as_slice(), &[154]);
        assert_eq!(centerpoint_split(200, 1).as_slice(), &[200]);
        assert_eq!(centerpoint_split(200, 2).as_slice(), &[200, 201]);
    }

    #[test]
    fn test_rejects_non_positive_length() {
        assert!(matches!(
            CandidateIndel::deletion(0, &[10]),
            Err(SupportError::InvalidCandidate(_))
        ));
        assert!(matches!(
            CandidateIndel::deletion_at(10, -4),
            Err(SupportError::InvalidCandidate(_))
        ));
        assert_eq!(
            CandidateIndel::insertion(10, 0),
            Err(SupportError::InvalidCandidate(
                "length must be positive, got 0".to_string()
            ))
        );
    }

    #[test]
    fn test_rejects_bad_centerpoint_count() {
        assert!(CandidateIndel::deletion(5, &[]).is_err());
        assert!(CandidateIndel::deletion(5, &[1, 2, 3]).is_err());
        assert!(CandidateIndel::deletion(5, &[1, 2]).is_ok());
    }

    #[test]
    fn test_anchor_points() {
        let del = CandidateIndel::deletion(10, &[105]).unwrap();
        assert_eq!(del.anchor_points().as_slice(), &[105]);
        let ins = CandidateIndel::insertion(200, 5).unwrap();
        assert_eq!(ins.anchor_points().as_slice(), &[200, 201]);
        assert_eq!(ins.indel_len(), 5);
        assert!(!ins.is_deletion());
    }

    #[test]
    fn test_from_alleles_deletion() {
        // Anchor at 99, deleted bases 100..104
        let cand = CandidateIndel::from_alleles(99, b"ACGTA", b"A").unwrap().unwrap();
        assert_eq!(cand, CandidateIndel::deletion(4, &[101, 102]).unwrap());
    }

    #[test]
    fn test_from_alleles_insertion() {
        let cand = CandidateIndel::from_alleles(99, b"c", b"CTTT").unwrap().unwrap();
        assert_eq!(cand, CandidateIndel::insertion(100, 3).unwrap());
    }

    #[test]
    fn test_from_alleles_skips_non_indels() {
        assert_eq!(CandidateIndel::from_alleles(10, b"A", b"G").unwrap(), None);
        assert_eq!(CandidateIndel::from_alleles(10, b"AC", b"GT").unwrap(), None);
        assert_eq!(CandidateIndel::from_alleles(10, b"ACG", b"TA").unwrap(), None);
        assert_eq!(CandidateIndel::from_alleles(10, b"AC", b"G").unwrap(), None);
    }
}
