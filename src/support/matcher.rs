//! Per-alignment support decisions for a candidate indel.
//!
//! Two policies are available. `Exact` only compares event lengths (within one
//! base) and is meant for aligners that already report indels at normalized
//! positions, such as BWA-MEM. `Tolerant` also requires the centerpoint of the
//! aligned event to lie close to the candidate, to cope with aligners whose indel
//! placement drifts.

use super::{centerpoint_split, Alignment, CandidateIndel, OpKind, SupportError};
use itertools::Itertools;

/// Length difference accepted by the exact policy.
const EXACT_LENGTH_TOLERANCE: u64 = 1;

/// Length and centerpoint tolerances of the tolerant policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportThresholds {
    pub len_tol_del: u32,
    pub len_tol_ins: u32,
    pub centerpoint_tol_del: u32,
    pub centerpoint_tol_ins: u32,
}

impl Default for SupportThresholds {
    fn default() -> Self {
        Self {
            len_tol_del: 20,
            len_tol_ins: 20,
            centerpoint_tol_del: 50,
            centerpoint_tol_ins: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy {
    Exact,
    Tolerant(SupportThresholds),
}

impl MatchPolicy {
    /// Decides whether `aln` carries an event consistent with `candidate`.
    ///
    /// Stops at the first qualifying operation. Fails only if the alignment is malformed
    /// before a qualifying operation is reached.
    pub fn supports(
        &self,
        candidate: &CandidateIndel,
        aln: &Alignment,
    ) -> Result<bool, SupportError> {
        let target_kind = if candidate.is_deletion() {
            OpKind::Deletion
        } else {
            OpKind::Insertion
        };
        let (len_tol, centerpoint_tol) = match self {
            MatchPolicy::Exact => (EXACT_LENGTH_TOLERANCE, None),
            MatchPolicy::Tolerant(thresholds) => {
                let (len_tol, centerpoint_tol) = if candidate.is_deletion() {
                    (thresholds.len_tol_del, thresholds.centerpoint_tol_del)
                } else {
                    (thresholds.len_tol_ins, thresholds.centerpoint_tol_ins)
                };
                (u64::from(len_tol), Some(u64::from(centerpoint_tol)))
            }
        };
        let anchors = candidate.anchor_points();

        for step in aln.walk() {
            let (ref_pos, op) = step?;
            if op.kind != target_kind || op.len.abs_diff(candidate.indel_len()) > len_tol {
                continue;
            }
            let Some(centerpoint_tol) = centerpoint_tol else {
                return Ok(true);
            };
            let split = centerpoint_split(ref_pos, op.len);
            if min_distance(&split, &anchors) <= centerpoint_tol {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Smallest absolute difference between any point of `lhs` and any point of `rhs`.
fn min_distance(lhs: &[i64], rhs: &[i64]) -> u64 {
    lhs.iter()
        .cartesian_product(rhs)
        .map(|(a, b)| a.abs_diff(*b))
        .min()
        .unwrap_or(u64::MAX)
}
