//! Alignment edit operations and the reference-position walk over them.
//!

use super::SupportError;
use rust_htslib::bam::{self, record::Cigar as HtsCigarOp};
use std::{iter::Enumerate, slice};

/// Kind of a single CIGAR-style edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Match,
    Insertion,
    Deletion,
    Clip,
    Other,
}

impl OpKind {
    /// Decodes a BAM operation code, where `MIDNSHP=X` map to 0 through 8.
    pub fn from_bam_code(code: u32) -> Result<Self, SupportError> {
        match code {
            0 | 7 | 8 => Ok(OpKind::Match),
            1 => Ok(OpKind::Insertion),
            2 => Ok(OpKind::Deletion),
            4 | 5 => Ok(OpKind::Clip),
            3 | 6 => Ok(OpKind::Other),
            _ => Err(SupportError::MalformedAlignment(format!(
                "unrecognized operation code {}",
                code
            ))),
        }
    }

    pub fn from_cigar_char(c: char) -> Result<Self, SupportError> {
        match c {
            'M' | '=' | 'X' => Ok(OpKind::Match),
            'I' => Ok(OpKind::Insertion),
            'D' => Ok(OpKind::Deletion),
            'S' | 'H' => Ok(OpKind::Clip),
            'N' | 'P' => Ok(OpKind::Other),
            _ => Err(SupportError::MalformedAlignment(format!(
                "unrecognized operation '{}'",
                c
            ))),
        }
    }

    /// Only matches and deletions move the walk along the reference.
    pub fn consumes_ref(self) -> bool {
        matches!(self, OpKind::Match | OpKind::Deletion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub kind: OpKind,
    pub len: i64,
}

impl Operation {
    pub fn new(kind: OpKind, len: i64) -> Self {
        Self { kind, len }
    }

    pub fn ref_len(&self) -> i64 {
        if self.kind.consumes_ref() {
            self.len
        } else {
            0
        }
    }
}

impl From<&HtsCigarOp> for Operation {
    fn from(op: &HtsCigarOp) -> Self {
        let (kind, len) = match *op {
            HtsCigarOp::Match(len) | HtsCigarOp::Equal(len) | HtsCigarOp::Diff(len) => {
                (OpKind::Match, len)
            }
            HtsCigarOp::Ins(len) => (OpKind::Insertion, len),
            HtsCigarOp::Del(len) => (OpKind::Deletion, len),
            HtsCigarOp::SoftClip(len) | HtsCigarOp::HardClip(len) => (OpKind::Clip, len),
            HtsCigarOp::RefSkip(len) | HtsCigarOp::Pad(len) => (OpKind::Other, len),
        };
        Operation::new(kind, len as i64)
    }
}

/// A read placed on the reference: its 0-based start and its ordered edit operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub ref_start: i64,
    pub ops: Vec<Operation>,
}

impl Alignment {
    pub fn new(ref_start: i64, ops: Vec<Operation>) -> Self {
        Self { ref_start, ops }
    }

    /// Creates an `Alignment` from a mapped HTSlib record.
    pub fn from_hts_rec(rec: &bam::Record) -> Self {
        let ops = rec.cigar().iter().map(Operation::from).collect();
        Self::new(rec.pos(), ops)
    }

    /// Builds an alignment from raw `(code, length)` pairs as stored in BAM files.
    pub fn from_bam_codes(ref_start: i64, raw_ops: &[(u32, i64)]) -> Result<Self, SupportError> {
        let ops = raw_ops
            .iter()
            .map(|&(code, len)| OpKind::from_bam_code(code).map(|kind| Operation::new(kind, len)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(ref_start, ops))
    }

    /// Parses a CIGAR string such as `5S45M10D40M`.
    pub fn from_cigar_str(ref_start: i64, cigar: &str) -> Result<Self, SupportError> {
        let malformed =
            |msg: &str| SupportError::MalformedAlignment(format!("{} in {}", msg, cigar));
        let mut ops = Vec::new();
        let mut len: Option<i64> = None;
        for c in cigar.chars() {
            if let Some(digit) = c.to_digit(10) {
                let next = len
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|l| l.checked_add(digit as i64))
                    .ok_or_else(|| malformed("operation length overflow"))?;
                len = Some(next);
                continue;
            }
            let kind = OpKind::from_cigar_char(c)?;
            let op_len = len.ok_or_else(|| malformed("operation without length"))?;
            ops.push(Operation::new(kind, op_len));
            len = None;
        }
        if len.is_some() {
            return Err(malformed("trailing length"));
        }
        Ok(Self::new(ref_start, ops))
    }

    /// Walks the operations in order, pairing each with the reference position it starts at.
    pub fn walk(&self) -> OpWalker<'_> {
        OpWalker {
            ops: self.ops.iter().enumerate(),
            ref_pos: self.ref_start,
            halted: false,
        }
    }
}

/// Lazy walk over an alignment's operations.
///
/// Yields `(ref_pos, op)` where `ref_pos` is the reference coordinate reached
/// just before `op`. A negative length stops the walk with an error, since every
/// position after it would be wrong.
pub struct OpWalker<'a> {
    ops: Enumerate<slice::Iter<'a, Operation>>,
    ref_pos: i64,
    halted: bool,
}

impl Iterator for OpWalker<'_> {
    type Item = Result<(i64, Operation), SupportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        let (index, op) = self.ops.next()?;
        if op.len < 0 {
            self.halted = true;
            return Some(Err(SupportError::MalformedAlignment(format!(
                "operation {} has negative length {}",
                index + 1,
                op.len
            ))));
        }
        let start = self.ref_pos;
        self.ref_pos += op.ref_len();
        Some(Ok((start, *op)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn positions(aln: &Alignment) -> Vec<(i64, OpKind)> {
        aln.walk()
            .map_ok(|(pos, op)| (pos, op.kind))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_walk_advances_on_match_and_deletion_only() {
        let aln = Alignment::from_cigar_str(100, "5S20M3I10M4D30M2H").unwrap();
        assert_eq!(
            positions(&aln),
            vec![
                (100, OpKind::Clip),
                (100, OpKind::Match),
                (120, OpKind::Insertion),
                (120, OpKind::Match),
                (130, OpKind::Deletion),
                (134, OpKind::Match),
                (164, OpKind::Clip),
            ]
        );
    }

    #[test]
    fn test_walk_other_does_not_advance() {
        let aln = Alignment::from_cigar_str(0, "10M100N10M").unwrap();
        assert_eq!(
            positions(&aln),
            vec![(0, OpKind::Match), (10, OpKind::Other), (10, OpKind::Match)]
        );
    }

    #[test]
    fn test_walk_is_restartable() {
        let aln = Alignment::from_cigar_str(7, "10M2D10M").unwrap();
        let first = positions(&aln);
        let second = positions(&aln);
        assert_eq!(first, second);
        assert_eq!(first.len(), aln.ops.len());
    }

    #[test]
    fn test_walk_empty_alignment() {
        let aln = Alignment::new(42, Vec::new());
        assert_eq!(aln.walk().count(), 0);
    }

    #[test]
    fn test_walk_stops_at_negative_length() {
        let aln = Alignment::new(
            0,
            vec![
                Operation::new(OpKind::Match, 10),
                Operation::new(OpKind::Deletion, -2),
                Operation::new(OpKind::Match, 10),
            ],
        );
        let steps: Vec<_> = aln.walk().collect();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0], Ok((0, Operation::new(OpKind::Match, 10))));
        assert_eq!(
            steps[1],
            Err(SupportError::MalformedAlignment(
                "operation 2 has negative length -2".to_string()
            ))
        );
    }

    #[test]
    fn test_from_bam_codes() {
        let aln = Alignment::from_bam_codes(5, &[(4, 3), (0, 10), (2, 4), (8, 1)]).unwrap();
        assert_eq!(
            aln.ops,
            vec![
                Operation::new(OpKind::Clip, 3),
                Operation::new(OpKind::Match, 10),
                Operation::new(OpKind::Deletion, 4),
                Operation::new(OpKind::Match, 1),
            ]
        );
        assert_eq!(
            Alignment::from_bam_codes(5, &[(0, 10), (9, 4)]),
            Err(SupportError::MalformedAlignment(
                "unrecognized operation code 9".to_string()
            ))
        );
    }

    #[test]
    fn test_from_cigar_str_errors() {
        assert!(Alignment::from_cigar_str(0, "10M5Q").is_err());
        assert!(Alignment::from_cigar_str(0, "M10").is_err());
        assert!(Alignment::from_cigar_str(0, "10M5").is_err());
        assert!(Alignment::from_cigar_str(0, "99999999999999999999M").is_err());
        assert_eq!(Alignment::from_cigar_str(0, "").unwrap().ops.len(), 0);
    }

    #[test]
    fn test_from_hts_ops() {
        let ops = [
            HtsCigarOp::SoftClip(2),
            HtsCigarOp::Equal(10),
            HtsCigarOp::Diff(1),
            HtsCigarOp::Ins(3),
            HtsCigarOp::Del(4),
            HtsCigarOp::RefSkip(50),
            HtsCigarOp::HardClip(5),
        ];
        let kinds = ops.iter().map(|op| Operation::from(op).kind).collect_vec();
        assert_eq!(
            kinds,
            vec![
                OpKind::Clip,
                OpKind::Match,
                OpKind::Match,
                OpKind::Insertion,
                OpKind::Deletion,
                OpKind::Other,
                OpKind::Clip,
            ]
        );
        assert_eq!(Operation::from(&HtsCigarOp::Del(4)).len, 4);
    }

    #[test]
    fn test_ref_len() {
        assert_eq!(Operation::new(OpKind::Match, 10).ref_len(), 10);
        assert_eq!(Operation::new(OpKind::Deletion, 3).ref_len(), 3);
        assert_eq!(Operation::new(OpKind::Insertion, 5).ref_len(), 0);
        assert_eq!(Operation::new(OpKind::Clip, 2).ref_len(), 0);
        assert_eq!(Operation::new(OpKind::Other, 7).ref_len(), 0);
    }
}
