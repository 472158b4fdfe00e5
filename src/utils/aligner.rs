use crate::support::{MatchPolicy, SupportThresholds};
use std::str::FromStr;

/// Aligner that produced the input BAM files; decides how indel support is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aligner {
    Bwa,
    Default,
}

impl Aligner {
    pub fn policy(self, thresholds: SupportThresholds) -> MatchPolicy {
        match self {
            Aligner::Bwa => MatchPolicy::Exact,
            Aligner::Default => MatchPolicy::Tolerant(thresholds),
        }
    }
}

impl FromStr for Aligner {
    type Err = &'static str;
    fn from_str(aligner: &str) -> Result<Self, Self::Err> {
        match aligner {
            "bwa" => Ok(Aligner::Bwa),
            "default" => Ok(Aligner::Default),
            _ => Err("Invalid aligner. Options are: bwa, default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aligner() {
        assert_eq!("bwa".parse::<Aligner>(), Ok(Aligner::Bwa));
        assert_eq!("default".parse::<Aligner>(), Ok(Aligner::Default));
        assert!("bowtie".parse::<Aligner>().is_err());
    }

    #[test]
    fn test_aligner_policy() {
        let thresholds = SupportThresholds::default();
        assert_eq!(Aligner::Bwa.policy(thresholds), MatchPolicy::Exact);
        assert_eq!(
            Aligner::Default.policy(thresholds),
            MatchPolicy::Tolerant(thresholds)
        );
    }
}
