use std::fmt;

/// Data-quality failures raised by the support engine and the threshold selector.
///
/// Not finding a supporting operation is a normal outcome and never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    /// A candidate indel that violates its construction invariants.
    InvalidCandidate(String),
    /// Threshold selection over an empty list of posteriors.
    EmptyInput,
    /// An alignment whose operations cannot be walked.
    MalformedAlignment(String),
}

impl fmt::Display for SupportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupportError::InvalidCandidate(msg) => write!(f, "Invalid candidate indel: {}", msg),
            SupportError::EmptyInput => {
                write!(f, "No posterior probabilities to select a threshold from")
            }
            SupportError::MalformedAlignment(msg) => write!(f, "Malformed alignment: {}", msg),
        }
    }
}

impl std::error::Error for SupportError {}

impl From<SupportError> for String {
    fn from(err: SupportError) -> Self {
        err.to_string()
    }
}
