mod aggregate;
mod candidate;
mod error;
mod matcher;
mod ops;
mod site;
mod source;

pub use aggregate::{count_support, SampleSupport};
pub use candidate::{centerpoint_split, CandidateIndel, Points};
pub use error::SupportError;
pub use matcher::{MatchPolicy, SupportThresholds};
pub use ops::{Alignment, OpKind, OpWalker, Operation};
pub use site::{site_from_record, stream_sites_into_channel, IndelSite, IndelTypes, SiteFilter};
pub use source::{AlignmentSource, BamAlignmentSource};
