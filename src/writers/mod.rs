mod write_calls;
mod write_observations;
mod write_somatic_vcf;

pub use write_calls::CallWriter;
pub use write_observations::ObservationWriter;
pub use write_somatic_vcf::{sv_annotation, CandidateRecord, SomaticVcfWriter};
