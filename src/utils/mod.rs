mod aligner;
mod bam_utils;
mod io_utils;
mod readers;
mod region;
mod util;

pub use aligner::Aligner;
pub use bam_utils::{get_bam_header, get_sample_name, is_bam_mapped};
pub use io_utils::create_text_writer;
pub(crate) use readers::is_gzipped;
pub use readers::open_text_reader;
pub use region::GenomicRegion;
pub use util::{handle_error_and_exit, Result};
