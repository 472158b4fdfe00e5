//! Writes per-candidate support observations consumed by the external caller.
//!

use crate::utils::{create_text_writer, Result};
use crate::workflows::Observation;
use std::{collections::BTreeMap, io::Write, path::Path};

/// Tab-separated observation writer.
///
/// Each line holds `type chrom pos length healthy_support healthy_total tumour_support
/// tumour_total`, with `pos` the 1-based VCF position.
pub struct ObservationWriter {
    writer: Box<dyn Write + Send>,
}

impl ObservationWriter {
    pub fn new(output_path: &Path) -> Result<ObservationWriter> {
        Ok(ObservationWriter {
            writer: create_text_writer(output_path)?,
        })
    }

    #[cfg(test)]
    fn from_writer(writer: Box<dyn Write + Send>) -> ObservationWriter {
        ObservationWriter { writer }
    }

    pub fn write(&mut self, obs: &Observation) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            obs.site.type_symbol(),
            obs.site.chrom,
            obs.site.vcf_pos(),
            obs.site.indel.indel_len(),
            obs.healthy.support,
            obs.healthy.total,
            obs.tumour.support,
            obs.tumour.total
        )
        .map_err(|e| format!("Failed to write observation: {}", e))
    }

    /// Writes results arriving in any order by their sequence number.
    ///
    /// Sequence numbers must be contiguous from zero. Failed candidates are logged and
    /// left out. Returns the number of observations written.
    pub fn write_ordered<I>(&mut self, results: I) -> Result<usize>
    where
        I: IntoIterator<Item = (usize, Result<Observation>)>,
    {
        let mut pending = BTreeMap::new();
        let mut next_index = 0;
        let mut n_written = 0;
        for (index, result) in results {
            pending.insert(index, result);
            while let Some(result) = pending.remove(&next_index) {
                match result {
                    Ok(obs) => {
                        self.write(&obs)?;
                        n_written += 1;
                    }
                    Err(err) => log::error!("Candidate {}: {}", next_index + 1, err),
                }
                next_index += 1;
            }
        }
        if !pending.is_empty() {
            log::warn!("{} observations were never completed in order", pending.len());
        }
        self.flush()?;
        Ok(n_written)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| format!("Failed to flush observations: {}", e))
    }
}
