use crate::utils::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct GenomicRegion {
    pub contig: String,
    pub start: u32,
    pub end: u32,
}

impl GenomicRegion {
    pub fn new(contig: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        if start >= end {
            return Err(format!("Invalid region: start {} >= end {}", start, end));
        }

        Ok(Self {
            contig: contig.into(),
            start,
            end,
        })
    }

    /// Window of `radius` bases on both sides of `position`, clamped at the contig start.
    pub fn around(contig: impl Into<String>, position: u32, radius: u32) -> Result<Self> {
        let end = position.saturating_add(radius).saturating_add(1);
        Self::new(contig, position.saturating_sub(radius), end)
    }

    pub fn from_string(encoding: &str) -> Result<Self> {
        let error_msg = || format!("Invalid region encoding: {}", encoding);
        let elements: Vec<&str> = encoding.split(&[':', '-']).collect();

        if elements.len() != 3 {
            return Err(error_msg());
        }

        let start: u32 = elements[1].parse().map_err(|_| error_msg())?;
        let end: u32 = elements[2].parse().map_err(|_| error_msg())?;

        Self::new(elements[0].to_string(), start, end)
    }

    pub fn contains(&self, contig: &str, position: u32) -> bool {
        self.contig == contig && self.intersect_position(position)
    }

    pub fn intersect_position(&self, position: u32) -> bool {
        position >= self.start && position <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::GenomicRegion;
    #[test]
    fn init_region_from_valid_string_ok() {
        let region = GenomicRegion::from_string("chr1:100-200").unwrap();
        assert_eq!(region.contig, "chr1");
        assert_eq!(region.start, 100);
        assert_eq!(region.end, 200);
    }

    #[test]
    fn init_region_from_invalid_string_err() {
        assert_eq!(
            GenomicRegion::from_string("chr:1:100-200"),
            Err("Invalid region encoding: chr:1:100-200".to_string())
        );
    }

    #[test]
    fn init_region_from_invalid_interval_err() {
        assert_eq!(
            GenomicRegion::from_string("chr1:200-100"),
            Err("Invalid region: start 200 >= end 100".to_string())
        );
    }

    #[test]
    fn window_around_position() {
        let region = GenomicRegion::around("chr2", 10_000, 5000).unwrap();
        assert_eq!((region.start, region.end), (5000, 15_001));
        let clamped = GenomicRegion::around("chr2", 100, 5000).unwrap();
        assert_eq!((clamped.start, clamped.end), (0, 5101));
        let single = GenomicRegion::around("chr2", 0, 0).unwrap();
        assert_eq!((single.start, single.end), (0, 1));
    }

    #[test]
    fn region_contains_position_on_contig() {
        let region = GenomicRegion::from_string("chr1:100-200").unwrap();
        assert!(region.contains("chr1", 100));
        assert!(region.contains("chr1", 200));
        assert!(!region.contains("chr1", 201));
        assert!(!region.contains("chr2", 150));
    }
}
