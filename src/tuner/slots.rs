use rand::Rng;

/// Accept window on a progress bar, as fractions of the bar width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRange {
    pub start: f64,
    pub end: f64,
}

impl TargetRange {
    pub fn new(start: f64, end: f64) -> Self {
        debug_assert!(start < end, "target range must not be empty");
        Self { start, end }
    }

    /// Random window: start in [0, 1 - max_len), length in [min_len, max_len)
    pub fn random<R: Rng + ?Sized>(rng: &mut R, min_len: f64, max_len: f64) -> Self {
        let start = rng.gen_range(0.0..1.0 - max_len);
        let end = start + rng.gen_range(min_len..max_len);
        Self::new(start, end)
    }
}

/// One of the three timing challenges
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSlot {
    pub index: usize,
    pub range: TargetRange,
    pub validated: bool,
}

impl ValidationSlot {
    pub fn new(index: usize, range: TargetRange) -> Self {
        Self {
            index,
            range,
            validated: false,
        }
    }
}
