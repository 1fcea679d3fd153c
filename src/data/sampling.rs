use crate::error::{MetaError, MetaResult};

// ---------------------------------------------------------------------------
// Stride subsampling: deterministic "keep every Nth record"
// ---------------------------------------------------------------------------

/// Reject a zero stride before any record is looked at.
pub fn check_stride(sample: usize) -> MetaResult<()> {
    if sample == 0 {
        return Err(MetaError::InvalidInput(
            "sample stride must be at least 1".into(),
        ));
    }
    Ok(())
}

/// Whether position `index` survives a stride of `sample`.
pub fn keeps_index(index: usize, sample: usize) -> bool {
    index % sample == 0
}

/// Keep positions `0, sample, 2 * sample, ...`, compacted, order preserved.
/// A stride of 1 returns the input untouched.
pub fn every_nth<T>(items: Vec<T>, sample: usize) -> Vec<T> {
    if sample == 1 {
        return items;
    }
    items
        .into_iter()
        .enumerate()
        .filter(|(i, _)| keeps_index(*i, sample))
        .map(|(_, item)| item)
        .collect()
}
