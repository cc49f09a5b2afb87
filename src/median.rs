//! Median of a degree sequence.

/// Computes the median of a degree sequence on demand.
///
/// Recomputed from scratch for every event: sort, then pick the middle
/// element (odd length) or average the two middle elements (even length).
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianTracker;

impl MedianTracker {
    /// Create a new tracker.
    pub fn new() -> Self {
        Self
    }

    /// Median of `degrees`, sorting the slice in place.
    ///
    /// Returns `None` for an empty sequence. Callers must treat `None` as
    /// "undefined" and never as zero.
    pub fn median(&self, degrees: &mut [usize]) -> Option<f64> {
        if degrees.is_empty() {
            return None;
        }
        degrees.sort_unstable();

        let mid = degrees.len() / 2;
        if degrees.len() % 2 == 1 {
            Some(degrees[mid] as f64)
        } else {
            Some((degrees[mid - 1] as f64 + degrees[mid] as f64) / 2.0)
        }
    }
}
