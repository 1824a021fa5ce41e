//! Window partitioning.

use crate::fetcher::DriverId;

/// Number of windows needed for `len` ids: `ceil(len / window_size)`.
pub fn batch_count(len: usize, window_size: usize) -> usize {
    let window_size = window_size.max(1);
    len.div_ceil(window_size)
}

/// Split `ids` into ordered windows of `window_size`; the last may be shorter.
pub fn partition(ids: &[DriverId], window_size: usize) -> std::slice::Chunks<'_, DriverId> {
    ids.chunks(window_size.max(1))
}
