//! Batch splitting for fan-out processing.
//!
//! A job that lists work units (e.g. sensor ids) can produce thousands of
//! entries; the workflow orchestrator fans them out across parallel
//! downstream invocations. [`split_batches`] divides the ordered list into
//! fixed-size chunks, one chunk per downstream invocation.

use std::num::NonZeroUsize;

/// Splits an ordered list into fixed-size batches.
///
/// Produces `ceil(items.len() / batch_size)` batches. Every batch has
/// exactly `batch_size` elements except possibly the last. Input order is
/// preserved: batch `i` holds elements
/// `[i * batch_size, min((i + 1) * batch_size, items.len()))`.
///
/// An empty input yields zero batches, not one empty batch.
pub fn split_batches<T: Clone>(items: &[T], batch_size: NonZeroUsize) -> Vec<Vec<T>> {
    items
        .chunks(batch_size.get())
        .map(<[T]>::to_vec)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
