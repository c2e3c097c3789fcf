// BSD 2-Clause License
//
// Copyright (c) 2019, 2020 Alasdair Armstrong
//
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are
// met:
//
// 1. Redistributions of source code must retain the above copyright
// notice, this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright
// notice, this list of conditions and the following disclaimer in the
// documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
// "AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
// LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
// A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
// HOLDER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
// SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE,
// DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
// THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
// (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Pattern-occurrence removal, the primitive the decomposition
//! search calls over and over. [`remove_pattern`] removes all
//! non-overlapping order-preserving occurrences of a pattern from a
//! trace in a single pass using per-value position buckets and one
//! read cursor per pattern slot, rather than rescanning the trace for
//! each occurrence.
//!
//! The cursor scheme is greedy and never rolls back: cursors advanced
//! while extending an occurrence that ultimately fails stay advanced,
//! so a later start can miss positions an exhaustive matcher would
//! have found. This is a deliberate approximation carried over from
//! the reference behavior, traded for the linear-time scan.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

/// An ordered tuple of message indices hypothesized to recur in a
/// trace. Patterns the search applies always have length >= 2.
pub type Pattern = Vec<u32>;

/// Remove every non-overlapping occurrence of `pattern` from `trace`
/// as an order-preserving subsequence, returning the residual trace.
/// Positions are only dropped as part of a complete occurrence of the
/// full pattern, and survivors keep their relative order.
///
/// A length-1 pattern degenerates to removing every occurrence of
/// that value; callers only ever pass length >= 2 but the degenerate
/// case is handled rather than rejected.
pub fn remove_pattern(trace: &[u32], pattern: &[u32]) -> Vec<u32> {
    if pattern.is_empty() {
        return trace.to_vec();
    }

    // One position bucket per distinct pattern value, filled by a
    // single left-to-right scan. Duplicate pattern values share a
    // bucket but each slot keeps its own cursor.
    let mut buckets: AHashMap<u32, Vec<usize>> = pattern.iter().map(|&num| (num, Vec::new())).collect();
    for (position, num) in trace.iter().enumerate() {
        if let Some(bucket) = buckets.get_mut(num) {
            bucket.push(position)
        }
    }

    let mut cursors = vec![0usize; pattern.len()];
    let mut to_remove: AHashSet<usize> = AHashSet::new();

    for &start in &buckets[&pattern[0]] {
        let mut occurrence = vec![start];
        let mut valid = true;

        for (slot, &num) in pattern.iter().enumerate().skip(1) {
            let bucket = &buckets[&num];
            // Skip bucket entries at or before the previous slot's
            // chosen position, then claim the next one.
            while cursors[slot] < bucket.len() && bucket[cursors[slot]] <= *occurrence.last().unwrap() {
                cursors[slot] += 1
            }
            if cursors[slot] < bucket.len() {
                occurrence.push(bucket[cursors[slot]]);
                cursors[slot] += 1
            } else {
                valid = false;
                break;
            }
        }

        if valid {
            to_remove.extend(occurrence)
        }
    }

    trace.iter().enumerate().filter(|(position, _)| !to_remove.contains(position)).map(|(_, &num)| num).collect()
}

/// Two-value specialization used by the binary-pattern search. Each
/// occurrence of `pair.1` is matched with the *oldest* still-pending
/// occurrence of `pair.0` before it (FIFO pairing); an unmatched
/// second half, or a first half that never sees a second half,
/// survives into the residual. Only this one discipline is used
/// everywhere, since FIFO and LIFO pairing give different residuals
/// on traces with interleaved occurrences of the same pair.
pub fn remove_pair(trace: &[u32], pair: (u32, u32)) -> Vec<u32> {
    let mut pending: VecDeque<usize> = VecDeque::new();
    let mut to_remove: AHashSet<usize> = AHashSet::new();

    for (position, &num) in trace.iter().enumerate() {
        if num == pair.0 {
            pending.push_back(position)
        } else if num == pair.1 {
            if let Some(first) = pending.pop_front() {
                to_remove.insert(first);
                to_remove.insert(position);
            }
        }
    }

    trace.iter().enumerate().filter(|(position, _)| !to_remove.contains(position)).map(|(_, &num)| num).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternating_pair_is_fully_removed() {
        assert!(remove_pattern(&[0, 25, 0, 25], &[0, 25]).is_empty());
        assert!(remove_pair(&[0, 25, 0, 25], (0, 25)).is_empty())
    }

    #[test]
    fn duplicate_start_leaves_one_orphan() {
        // The second 0 has no 25 left to pair with.
        assert_eq!(remove_pattern(&[0, 0, 25], &[0, 25]), vec![0]);
        assert_eq!(remove_pair(&[0, 0, 25], (0, 25)), vec![0])
    }

    #[test]
    fn absent_pattern_leaves_trace_unchanged() {
        assert_eq!(remove_pattern(&[1, 2, 3], &[5, 6]), vec![1, 2, 3]);
        assert_eq!(remove_pair(&[1, 2, 3], (5, 6)), vec![1, 2, 3])
    }

    #[test]
    fn longer_pattern_occurrences() {
        assert!(remove_pattern(&[1, 2, 3, 4, 1, 2, 3, 4], &[1, 2, 3, 4]).is_empty());
        // Interleaved noise survives in order.
        assert_eq!(remove_pattern(&[9, 1, 2, 9, 3, 4, 9], &[1, 2, 3, 4]), vec![9, 9, 9])
    }

    #[test]
    fn residual_is_a_subsequence() {
        let trace = [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 1, 4];
        let residual = remove_pattern(&trace, &[1, 5]);
        let mut positions = trace.iter();
        for num in &residual {
            assert!(positions.any(|t| t == num), "residual is not a subsequence of the trace")
        }
    }

    #[test]
    fn length_one_pattern_removes_every_occurrence() {
        assert_eq!(remove_pattern(&[7, 1, 7, 2, 7], &[7]), vec![1, 2])
    }

    #[test]
    fn pair_matching_is_fifo() {
        // 25s at positions 2, 5, 7; first 2 (position 3) pairs with
        // the oldest pending 25, and so on.
        let trace = [0, 0, 25, 2, 2, 25, 0, 25, 2, 2, 0, 25, 0, 25, 0, 25, 2, 2, 2, 2];
        assert_eq!(remove_pair(&trace, (25, 2)), vec![0, 0, 2, 0, 0, 0, 0, 2])
    }

    #[test]
    fn pair_second_half_without_pending_first_survives() {
        assert_eq!(remove_pair(&[25, 0, 25], (0, 25)), vec![25])
    }
}
