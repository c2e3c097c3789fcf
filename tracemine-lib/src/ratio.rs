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

//! Batch acceptance-ratio scoring for externally supplied candidate
//! patterns, typically n-grams pre-extracted from historical traces.
//! Unlike the decomposition search this scores each pattern
//! independently, not compositionally: scoring proceeds in passes,
//! each pass starting from a fresh copy of the original trace.
//! Within a pass a pattern is deferred to a later pass if any of its
//! values was already consumed by a higher-priority pattern in the
//! same pass; the first pattern of every pass is never deferred, so
//! every pattern is scored after at most one pass per remaining
//! pattern.

use std::collections::HashSet;

use crate::log;
use crate::matcher::{remove_pattern, Pattern};

fn count_of(trace: &[u32], num: u32) -> usize {
    trace.iter().filter(|&&t| t == num).count()
}

/// Score each pattern by the fraction of its value occurrences that
/// pattern removal explains: `1 - orphans / originals`, where both
/// counts are summed over the pattern's elements. A pattern with no
/// occurrences of its values in the trace scores 0 rather than
/// failing. Results are ranked by descending ratio, with the pattern
/// itself as tie-break so rankings are reproducible.
pub fn acceptance_ratios(trace: &[u32], patterns: &[Pattern]) -> Vec<(Pattern, f64)> {
    let mut results: Vec<(Pattern, f64)> = Vec::new();
    let mut pending: Vec<usize> = (0..patterns.len()).collect();

    while !pending.is_empty() {
        let mut used: HashSet<u32> = HashSet::new();
        let mut remaining = trace.to_vec();
        let mut deferred: Vec<usize> = Vec::new();

        for &number in &pending {
            let pattern = &patterns[number];
            if pattern.iter().any(|num| used.contains(num)) {
                deferred.push(number);
                continue;
            }

            let updated = remove_pattern(&remaining, pattern);
            let orphans: usize = pattern.iter().map(|&num| count_of(&updated, num)).sum();
            let originals: usize = pattern.iter().map(|&num| count_of(&remaining, num)).sum();

            let ratio = if originals != 0 {
                1.0 - orphans as f64 / originals as f64
            } else {
                log!(log::MATCHER, &format!("pattern {:?} has no occurrences", pattern));
                0.0
            };

            remaining = updated;
            used.extend(pattern.iter().copied());
            results.push((pattern.clone(), ratio))
        }

        pending = deferred
    }

    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    results
}

/// Parse candidate patterns from text, one pattern per line, values
/// separated by whitespace or underscores (causal-pair listings use
/// the `a_b` form). Lines with no parsable values are skipped.
pub fn parse_patterns(contents: &str) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    for line in contents.lines() {
        let pattern: Pattern =
            line.split(|c: char| c == '_' || c.is_whitespace()).filter_map(|tok| tok.parse::<u32>().ok()).collect();
        if !pattern.is_empty() {
            patterns.push(pattern)
        }
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_explained_pattern_scores_one() {
        let ratios = acceptance_ratios(&[0, 25, 0, 25], &[vec![0, 25]]);
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].1, 1.0)
    }

    #[test]
    fn orphans_reduce_the_ratio() {
        let ratios = acceptance_ratios(&[0, 0, 25], &[vec![0, 25]]);
        assert!((ratios[0].1 - 2.0 / 3.0).abs() < 1e-9)
    }

    #[test]
    fn absent_pattern_scores_zero() {
        let ratios = acceptance_ratios(&[1, 2, 3], &[vec![5, 6]]);
        assert_eq!(ratios[0].1, 0.0)
    }

    #[test]
    fn shared_values_defer_to_a_fresh_pass() {
        // (25, 2) shares 25 with the first pattern, so it is scored
        // in a second pass against a fresh copy of the trace rather
        // than against the first pattern's residual.
        let trace = [0, 25, 2, 0, 25, 2];
        let ratios = acceptance_ratios(&trace, &[vec![0, 25], vec![25, 2]]);
        assert_eq!(ratios.len(), 2);
        for (_, ratio) in &ratios {
            assert_eq!(*ratio, 1.0)
        }
    }

    #[test]
    fn ratios_are_ranked_descending() {
        let ratios = acceptance_ratios(&[0, 0, 25, 7, 8], &[vec![0, 25], vec![7, 8]]);
        assert_eq!(ratios[0].0, vec![7, 8]);
        assert_eq!(ratios[0].1, 1.0);
        assert!(ratios[1].1 < 1.0)
    }

    #[test]
    fn parses_pattern_listings() {
        let patterns = parse_patterns("0 25\n12_13\n\nnot a pattern\n1 2 3 4\n");
        assert_eq!(patterns, vec![vec![0, 25], vec![12, 13], vec![1, 2, 3, 4]])
    }
}
