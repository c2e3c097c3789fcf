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

//! The decomposition search explains as much of a trace as possible
//! by repeatedly removing candidate patterns. Each search node is an
//! immutable snapshot of the remaining trace, the patterns applied so
//! far, and the index values those patterns consumed; children are
//! spawned on an explicit work stack rather than by recursion, so no
//! mutable accumulator is ever shared between sibling explorations.
//!
//! Expansion is greedy left-to-right: the search scans the remaining
//! trace for the first value (skipping duplicates and consumed
//! values) with at least one applicable pattern that strictly shrinks
//! the trace, expands *all* such patterns as siblings, and does not
//! look at later values from that node. This is a heuristic, not an
//! exhaustive enumeration, and is preserved as such.

use ahash::{AHashMap, AHashSet};

use crate::error::SearchError;
use crate::log;
use crate::matcher::{remove_pair, remove_pattern, Pattern};

/// One complete decomposition of a trace: the patterns applied, in
/// order, and the fraction of trace positions they consumed.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    pub patterns: Vec<Pattern>,
    pub ratio: f64,
}

/// The routes reported for one trace: every distinct full-coverage
/// route, plus up to the five best distinct partially-covering
/// routes. Zero-coverage leaves are dropped.
#[derive(Clone, Debug, Default)]
pub struct RouteSet {
    pub complete: Vec<Route>,
    pub partial: Vec<Route>,
}

impl RouteSet {
    pub fn is_empty(&self) -> bool {
        self.complete.is_empty() && self.partial.is_empty()
    }
}

/// Resource bounds on the search. The branching search has no
/// termination bound other than trace exhaustion, so both limits
/// exist to turn a pathological trace into an error the caller can
/// skip instead of a hang.
#[derive(Clone, Copy, Debug)]
pub struct SearchBudget {
    pub max_nodes: usize,
    pub max_depth: usize,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget { max_nodes: 1 << 20, max_depth: 64 }
    }
}

const MAX_PARTIAL_ROUTES: usize = 5;

struct SearchNode {
    remaining: Vec<u32>,
    applied: Vec<usize>,
    consumed: AHashSet<u32>,
}

fn apply(pattern: &[u32], trace: &[u32]) -> Vec<u32> {
    if let [a, b] = *pattern {
        remove_pair(trace, (a, b))
    } else {
        remove_pattern(trace, pattern)
    }
}

/// Decompose `trace` using `patterns` (causal pairs or longer),
/// reporting the best routes found within the budget.
pub fn decompose(trace: &[u32], patterns: &[Pattern], budget: &SearchBudget) -> Result<RouteSet, SearchError> {
    if trace.is_empty() {
        return Ok(RouteSet::default());
    }

    let mut leaves: Vec<(Vec<usize>, f64)> = Vec::new();
    let mut stack = vec![SearchNode { remaining: trace.to_vec(), applied: Vec::new(), consumed: AHashSet::new() }];
    let mut explored = 0usize;

    while let Some(node) = stack.pop() {
        explored += 1;
        if explored > budget.max_nodes {
            return Err(SearchError::BudgetExceeded { explored });
        }

        let mut seen: AHashSet<u32> = AHashSet::new();
        let mut expanded = false;

        for &value in &node.remaining {
            if node.consumed.contains(&value) || !seen.insert(value) {
                continue;
            }
            for (number, pattern) in patterns.iter().enumerate() {
                if pattern.first() != Some(&value) {
                    continue;
                }
                if pattern.iter().any(|num| node.consumed.contains(num)) {
                    continue;
                }
                let residual = apply(pattern, &node.remaining);
                if residual.len() == node.remaining.len() {
                    continue;
                }
                if node.applied.len() >= budget.max_depth {
                    return Err(SearchError::DepthExceeded { depth: node.applied.len() });
                }
                expanded = true;
                let mut applied = node.applied.clone();
                applied.push(number);
                let mut consumed = node.consumed.clone();
                consumed.extend(pattern.iter().copied());
                stack.push(SearchNode { remaining: residual, applied, consumed })
            }
            // First value with a successful expansion blocks all
            // later values at this node.
            if expanded {
                break;
            }
        }

        if !expanded {
            let ratio = 1.0 - node.remaining.len() as f64 / trace.len() as f64;
            log!(log::SEARCH, &format!("leaf: {} patterns, acceptance ratio {}", node.applied.len(), ratio));
            leaves.push((node.applied, ratio))
        }
    }

    log!(log::SEARCH, &format!("explored {} nodes, {} leaves", explored, leaves.len()));
    Ok(collect_routes(leaves, patterns))
}

/// Turn raw leaves into the reported route set: deduplicate by the
/// applied pattern list, keep all full-coverage routes, rank the rest
/// by descending ratio (pattern list as tie-break, so the ranking is
/// reproducible) and keep the top five with ratio strictly between
/// zero and one.
fn collect_routes(leaves: Vec<(Vec<usize>, f64)>, patterns: &[Pattern]) -> RouteSet {
    let mut distinct: AHashMap<Vec<usize>, f64> = AHashMap::new();
    for (applied, ratio) in leaves {
        distinct.entry(applied).or_insert(ratio);
    }

    let mut complete = Vec::new();
    let mut partial = Vec::new();
    for (applied, ratio) in distinct {
        let route = Route { patterns: applied.iter().map(|&number| patterns[number].clone()).collect(), ratio };
        if route.ratio >= 1.0 {
            complete.push(route)
        } else if route.ratio > 0.0 {
            partial.push(route)
        }
    }

    complete.sort_by(|a, b| a.patterns.cmp(&b.patterns));
    partial.sort_by(|a, b| b.ratio.partial_cmp(&a.ratio).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.patterns.cmp(&b.patterns)));
    partial.truncate(MAX_PARTIAL_ROUTES);

    RouteSet { complete, partial }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: u32, b: u32) -> Pattern {
        vec![a, b]
    }

    #[test]
    fn alternating_trace_fully_covered() {
        let routes = decompose(&[0, 25, 0, 25], &[pair(0, 25)], &SearchBudget::default()).unwrap();
        assert_eq!(routes.complete.len(), 1);
        assert_eq!(routes.complete[0].patterns, vec![pair(0, 25)]);
        assert_eq!(routes.complete[0].ratio, 1.0);
        assert!(routes.partial.is_empty())
    }

    #[test]
    fn partial_coverage_is_scored() {
        // One 0 is left orphaned, so the best leaf explains 2/3.
        let routes = decompose(&[0, 0, 25], &[pair(0, 25)], &SearchBudget::default()).unwrap();
        assert!(routes.complete.is_empty());
        assert_eq!(routes.partial.len(), 1);
        assert!((routes.partial[0].ratio - 2.0 / 3.0).abs() < 1e-9)
    }

    #[test]
    fn zero_coverage_routes_are_dropped() {
        let routes = decompose(&[1, 2, 3], &[pair(5, 6)], &SearchBudget::default()).unwrap();
        assert!(routes.is_empty())
    }

    #[test]
    fn consumed_values_block_reapplication() {
        // Both patterns start at the first value, so they expand as
        // siblings, but each consumes 0 and therefore blocks the
        // other below itself: two distinct half-coverage routes.
        let routes = decompose(&[0, 25, 0, 2], &[pair(0, 25), pair(0, 2)], &SearchBudget::default()).unwrap();
        assert!(routes.complete.is_empty());
        assert_eq!(routes.partial.len(), 2);
        for route in &routes.partial {
            assert_eq!(route.patterns.len(), 1);
            assert!((route.ratio - 0.5).abs() < 1e-9)
        }
    }

    #[test]
    fn first_successful_value_blocks_later_values() {
        // 2 has no applicable pattern so the scan moves on to 0; the
        // stray 2 is left unexplained.
        let routes = decompose(&[2, 0, 25], &[pair(0, 25)], &SearchBudget::default()).unwrap();
        assert!(routes.complete.is_empty());
        assert_eq!(routes.partial.len(), 1);
        assert!((routes.partial[0].ratio - 2.0 / 3.0).abs() < 1e-9)
    }

    #[test]
    fn longer_patterns_are_applied_with_the_subsequence_matcher() {
        let routes = decompose(&[0, 12, 25, 0, 12, 25], &[vec![0, 12, 25]], &SearchBudget::default()).unwrap();
        assert_eq!(routes.complete.len(), 1);
        assert_eq!(routes.complete[0].ratio, 1.0)
    }

    #[test]
    fn node_budget_is_surfaced() {
        let budget = SearchBudget { max_nodes: 1, max_depth: 64 };
        match decompose(&[0, 25, 0, 25], &[pair(0, 25)], &budget) {
            Err(SearchError::BudgetExceeded { explored }) => assert!(explored > 1),
            other => panic!("expected budget exhaustion, got {:?}", other.map(|r| r.complete.len())),
        }
    }

    #[test]
    fn depth_budget_is_surfaced() {
        let budget = SearchBudget { max_nodes: 1 << 20, max_depth: 0 };
        assert!(matches!(
            decompose(&[0, 25], &[pair(0, 25)], &budget),
            Err(SearchError::DepthExceeded { depth: 0 })
        ))
    }

    #[test]
    fn empty_trace_yields_no_routes() {
        let routes = decompose(&[], &[pair(0, 25)], &SearchBudget::default()).unwrap();
        assert!(routes.is_empty())
    }
}
