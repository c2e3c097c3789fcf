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

//! The causality graph records, for every message index, the set of
//! indices that can causally follow it: `j` is a successor of `i`
//! when `i`'s destination is `j`'s source, provided `i` cannot end a
//! transaction and `j` cannot begin one. The relation is not
//! guaranteed acyclic and may contain self-loops, so successors are a
//! reachability hint, not edges of a DAG. The graph is built once
//! from the definition table and never mutated.

use ahash::{AHashMap, AHashSet};
use std::collections::HashSet;

use crate::msg::{MessageDef, MessageFile};

/// An iterator over all ordered pairs of distinct positions in a
/// slice.
pub struct Pairs<'a, A> {
    index: (usize, usize),
    slice: &'a [A],
}

impl<'a, A> Pairs<'a, A> {
    pub fn from_slice(slice: &'a [A]) -> Self {
        Pairs { index: (0, 0), slice }
    }
}

impl<'a, A> Iterator for Pairs<'a, A> {
    type Item = (&'a A, &'a A);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.index.1 += 1;
            if self.index.1 > self.slice.len() {
                self.index.1 = 1;
                self.index.0 += 1;
            }
            if self.index.0 >= self.slice.len() {
                return None;
            }
            if self.index.0 != self.index.1 - 1 {
                return Some((&self.slice[self.index.0], &self.slice[self.index.1 - 1]));
            }
        }
    }
}

pub struct CausalityGraph {
    succ: AHashMap<u32, Vec<u32>>,
    endpoints: AHashMap<u32, (String, String)>,
    initial: AHashSet<u32>,
    terminating: AHashSet<u32>,
}

impl CausalityGraph {
    /// Build the successor map from a message table and its section
    /// boundaries. Quadratic in the table size, which stays in the
    /// tens to low hundreds of entries; the graph is built once and
    /// reused for every trace.
    ///
    /// A table with fewer than two sections is accepted: the initial
    /// and terminating sets then coincide and the successor map is
    /// computed with both boundary constraints equal.
    pub fn from_messages(messages: &[MessageDef], sections: &[Vec<u32>]) -> Self {
        let initial: AHashSet<u32> = sections.first().map(|s| s.iter().copied().collect()).unwrap_or_default();
        let terminating: AHashSet<u32> = sections.last().map(|s| s.iter().copied().collect()).unwrap_or_default();

        let mut succ: AHashMap<u32, Vec<u32>> = AHashMap::new();
        let mut endpoints: AHashMap<u32, (String, String)> = AHashMap::new();

        for msg in messages {
            succ.entry(msg.index).or_default();
            endpoints.entry(msg.index).or_insert_with(|| (msg.src.clone(), msg.dest.clone()));
            // Self-loops are deliberately not filtered out here.
            for other in messages {
                if msg.dest == other.src && !terminating.contains(&msg.index) && !initial.contains(&other.index) {
                    succ.entry(msg.index).or_default().push(other.index)
                }
            }
        }

        CausalityGraph { succ, endpoints, initial, terminating }
    }

    pub fn from_message_file(file: &MessageFile) -> Self {
        Self::from_messages(&file.messages, &file.sections)
    }

    /// The successors of an index. An index the graph has never seen
    /// simply has no successors; that is not an error.
    pub fn successors(&self, index: u32) -> &[u32] {
        self.succ.get(&index).map(|s| s.as_slice()).unwrap_or(&[])
    }

    pub fn endpoints(&self, index: u32) -> Option<(&str, &str)> {
        self.endpoints.get(&index).map(|(src, dest)| (src.as_str(), dest.as_str()))
    }

    pub fn is_initial(&self, index: u32) -> bool {
        self.initial.contains(&index)
    }

    pub fn is_terminating(&self, index: u32) -> bool {
        self.terminating.contains(&index)
    }

    /// True when the two indices are linked by the successor relation
    /// in either direction.
    pub fn is_causal(&self, a: u32, b: u32) -> bool {
        self.successors(a).contains(&b) || self.successors(b).contains(&a)
    }

    /// All directly-causal ordered pairs over a set of indices of
    /// interest: `(a, b)` is emitted when `b` is a successor of `a`.
    /// Both directions may independently hold, and then both pairs
    /// are emitted; the relation need not be antisymmetric.
    pub fn causal_pairs(&self, indices: &[u32]) -> HashSet<(u32, u32)> {
        let mut pairs = HashSet::new();
        for (&a, &b) in Pairs::from_slice(indices) {
            if self.successors(a).contains(&b) {
                pairs.insert((a, b));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::MessageFile;

    const DEF: &str = "# initial\n\
                       0 : cpu0 : cache0 : req\n\
                       # internal\n\
                       12 : cache0 : membus : req\n\
                       13 : membus : cache0 : resp\n\
                       # terminating\n\
                       25 : cache0 : cpu0 : resp\n";

    fn graph() -> CausalityGraph {
        CausalityGraph::from_message_file(&MessageFile::parse(DEF))
    }

    #[test]
    fn successors_respect_endpoints_and_boundaries() {
        let graph = graph();
        // 0: cpu0 -> cache0, so indices sourced at cache0 follow it,
        // except that nothing may precede an initial index.
        assert_eq!(graph.successors(0), &[12, 25]);
        assert_eq!(graph.successors(12), &[13]);
        assert_eq!(graph.successors(13), &[12, 25]);
        // 25 is terminating, so it has no successors at all.
        assert!(graph.successors(25).is_empty());
        // An index the graph has never seen has no successors.
        assert!(graph.successors(99).is_empty())
    }

    #[test]
    fn initial_indices_have_no_predecessors() {
        let graph = graph();
        // 25: cache0 -> cpu0 and 0 is sourced at cpu0, but 0 is
        // initial, so nothing lists it as a successor.
        for index in [0, 12, 13, 25] {
            assert!(!graph.successors(index).contains(&0))
        }
    }

    #[test]
    fn causal_pairs_emit_both_directions() {
        let graph = graph();
        let pairs = graph.causal_pairs(&[12, 13]);
        // 12: cache0 -> membus, 13: membus -> cache0. Each is a
        // successor of the other.
        assert!(pairs.contains(&(12, 13)));
        assert!(pairs.contains(&(13, 12)))
    }

    #[test]
    fn causal_pairs_from_the_successor_relation() {
        let graph = graph();
        let pairs = graph.causal_pairs(&[0, 25]);
        assert!(pairs.contains(&(0, 25)));
        assert!(!pairs.contains(&(25, 0)))
    }

    #[test]
    fn self_loops_are_kept() {
        let file = MessageFile::parse("# only\n7 : hub : hub : req\n");
        // A single section makes 7 both initial and terminating, so
        // the loop is suppressed by the boundary constraints...
        let graph = CausalityGraph::from_message_file(&file);
        assert!(graph.successors(7).is_empty());
        // ...but with interior sections the self-loop survives.
        let file = MessageFile::parse("# initial\n0 : cpu : hub : req\n# internal\n7 : hub : hub : req\n# end\n9 : hub : cpu : resp\n");
        let graph = CausalityGraph::from_message_file(&file);
        assert!(graph.successors(7).contains(&7))
    }

    #[test]
    fn single_section_degrades_without_panic() {
        let file = MessageFile::parse("# all\n0 : a : b : req\n1 : b : a : resp\n");
        let graph = CausalityGraph::from_message_file(&file);
        assert!(graph.is_initial(0) && graph.is_terminating(0));
        assert!(graph.successors(0).is_empty() && graph.successors(1).is_empty())
    }
}
