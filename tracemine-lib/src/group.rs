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

//! Messages are grouped by the pair of endpoints they connect,
//! independent of direction: a request from `cpu0` to `cache0` and
//! the response from `cache0` back to `cpu0` belong to the same
//! group. The canonical key for a group is the endpoint pair sorted
//! lexicographically, so every index from the definition table lands
//! in exactly one group.

use std::collections::BTreeMap;
use std::fmt;

use crate::msg::MessageDef;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Group {
    pub src: String,
    pub dest: String,
    pub indices: Vec<u32>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {:?})", self.src, self.dest, self.indices)
    }
}

impl Group {
    pub fn contains(&self, index: u32) -> bool {
        self.indices.binary_search(&index).is_ok()
    }
}

/// Partition the message table into endpoint-pair groups. Output is
/// sorted lexicographically by source, then destination, so listings
/// are reproducible.
pub fn extract_groups(messages: &[MessageDef]) -> Vec<Group> {
    let mut by_endpoints: BTreeMap<(String, String), Vec<u32>> = BTreeMap::new();

    for msg in messages {
        let key = if msg.src <= msg.dest {
            (msg.src.clone(), msg.dest.clone())
        } else {
            (msg.dest.clone(), msg.src.clone())
        };
        by_endpoints.entry(key).or_default().push(msg.index)
    }

    by_endpoints
        .into_iter()
        .map(|((src, dest), mut indices)| {
            indices.sort_unstable();
            indices.dedup();
            Group { src, dest, indices }
        })
        .collect()
}

/// Look up a group by a `src-dest` name, matching each component as a
/// substring of the group's endpoints. Per-group trace files are
/// named this way by the slicer, so this is how the pairs miner maps
/// a file back to its group.
pub fn find_group<'a>(name: &str, groups: &'a [Group]) -> Option<&'a Group> {
    let mut parts = name.splitn(2, '-');
    let first = parts.next()?;
    let second = parts.next()?;
    groups.iter().find(|group| group.src.contains(first) && group.dest.contains(second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::MessageFile;

    #[test]
    fn request_and_response_share_a_group() {
        let file = MessageFile::parse("0:cpu0:cache0:req\n25:cache0:cpu0:resp\n");
        let groups = extract_groups(&file.messages);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].src, "cache0");
        assert_eq!(groups[0].dest, "cpu0");
        assert_eq!(groups[0].indices, vec![0, 25])
    }

    #[test]
    fn every_index_in_exactly_one_group() {
        let file = MessageFile::parse(
            "0:cpu0:cache0:req\n\
             1:cpu1:cache1:req\n\
             12:cache0:membus:req\n\
             25:cache0:cpu0:resp\n\
             26:cache1:cpu1:resp\n",
        );
        let groups = extract_groups(&file.messages);
        for msg in &file.messages {
            let homes = groups.iter().filter(|group| group.contains(msg.index)).count();
            assert_eq!(homes, 1, "index {} appears in {} groups", msg.index, homes)
        }
    }

    #[test]
    fn groups_are_sorted() {
        let file = MessageFile::parse("5:b:z:req\n3:a:y:req\n4:a:x:req\n");
        let groups = extract_groups(&file.messages);
        let keys: Vec<(&str, &str)> = groups.iter().map(|group| (group.src.as_str(), group.dest.as_str())).collect();
        assert_eq!(keys, vec![("a", "x"), ("a", "y"), ("b", "z")])
    }

    #[test]
    fn find_group_by_name() {
        let file = MessageFile::parse("0:cpu0:cache0:req\n25:cache0:cpu0:resp\n1:cpu1:cache1:req\n");
        let groups = extract_groups(&file.messages);
        let group = find_group("cache0-cpu0", &groups).unwrap();
        assert_eq!(group.indices, vec![0, 25]);
        assert!(find_group("tim-tom", &groups).is_none())
    }
}
