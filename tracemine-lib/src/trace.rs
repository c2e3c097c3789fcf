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

//! Trace parsing and slicing. A trace resource is whitespace-
//! separated integer tokens; `-1` tokens are padding and ignored,
//! while `-2` tokens and blank lines terminate the current trace, so
//! one resource can pack several traces. Non-integer tokens are
//! skipped with a logged warning, never fatal.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::group::Group;
use crate::log;

const PAD_TOKEN: &str = "-1";
const END_OF_TRACE_TOKEN: &str = "-2";

pub fn parse_traces(contents: &str) -> Vec<Vec<u32>> {
    let mut traces: Vec<Vec<u32>> = Vec::new();
    let mut trace: Vec<u32> = Vec::new();

    for line in contents.lines() {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.peek().is_none() {
            if !trace.is_empty() {
                traces.push(std::mem::take(&mut trace))
            }
            continue;
        }
        for token in tokens {
            if token == PAD_TOKEN {
                continue;
            } else if token == END_OF_TRACE_TOKEN {
                if !trace.is_empty() {
                    traces.push(std::mem::take(&mut trace))
                }
            } else {
                match token.parse::<u32>() {
                    Ok(index) => trace.push(index),
                    Err(_) => log!(log::VERBOSE, &format!("Skipping non-integer trace token: {}", token)),
                }
            }
        }
    }
    if !trace.is_empty() {
        traces.push(trace)
    }

    traces
}

pub fn read_traces<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u32>>, String> {
    let mut contents = String::new();
    File::open(path.as_ref())
        .and_then(|mut fd| fd.read_to_string(&mut contents))
        .map_err(|err| format!("Could not read trace file {}: {}", path.as_ref().display(), err))?;
    Ok(parse_traces(&contents))
}

/// Read a resource expected to hold a single trace; if it happens to
/// contain end-of-trace markers, only the first trace is returned.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<u32>, String> {
    Ok(read_traces(path)?.into_iter().next().unwrap_or_default())
}

/// Project a trace onto each group's index set, preserving order.
/// The result is parallel to `groups`; an index belonging to no group
/// is dropped.
pub fn slice_by_groups(trace: &[u32], groups: &[Group]) -> Vec<Vec<u32>> {
    let mut slices: Vec<Vec<u32>> = vec![Vec::new(); groups.len()];
    for &index in trace {
        for (number, group) in groups.iter().enumerate() {
            if group.contains(index) {
                slices[number].push(index)
            }
        }
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::extract_groups;
    use crate::msg::MessageFile;

    #[test]
    fn markers_split_traces() {
        let traces = parse_traces("0 25 -1 0 -2 1 2\n\n3 4");
        assert_eq!(traces, vec![vec![0, 25, 0], vec![1, 2], vec![3, 4]])
    }

    #[test]
    fn bad_tokens_are_skipped() {
        let traces = parse_traces("0 xyz 25");
        assert_eq!(traces, vec![vec![0, 25]])
    }

    #[test]
    fn single_trace_reader_takes_the_first() {
        assert_eq!(parse_traces("7 8 9").len(), 1)
    }

    #[test]
    fn slicing_projects_onto_groups() {
        let file = MessageFile::parse("0:cpu0:cache0:req\n25:cache0:cpu0:resp\n1:cpu1:cache1:req\n");
        let groups = extract_groups(&file.messages);
        let slices = slice_by_groups(&[0, 1, 25, 0, 99], &groups);
        assert_eq!(slices.len(), groups.len());
        // Groups are sorted, so (cache0, cpu0) precedes (cache1, cpu1).
        assert_eq!(slices[0], vec![0, 25, 0]);
        assert_eq!(slices[1], vec![1])
    }
}
