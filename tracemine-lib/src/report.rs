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

//! Human-readable result reports. One report block per processed
//! trace, framed by dashed rules so the per-trace results of a batch
//! run can be read (and diffed) directly.

use std::io::Write;

use crate::matcher::Pattern;
use crate::search::RouteSet;

const RULE: &str = "-------------------------";

/// Write the route listing for one decomposed trace: every
/// full-coverage route first, then the ranked partial routes.
pub fn write_routes(
    buf: &mut dyn Write,
    name: &str,
    group: &str,
    indices: &[u32],
    routes: &RouteSet,
) -> std::io::Result<()> {
    writeln!(buf, "{}", RULE)?;
    writeln!(buf, "File: {}, Group: {}, Indices: {:?}", name, group, indices)?;
    for route in routes.complete.iter().chain(routes.partial.iter()) {
        writeln!(buf, "Route: {:?}, Acceptance Ratio: {}", route.patterns, route.ratio)?;
    }
    writeln!(buf, "{}", RULE)
}

/// Write a numbered ranking of per-pattern acceptance ratios.
pub fn write_ratios(buf: &mut dyn Write, ratios: &[(Pattern, f64)]) -> std::io::Result<()> {
    writeln!(buf, "{}", RULE)?;
    for (number, (pattern, ratio)) in ratios.iter().enumerate() {
        writeln!(buf, "{}. {:?}, Acceptance Ratio: {}", number + 1, pattern, ratio)?;
    }
    writeln!(buf, "{}", RULE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Route;

    #[test]
    fn route_report_lists_complete_before_partial() {
        let routes = RouteSet {
            complete: vec![Route { patterns: vec![vec![0, 25]], ratio: 1.0 }],
            partial: vec![Route { patterns: vec![vec![12, 13]], ratio: 0.5 }],
        };
        let mut buf = Vec::new();
        write_routes(&mut buf, "trace-1.txt", "cache0-cpu0", &[0, 25], &routes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("File: trace-1.txt, Group: cache0-cpu0, Indices: [0, 25]"));
        let complete = text.find("Acceptance Ratio: 1").unwrap();
        let partial = text.find("Acceptance Ratio: 0.5").unwrap();
        assert!(complete < partial)
    }

    #[test]
    fn ratio_report_is_numbered_from_one() {
        let mut buf = Vec::new();
        write_ratios(&mut buf, &[(vec![0, 25], 1.0), (vec![5, 6], 0.0)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("1. [0, 25], Acceptance Ratio: 1"));
        assert!(text.contains("2. [5, 6], Acceptance Ratio: 0"))
    }
}
