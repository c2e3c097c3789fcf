// MIT License
//
// Copyright (c) 2019 Alasdair Armstrong
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation
// files (the "Software"), to deal in the Software without
// restriction, including without limitation the rights to use, copy,
// modify, merge, publish, distribute, sublicense, and/or sell copies
// of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! List the endpoint-pair groups of a message-definition file, and
//! optionally the causal pairs within each group.

use std::process::exit;

use tracemine_lib::causality::CausalityGraph;
use tracemine_lib::group::extract_groups;

mod opts;

fn main() {
    exit(groups_main())
}

fn groups_main() -> i32 {
    let mut opts = opts::common_opts();
    opts.optflag("p", "pairs", "also print the causal pairs within each group");
    let matches = opts::parse(&opts);

    let config = opts::load_config(&matches);
    let msg_file = opts::load_messages(&opts, &matches, config.as_ref());

    let groups = extract_groups(&msg_file.messages);
    let graph = if matches.opt_present("pairs") { Some(CausalityGraph::from_message_file(&msg_file)) } else { None };

    for group in &groups {
        println!("{}", group);
        if let Some(graph) = &graph {
            let mut pairs: Vec<(u32, u32)> = graph.causal_pairs(&group.indices).into_iter().collect();
            pairs.sort_unstable();
            for (a, b) in pairs {
                println!("  {}_{}", a, b)
            }
        }
    }

    0
}
