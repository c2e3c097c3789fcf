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

//! Mine binary causal patterns from a folder of per-group trace
//! files. For every trace file, the causal pairs over its distinct
//! indices become the candidate patterns for the decomposition
//! search, and the resulting routes are appended to one report file.
//! A trace whose search blows its resource budget is reported and
//! skipped; the batch carries on with the next trace.

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::exit;

use tracemine_lib::causality::CausalityGraph;
use tracemine_lib::matcher::Pattern;
use tracemine_lib::report::write_routes;
use tracemine_lib::search::{decompose, SearchBudget};
use tracemine_lib::trace::read_trace;

mod opts;

fn main() {
    exit(pairs_main())
}

/// Per-group trace files are named `<prefix>-<src>-<dest>.txt` by the
/// slicer; the group name is the last two `-`-separated components of
/// the stem.
fn group_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("");
    let parts: Vec<&str> = stem.split('-').collect();
    match parts.as_slice() {
        [.., src, dest] => format!("{}-{}", src, dest),
        _ => stem.to_string(),
    }
}

fn distinct_indices(trace: &[u32]) -> Vec<u32> {
    let mut indices = trace.to_vec();
    indices.sort_unstable();
    indices.dedup();
    indices
}

fn pairs_main() -> i32 {
    let mut opts = opts::common_opts();
    let matches = opts::parse(&opts);

    let config = opts::load_config(&matches);
    let msg_file = opts::load_messages(&opts, &matches, config.as_ref());
    let graph = CausalityGraph::from_message_file(&msg_file);

    let trace_dir = match (matches.free.first(), config.as_ref()) {
        (Some(dir), _) => PathBuf::from(dir),
        (None, Some(config)) => config.trace_dir.clone(),
        (None, None) => {
            eprintln!("A trace folder is required (as an argument or in the configuration file)");
            opts::print_usage(&opts, 1)
        }
    };
    let budget = config.as_ref().map(|config| config.budget).unwrap_or_default();

    let output_path = matches
        .opt_str("output")
        .map(PathBuf::from)
        .or_else(|| config.as_ref().map(|config| config.output_dir.join("binary-patterns.txt")))
        .unwrap_or_else(|| PathBuf::from("binary-patterns.txt"));

    let mut trace_files: Vec<PathBuf> = match fs::read_dir(&trace_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().map(|ext| ext == "txt").unwrap_or(false))
            .collect(),
        Err(err) => {
            eprintln!("Could not read trace folder {}: {}", trace_dir.display(), err);
            return 1;
        }
    };
    trace_files.sort();

    let mut output = match File::create(&output_path) {
        Ok(fd) => fd,
        Err(err) => {
            eprintln!("Could not create {}: {}", output_path.display(), err);
            return 1;
        }
    };

    for path in &trace_files {
        let trace = match read_trace(path) {
            Ok(trace) => trace,
            Err(f) => {
                eprintln!("{}", f);
                continue;
            }
        };
        eprintln!("Processing {}", path.display());

        let indices = distinct_indices(&trace);
        let mut patterns: Vec<Pattern> = graph.causal_pairs(&indices).into_iter().map(|(a, b)| vec![a, b]).collect();
        patterns.sort_unstable();

        let routes = match decompose(&trace, &patterns, &budget) {
            Ok(routes) => routes,
            Err(err) => {
                eprintln!("Skipping {}: {}", path.display(), err);
                continue;
            }
        };

        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("?");
        if let Err(err) = write_routes(&mut output, name, &group_name(path), &indices, &routes) {
            eprintln!("Could not write report: {}", err);
            return 1;
        }
    }

    eprintln!("Results written to {}", output_path.display());
    0
}
