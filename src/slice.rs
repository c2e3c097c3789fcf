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

//! Split a multi-trace capture into per-group trace files: for every
//! trace in the input and every endpoint-pair group, one file holding
//! the trace projected onto that group's indices. The per-group files
//! are what the pairs miner consumes.

use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::process::exit;

use tracemine_lib::container::TraceContainer;
use tracemine_lib::group::{extract_groups, Group};
use tracemine_lib::trace::{read_traces, slice_by_groups};

mod opts;

fn main() {
    exit(slice_main())
}

fn write_slices(
    output_dir: &Path,
    prefix: &str,
    number: usize,
    groups: &[Group],
    slices: &[Vec<u32>],
) -> Result<(), String> {
    let trace_dir = output_dir.join(format!("{}trace-{}", prefix, number));
    fs::create_dir_all(&trace_dir).map_err(|err| format!("Could not create {}: {}", trace_dir.display(), err))?;

    for (group, slice) in groups.iter().zip(slices.iter()) {
        let path = trace_dir.join(format!("{}-{}-{}.txt", prefix, group.src, group.dest));
        let tokens: Vec<String> = slice.iter().map(|index| index.to_string()).collect();
        File::create(&path)
            .and_then(|mut fd| fd.write_all(tokens.join(" ").as_bytes()))
            .map_err(|err| format!("Could not write {}: {}", path.display(), err))?
    }

    Ok(())
}

fn slice_main() -> i32 {
    let mut opts = opts::common_opts();
    opts.optopt("p", "prefix", "name prefix for the sliced trace files", "NAME");
    opts.optflag("", "container", "input is a bincode trace container rather than text");
    let matches = opts::parse(&opts);

    let config = opts::load_config(&matches);
    let msg_file = opts::load_messages(&opts, &matches, config.as_ref());
    let groups = extract_groups(&msg_file.messages);

    if matches.free.is_empty() {
        eprintln!("No trace files given");
        opts::print_usage(&opts, 1)
    }

    let output_dir = matches
        .opt_str("output")
        .map(PathBuf::from)
        .or_else(|| config.as_ref().map(|config| config.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("."));
    let prefix = matches.opt_str("prefix").unwrap_or_else(|| "trace".to_string());

    for file in &matches.free {
        let traces = if matches.opt_present("container") {
            TraceContainer::load(file).map(|container| container.traces)
        } else {
            read_traces(file)
        };
        let traces = match traces {
            Ok(traces) => traces,
            Err(f) => {
                eprintln!("{}", f);
                return 1;
            }
        };

        for (number, trace) in traces.iter().enumerate() {
            let slices = slice_by_groups(trace, &groups);
            if let Err(f) = write_slices(&output_dir, &prefix, number + 1, &groups, &slices) {
                eprintln!("{}", f);
                return 1;
            }
        }
        eprintln!("Sliced {} traces from {}", traces.len(), file)
    }

    0
}
