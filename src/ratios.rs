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

//! Score a list of candidate patterns against one trace, writing the
//! ranked acceptance ratios to a report file. The patterns are
//! supplied externally, typically n-grams extracted from historical
//! captures; each is scored independently against a fresh copy of the
//! trace, not compositionally.

use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;
use std::process::exit;

use tracemine_lib::container::TraceContainer;
use tracemine_lib::ratio::{acceptance_ratios, parse_patterns};
use tracemine_lib::report::write_ratios;
use tracemine_lib::trace::read_trace;

mod opts;

fn main() {
    exit(ratios_main())
}

fn ratios_main() -> i32 {
    let mut opts = opts::common_opts();
    opts.reqopt("p", "patterns", "load candidate patterns from this file", "FILE");
    opts.optflag("", "container", "trace file is a bincode trace container rather than text");
    let matches = opts::parse(&opts);

    let config = opts::load_config(&matches);

    let trace_file = match matches.free.first() {
        Some(file) => file.clone(),
        None => {
            eprintln!("A trace file is required");
            opts::print_usage(&opts, 1)
        }
    };

    let trace = if matches.opt_present("container") {
        TraceContainer::load(&trace_file).map(|container| container.traces.into_iter().next().unwrap_or_default())
    } else {
        read_trace(&trace_file)
    };
    let trace = match trace {
        Ok(trace) => trace,
        Err(f) => {
            eprintln!("{}", f);
            return 1;
        }
    };

    let patterns_file = matches.opt_str("patterns").unwrap();
    let patterns = match fs::read_to_string(&patterns_file) {
        Ok(contents) => parse_patterns(&contents),
        Err(err) => {
            eprintln!("Could not read patterns file {}: {}", patterns_file, err);
            return 1;
        }
    };

    let ratios = acceptance_ratios(&trace, &patterns);

    match matches.opt_str("output").map(PathBuf::from).or_else(|| config.as_ref().map(|config| config.output_dir.clone()))
    {
        Some(output_dir) => {
            if let Err(err) = fs::create_dir_all(&output_dir) {
                eprintln!("Could not create {}: {}", output_dir.display(), err);
                return 1;
            }
            let output_path = output_dir.join("Patterns_AcceptanceRatios.txt");
            let result = File::create(&output_path).and_then(|mut fd| write_ratios(&mut fd, &ratios));
            match result {
                Ok(()) => {
                    eprintln!("Results written to {}", output_path.display());
                    0
                }
                Err(err) => {
                    eprintln!("Could not write {}: {}", output_path.display(), err);
                    1
                }
            }
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            match write_ratios(&mut handle, &ratios).and_then(|()| handle.flush()) {
                Ok(()) => 0,
                Err(err) => {
                    eprintln!("Could not write results: {}", err);
                    1
                }
            }
        }
    }
}
