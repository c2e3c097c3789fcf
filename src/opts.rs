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

use getopts::{Matches, Options};
use std::process::exit;

use tracemine_lib::config::RunConfig;
use tracemine_lib::log;
use tracemine_lib::msg::MessageFile;

fn tool_name() -> Option<String> {
    match std::env::current_exe() {
        Ok(path) => Some(path.components().last()?.as_os_str().to_str()?.to_string()),
        Err(_) => None,
    }
}

pub fn print_usage(opts: &Options, code: i32) -> ! {
    let tool = match tool_name() {
        Some(name) => name,
        None => "[tool]".to_string(),
    };
    let brief = format!("Usage: {} [options]", tool);
    eprint!("{}", opts.usage(&brief));
    exit(code)
}

pub fn common_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("m", "msg", "load message definitions from this file", "FILE");
    opts.optopt("c", "config", "load run configuration from this file", "FILE");
    opts.optopt("o", "output", "write results into this directory", "DIR");
    opts.optflag("h", "help", "print this help message");
    opts.optflagmulti("v", "verbose", "print verbose output");
    opts
}

pub fn parse(opts: &Options) -> Matches {
    let args: Vec<String> = std::env::args().collect();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(opts, 1)
        }
    };

    if matches.opt_present("help") {
        print_usage(opts, 0)
    }

    log::set_verbosity(matches.opt_count("verbose"));

    matches
}

pub fn load_config(matches: &Matches) -> Option<RunConfig> {
    matches.opt_str("config").map(|file| match RunConfig::from_file(&file) {
        Ok(config) => config,
        Err(f) => {
            eprintln!("{}", f);
            exit(1)
        }
    })
}

/// The message-definition file comes from `--msg`, falling back to
/// the run configuration when one was supplied.
pub fn load_messages(opts: &Options, matches: &Matches, config: Option<&RunConfig>) -> MessageFile {
    let path = match (matches.opt_str("msg"), config) {
        (Some(file), _) => std::path::PathBuf::from(file),
        (None, Some(config)) => config.msg_file.clone(),
        (None, None) => {
            eprintln!("A message-definition file is required (--msg or a configuration file)");
            print_usage(opts, 1)
        }
    };
    match MessageFile::from_file(&path) {
        Ok(file) => file,
        Err(f) => {
            eprintln!("{}", f);
            exit(1)
        }
    }
}
