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

//! This module loads a TOML file describing one mining run: where the
//! message definitions and traces live, where reports go, and the
//! resource budget for the decomposition search.

use std::fs::File;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use toml::Value;

use crate::search::SearchBudget;

#[derive(Clone, Debug)]
pub struct RunConfig {
    /// The message-definition file for the protocol.
    pub msg_file: PathBuf,
    /// Directory holding per-group trace files.
    pub trace_dir: PathBuf,
    /// Directory reports are written into.
    pub output_dir: PathBuf,
    pub budget: SearchBudget,
}

fn get_path(config: &Value, key: &str) -> Result<PathBuf, String> {
    match config.get(key) {
        Some(Value::String(path)) => Ok(PathBuf::from(path)),
        _ => Err(format!("Configuration file must specify `{} = \"PATH\"`", key)),
    }
}

fn get_budget(config: &Value) -> Result<SearchBudget, String> {
    let mut budget = SearchBudget::default();
    if let Some(search) = config.get("search") {
        if let Some(max_nodes) = search.get("max-nodes") {
            budget.max_nodes = max_nodes
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| "Configuration option search.max-nodes must be a positive integer".to_string())?
        }
        if let Some(max_depth) = search.get("max-depth") {
            budget.max_depth = max_depth
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| "Configuration option search.max-depth must be a positive integer".to_string())?
        }
    }
    Ok(budget)
}

impl RunConfig {
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config = contents.parse::<Value>().map_err(|err| format!("Error when parsing configuration: {}", err))?;
        Ok(RunConfig {
            msg_file: get_path(&config, "msg")?,
            trace_dir: get_path(&config, "traces")?,
            output_dir: get_path(&config, "output")?,
            budget: get_budget(&config)?,
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let mut contents = String::new();
        File::open(path.as_ref())
            .and_then(|mut fd| fd.read_to_string(&mut contents))
            .map_err(|err| format!("Error when loading configuration {}: {}", path.as_ref().display(), err))?;
        Self::parse(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_run_config() {
        let config = RunConfig::parse(
            "msg = \"defs/snoop.msg\"\n\
             traces = \"traces/run1\"\n\
             output = \"out\"\n\
             [search]\n\
             max-nodes = 4096\n\
             max-depth = 32\n",
        )
        .unwrap();
        assert_eq!(config.msg_file, PathBuf::from("defs/snoop.msg"));
        assert_eq!(config.budget.max_nodes, 4096);
        assert_eq!(config.budget.max_depth, 32)
    }

    #[test]
    fn budget_defaults_when_absent() {
        let config = RunConfig::parse("msg = \"a\"\ntraces = \"b\"\noutput = \"c\"\n").unwrap();
        assert_eq!(config.budget.max_depth, SearchBudget::default().max_depth)
    }

    #[test]
    fn missing_paths_are_errors() {
        assert!(RunConfig::parse("traces = \"b\"\noutput = \"c\"\n").is_err());
        assert!(RunConfig::parse("msg = \"a\"\ntraces = \"b\"\noutput = 3\n").is_err())
    }
}
