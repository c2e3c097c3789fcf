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

//! Binary container for packed multi-trace captures. Long simulator
//! runs are stored as one bincode blob holding every trace of the
//! run, rather than as loose text files.

use serde::{Deserialize, Serialize};

use std::fs::File;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TraceContainer {
    pub traces: Vec<Vec<u32>>,
}

impl TraceContainer {
    pub fn new(traces: Vec<Vec<u32>>) -> Self {
        TraceContainer { traces }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let fd = File::open(path.as_ref())
            .map_err(|err| format!("Could not open trace container {}: {}", path.as_ref().display(), err))?;
        bincode::deserialize_from(fd)
            .map_err(|err| format!("Could not decode trace container {}: {}", path.as_ref().display(), err))
    }

    pub fn store<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let fd = File::create(path.as_ref())
            .map_err(|err| format!("Could not create trace container {}: {}", path.as_ref().display(), err))?;
        bincode::serialize_into(fd, self)
            .map_err(|err| format!("Could not encode trace container {}: {}", path.as_ref().display(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::remove_file;
    use std::process;

    #[test]
    fn container_roundtrip() {
        let mut path = env::temp_dir();
        path.push(format!("tracemine_container_{}", process::id()));

        let container = TraceContainer::new(vec![vec![0, 25, 0, 25], vec![1, 2, 3]]);
        container.store(&path).unwrap();
        let loaded = TraceContainer::load(&path).unwrap();
        let _ = remove_file(&path);

        assert_eq!(loaded.traces, container.traces)
    }

    #[test]
    fn missing_container_is_an_error() {
        assert!(TraceContainer::load("/nonexistent/tracemine.bin").is_err())
    }
}
