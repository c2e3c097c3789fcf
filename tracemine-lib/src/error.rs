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

//! Error types for the decomposition search. Malformed definition
//! lines and trace tokens are recovered locally by the parsers and
//! never surface as errors; the only failure a caller must handle is
//! the search running out of its resource budget, which is reported
//! separately so batch jobs can skip a pathological trace and carry
//! on with the next one.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SearchError {
    /// The decomposition search expanded more nodes than its budget
    /// allows. The branching search has no termination bound other
    /// than trace exhaustion, so traces with many equally-valid
    /// overlapping patterns can blow up.
    BudgetExceeded { explored: usize },
    /// A search path applied more patterns than the configured
    /// maximum depth.
    DepthExceeded { depth: usize },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use SearchError::*;
        match self {
            BudgetExceeded { explored } => {
                write!(f, "Decomposition search exceeded its node budget after exploring {} nodes", explored)
            }
            DepthExceeded { depth } => {
                write!(f, "Decomposition search exceeded its maximum depth of {} applied patterns", depth)
            }
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
