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

//! This module parses the message-definition format describing a
//! coherence protocol. Each definition line has the shape
//! `index:source:destination[:command]:class` where class is either
//! `req` or `resp`, and lines beginning with `#` are comments that
//! also delimit the sections of the file. The first section lists
//! the messages that can begin a transaction and the last section
//! those that can end one; the causality graph builder uses those
//! section boundaries as its initial and terminating sets.
//!
//! Malformed lines are skipped, never fatal: a definition table with
//! a bad line in it still describes a protocol.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use crate::log;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageClass {
    Request,
    Response,
}

impl MessageClass {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "req" | "request" => Some(MessageClass::Request),
            "resp" | "response" => Some(MessageClass::Response),
            _ => None,
        }
    }
}

/// One entry of the static message-definition table. The index
/// uniquely identifies the message kind; traces are sequences of
/// these indices.
#[derive(Clone, Debug)]
pub struct MessageDef {
    pub index: u32,
    pub src: String,
    pub dest: String,
    pub cmd: Option<String>,
    pub class: MessageClass,
}

/// A parsed message-definition resource: the table entries in file
/// order, plus the indices declared by each `#`-delimited section.
#[derive(Clone, Debug, Default)]
pub struct MessageFile {
    pub messages: Vec<MessageDef>,
    pub sections: Vec<Vec<u32>>,
}

fn parse_line(line: &str) -> Option<MessageDef> {
    let parts: Vec<&str> = line.split(':').map(|part| part.trim()).collect();
    let index = parts.first()?.parse::<u32>().ok()?;
    match parts.as_slice() {
        [_, src, dest] => {
            Some(MessageDef { index, src: src.to_string(), dest: dest.to_string(), cmd: None, class: MessageClass::Request })
        }
        [_, src, dest, class] => Some(MessageDef {
            index,
            src: src.to_string(),
            dest: dest.to_string(),
            cmd: None,
            class: MessageClass::from_str(class)?,
        }),
        [_, src, dest, cmd, class] => Some(MessageDef {
            index,
            src: src.to_string(),
            dest: dest.to_string(),
            cmd: Some(cmd.to_string()),
            class: MessageClass::from_str(class)?,
        }),
        _ => None,
    }
}

impl MessageFile {
    pub fn parse(contents: &str) -> Self {
        let mut messages: Vec<MessageDef> = Vec::new();
        let mut sections: Vec<Vec<u32>> = Vec::new();
        let mut current: Vec<u32> = Vec::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                if !current.is_empty() {
                    sections.push(std::mem::take(&mut current))
                }
                continue;
            }
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(msg) => {
                    current.push(msg.index);
                    messages.push(msg)
                }
                None => log!(log::VERBOSE, &format!("Skipping malformed definition line: {}", line)),
            }
        }
        if !current.is_empty() {
            sections.push(current)
        }

        MessageFile { messages, sections }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let mut contents = String::new();
        File::open(path.as_ref())
            .and_then(|mut fd| fd.read_to_string(&mut contents))
            .map_err(|err| format!("Could not read message definitions {}: {}", path.as_ref().display(), err))?;
        Ok(Self::parse(&contents))
    }

    /// Look up a definition by message index.
    pub fn get(&self, index: u32) -> Option<&MessageDef> {
        self.messages.iter().find(|msg| msg.index == index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEF: &str = "# initial\n\
                       0 : cpu0 : cache0 : req\n\
                       1 : cpu1 : cache1 : req\n\
                       # internal\n\
                       12 : cache0 : membus : ReadReq : req\n\
                       garbage line\n\
                       # responses\n\
                       25 : cache0 : cpu0 : resp\n";

    #[test]
    fn parses_sections_and_messages() {
        let file = MessageFile::parse(DEF);
        assert_eq!(file.messages.len(), 4);
        assert_eq!(file.sections, vec![vec![0, 1], vec![12], vec![25]]);
        let msg = file.get(12).unwrap();
        assert_eq!(msg.src, "cache0");
        assert_eq!(msg.dest, "membus");
        assert_eq!(msg.cmd.as_deref(), Some("ReadReq"));
        assert_eq!(msg.class, MessageClass::Request);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let file = MessageFile::parse("0:cpu:cache:req\nnot-a-number:x:y:req\n7:cpu:cache:neither\n");
        assert_eq!(file.messages.len(), 1);
        assert_eq!(file.messages[0].index, 0)
    }

    #[test]
    fn three_field_lines_default_to_requests() {
        let file = MessageFile::parse("3 : membus : cache1\n");
        assert_eq!(file.messages[0].class, MessageClass::Request);
        assert!(file.messages[0].cmd.is_none())
    }
}
