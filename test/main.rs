// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

mod installer;

use joylint::syscall::{Invocation, Result, Syscall, SyscallError};
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    path::Path,
};

/// Syscall double that records every invocation instead of running it.
#[derive(Debug, Default)]
pub(crate) struct RecordingShell {
    calls: RefCell<Vec<Invocation>>,
    outputs: RefCell<VecDeque<String>>,
    failures: HashMap<String, i32>,
}

impl RecordingShell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue captured output for next non-interactive call.
    pub(crate) fn with_output(self, output: impl Into<String>) -> Self {
        self.outputs.borrow_mut().push_back(output.into());
        self
    }

    /// Make every call to target program exit with target code.
    pub(crate) fn failing(mut self, program: impl Into<String>, code: i32) -> Self {
        self.failures.insert(program.into(), code);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Recorded calls as `program args...` lines.
    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| {
                std::iter::once(call.program.as_str())
                    .chain(call.args.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    fn record(&self, invocation: &Invocation) -> Result<()> {
        self.calls.borrow_mut().push(invocation.clone());
        match self.failures.get(&invocation.program) {
            Some(code) => Err(SyscallError::Failed {
                command: invocation.to_string(),
                code: Some(*code),
                stderr: String::new(),
            }),
            None => Ok(()),
        }
    }
}

impl Syscall for RecordingShell {
    fn interactive(&self, invocation: &Invocation) -> Result<()> {
        self.record(invocation)
    }

    fn non_interactive(&self, invocation: &Invocation) -> Result<String> {
        self.record(invocation)?;
        Ok(self.outputs.borrow_mut().pop_front().unwrap_or_default())
    }
}

pub(crate) fn write_manifest(cwd: impl AsRef<Path>, content: &str) {
    std::fs::write(cwd.as_ref().join("package.json"), content).unwrap();
}
