//! External tool invocation.
//!
//! The workflows describe each subprocess as a [`ToolInvocation`] and hand it
//! to a [`ToolRunner`]. [`SystemRunner`] spawns real processes with inherited
//! stdio and blocks until they exit.

use std::ffi::OsString;
use std::process::Command;

use tracing::debug;

use crate::error::Error;

/// A subprocess to run: program, arguments, extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub env: Vec<(String, String)>,
}

impl ToolInvocation {
    /// Build from a configured command line such as `"python3 discedit.py"`.
    ///
    /// The command is split on whitespace; the first word is the program and
    /// the rest become leading arguments.
    pub fn from_command(command: &str) -> Result<Self, Error> {
        let mut words = command.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| Error::other("Empty tool command"))?
            .to_string();
        Ok(Self {
            program,
            args: words.map(OsString::from).collect(),
            env: Vec::new(),
        })
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// How a tool finished. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolExit {
    pub code: Option<i32>,
}

impl ToolExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait ToolRunner {
    /// Run to completion in the foreground.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolExit, Error>;
}

/// Runs tools as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolExit, Error> {
        debug!(program = %invocation.program, args = ?invocation.args, "Running tool");

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .map_err(|source| Error::ToolSpawn {
                tool: invocation.program.clone(),
                source,
            })?;

        Ok(ToolExit {
            code: status.code(),
        })
    }
}
