use std::{
    io::{ErrorKind, Write},
    process::{Command, Stdio},
};

use chrono::Utc;

use super::{Advisor, CollaboratorError, Extractor};
use crate::ledger::AnalysisResult;

/// Exposed to extraction commands so relative dates can be resolved.
pub const TODAY_ENV: &str = "DEBT_LEDGER_TODAY";

/// A shell-style command line run with the input on stdin.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

impl CommandLine {
    pub fn parse(line: &str) -> Result<Self, CollaboratorError> {
        let mut words = shell_words::split(line)
            .map_err(|err| CollaboratorError::InvalidCommand(err.to_string()))?;
        if words.is_empty() {
            return Err(CollaboratorError::EmptyCommand);
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
            envs: Vec::new(),
        })
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the command to completion and returns its stdout.
    pub fn run(&self, input: &str) -> Result<String, CollaboratorError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.envs.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CollaboratorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()) {
                // Commands are free to ignore their input.
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(CollaboratorError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Extraction through an external command that prints the analysis JSON.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    command: CommandLine,
}

impl CommandExtractor {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }

    pub fn parse(line: &str) -> Result<Self, CollaboratorError> {
        CommandLine::parse(line).map(Self::new)
    }
}

impl Extractor for CommandExtractor {
    fn extract(&self, text: &str) -> Option<AnalysisResult> {
        if text.trim().is_empty() {
            return None;
        }
        let command = self
            .command
            .clone()
            .with_env(TODAY_ENV, Utc::now().to_rfc3339());
        match command.run(text) {
            Ok(stdout) => AnalysisResult::from_json(&stdout),
            Err(err) => {
                tracing::warn!(error = %err, "extraction command failed");
                None
            }
        }
    }
}

/// Advice through an external command that prints a single tip.
#[derive(Debug, Clone)]
pub struct CommandAdvisor {
    command: CommandLine,
}

impl CommandAdvisor {
    pub fn new(command: CommandLine) -> Self {
        Self { command }
    }

    pub fn parse(line: &str) -> Result<Self, CollaboratorError> {
        CommandLine::parse(line).map(Self::new)
    }
}

impl Advisor for CommandAdvisor {
    fn advise(&self, request: &str) -> Result<String, CollaboratorError> {
        self.command.run(request)
    }
}

/// Stand-in used when no advice command is configured; always fails so the
/// caller falls back to its fixed tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableAdvisor;

impl Advisor for UnavailableAdvisor {
    fn advise(&self, _request: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::EmptyCommand)
    }
}
