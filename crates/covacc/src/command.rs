//! Subprocess command builder
//!
//! Accumulates argument tokens in call order on top of a base command that
//! may itself contain several words (`go test`, `richgo test`, ...).

use std::fmt;

/// Argument list for a subprocess, built in call order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    /// Create a builder from a space separated base command.
    ///
    /// The first word is the program, every further non-blank word becomes
    /// a leading argument.
    #[must_use]
    pub fn new(base: &str) -> Self {
        let mut words = base.split(' ');
        let program = words.next().unwrap_or_default().to_string();
        Self {
            program,
            args: Vec::new(),
        }
        .arg_no_blank(words)
    }

    /// Append every token, including empty ones
    #[must_use]
    pub fn arg<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Append every token that is not the empty string
    #[must_use]
    pub fn arg_no_blank<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(
            tokens
                .into_iter()
                .map(Into::into)
                .filter(|token: &String| !token.is_empty()),
        );
        self
    }

    /// Program to execute
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in call order
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Blocking command for one-shot invocations
    #[must_use]
    pub fn to_std(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Async command for streamed invocations
    #[must_use]
    pub fn to_tokio(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
