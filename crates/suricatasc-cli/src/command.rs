//! Command invocations built from process arguments or input lines.

/// Command requested when an interactive session opens.
pub(crate) const COMMAND_LIST: &str = "command-list";

/// A command name plus its positional arguments.
///
/// Token zero is the command; every following token is an argument. An
/// invocation never carries an empty command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandInvocation {
    command: String,
    arguments: Vec<String>,
}

impl CommandInvocation {
    /// Builds an invocation from pre-split tokens.
    ///
    /// Returns `None` when `tokens` is empty.
    pub(crate) fn from_tokens(tokens: Vec<String>) -> Option<Self> {
        let mut remaining = tokens.into_iter();
        let command = remaining.next()?;
        Some(Self {
            command,
            arguments: remaining.collect(),
        })
    }

    /// Splits an interactive input line on single spaces.
    ///
    /// The trailing line terminator is stripped and empty tokens produced by
    /// repeated spaces are dropped, so `"a  b"` yields `["a", "b"]`. Blank
    /// lines produce `None`.
    pub(crate) fn parse_line(line: &str) -> Option<Self> {
        let unterminated = line.strip_suffix('\n').unwrap_or(line);
        let content = unterminated.strip_suffix('\r').unwrap_or(unterminated);
        let tokens = content
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .collect();
        Self::from_tokens(tokens)
    }

    /// Builds an argument-free invocation.
    pub(crate) fn bare(command: &str) -> Self {
        Self {
            command: command.to_owned(),
            arguments: Vec::new(),
        }
    }

    pub(crate) fn command(&self) -> &str {
        &self.command
    }

    pub(crate) fn arguments(&self) -> &[String] {
        &self.arguments
    }
}
