//! One-shot and interactive drivers for the shared session.

use std::io::{BufRead, Write};
use std::process::ExitCode;

use suricatasc_socket::Session;
use tracing::{debug, info, warn};

use crate::command::{COMMAND_LIST, CommandInvocation};
use crate::errors::AppError;
use crate::shutdown::{SessionContext, ShutdownTrigger};

const INTERACTION_TARGET: &str = "suricatasc::interaction";

pub(crate) const BANNER: &str = ">> Entering Interactive Mode <<";
pub(crate) const COMMANDS_HEADER: &str = ">> Valid Commands:";
pub(crate) const PROMPT: &str = ">> ";

/// Writes engine replies to stdout and failures to stderr.
pub(crate) struct Interaction<'a, S: Session, W: Write, E: Write> {
    context: &'a SessionContext<S>,
    stdout: &'a mut W,
    stderr: &'a mut E,
}

impl<'a, S, W, E> Interaction<'a, S, W, E>
where
    S: Session,
    W: Write,
    E: Write,
{
    pub(crate) fn new(context: &'a SessionContext<S>, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            context,
            stdout,
            stderr,
        }
    }

    /// Dispatches a single command. Any failure is fatal.
    pub(crate) fn one_shot(&mut self, invocation: &CommandInvocation) -> ShutdownTrigger {
        match self.exchange(invocation) {
            Ok(()) => ShutdownTrigger::Finished(ExitCode::SUCCESS),
            Err(error) => {
                self.report(invocation, &error);
                ShutdownTrigger::Finished(ExitCode::FAILURE)
            }
        }
    }

    /// Prints the banner and command list, then serves input lines until
    /// shutdown begins, input ends, or the connection breaks.
    pub(crate) fn interactive<R: BufRead>(&mut self, input: &mut R) -> ShutdownTrigger {
        if let Err(error) = self.banner() {
            self.report_output(&error);
            return ShutdownTrigger::Finished(ExitCode::FAILURE);
        }
        if let Some(trigger) = self.step(&CommandInvocation::bare(COMMAND_LIST)) {
            return trigger;
        }

        let mut line = String::new();
        while self.context.is_running() {
            if let Err(error) = self.prompt() {
                self.report_output(&error);
                return ShutdownTrigger::Finished(ExitCode::FAILURE);
            }
            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => {
                    info!(target: INTERACTION_TARGET, "input closed");
                    return ShutdownTrigger::InputClosed;
                }
                Ok(_) => {}
                Err(error) => {
                    warn!(target: INTERACTION_TARGET, %error, "failed to read input");
                    return ShutdownTrigger::InputClosed;
                }
            }
            let Some(invocation) = CommandInvocation::parse_line(&line) else {
                continue;
            };
            if let Some(trigger) = self.step(&invocation) {
                return trigger;
            }
        }
        ShutdownTrigger::Finished(ExitCode::SUCCESS)
    }

    /// Runs one interactive exchange. Returns a trigger only when the
    /// session cannot continue.
    fn step(&mut self, invocation: &CommandInvocation) -> Option<ShutdownTrigger> {
        let error = self.exchange(invocation).err()?;
        self.report(invocation, &error);
        if error.is_recoverable() {
            None
        } else {
            Some(ShutdownTrigger::Finished(ExitCode::FAILURE))
        }
    }

    fn exchange(&mut self, invocation: &CommandInvocation) -> Result<(), AppError> {
        if let Some(rendered) = self.context.dispatch(invocation)? {
            writeln!(self.stdout, "{rendered}").map_err(AppError::WriteOutput)?;
            self.stdout.flush().map_err(AppError::WriteOutput)?;
        }
        Ok(())
    }

    fn banner(&mut self) -> Result<(), AppError> {
        writeln!(self.stdout, "{BANNER}").map_err(AppError::WriteOutput)?;
        writeln!(self.stdout, "{COMMANDS_HEADER}").map_err(AppError::WriteOutput)
    }

    fn prompt(&mut self) -> Result<(), AppError> {
        write!(self.stdout, "{PROMPT}").map_err(AppError::WriteOutput)?;
        self.stdout.flush().map_err(AppError::WriteOutput)
    }

    fn report(&mut self, invocation: &CommandInvocation, error: &AppError) {
        debug!(
            target: INTERACTION_TARGET,
            command = invocation.command(),
            %error,
            "dispatch failed"
        );
        let _ = writeln!(self.stderr, "{error}");
    }

    fn report_output(&mut self, error: &AppError) {
        let _ = writeln!(self.stderr, "{error}");
    }
}
