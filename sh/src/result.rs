//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The uniform result envelope every command and the executor return.

use crate::effect::Effect;
use crate::lexer::SyntaxError;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use vfs::VfsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SyntaxError,
    NotFound,
    WrongType,
    Exists,
    NotEmpty,
    PermissionDenied,
    FlagRequiresArgument,
    UnknownFlag,
    CommandNotFound,
    CommandFailed,
    IoError,
    AuthFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
    pub suggestion: Option<String>,
}

impl CommandError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        CommandError {
            kind,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CommandFailed, message)
    }

    /// A failure that prints nothing, for commands whose unsuccessful exit
    /// is ordinary (`false`, `grep` without matches).
    pub fn silent() -> Self {
        Self::new(ErrorKind::CommandFailed, "")
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for CommandError {
    fn from(message: String) -> Self {
        Self::failed(message)
    }
}

impl From<&str> for CommandError {
    fn from(message: &str) -> Self {
        Self::failed(message)
    }
}

impl From<VfsError> for CommandError {
    fn from(err: VfsError) -> Self {
        let kind = match &err {
            VfsError::NotFound(_) => ErrorKind::NotFound,
            VfsError::NotADirectory(_) | VfsError::IsADirectory(_) => ErrorKind::WrongType,
            VfsError::Exists(_) => ErrorKind::Exists,
            VfsError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            VfsError::NotEmpty(_) => ErrorKind::NotEmpty,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<SyntaxError> for CommandError {
    fn from(err: SyntaxError) -> Self {
        Self::new(
            ErrorKind::SyntaxError,
            format!("syntax error: {} (at position {})", err.message, err.position),
        )
    }
}

/// What a successful command hands back: its stdout-equivalent plus any
/// directives for the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    pub output: String,
    pub effects: Vec<Effect>,
}

impl CommandOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn effect(effect: Effect) -> Self {
        CommandOutput {
            output: String::new(),
            effects: vec![effect],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

impl From<String> for CommandOutput {
    fn from(output: String) -> Self {
        CommandOutput {
            output,
            effects: Vec::new(),
        }
    }
}

impl From<&str> for CommandOutput {
    fn from(output: &str) -> Self {
        output.to_string().into()
    }
}

pub type ExecResult = Result<CommandOutput, CommandError>;

/// The envelope the executor returns for one submitted command string.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOutcome {
    pub success: bool,
    pub output: String,
    pub error: Option<CommandError>,
    pub effects: Vec<Effect>,
}

impl ExecOutcome {
    pub fn ok_empty() -> Self {
        ExecOutcome {
            success: true,
            output: String::new(),
            error: None,
            effects: Vec::new(),
        }
    }

    pub fn from_error(error: CommandError) -> Self {
        ExecOutcome {
            success: false,
            output: String::new(),
            error: Some(error),
            effects: Vec::new(),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }
}
