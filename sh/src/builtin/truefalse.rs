//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{BuiltinUtility, Invocation};
use crate::flags::CommandSpec;
use crate::result::{CommandError, CommandOutput, ExecResult};
use crate::shell::Shell;

pub struct True;

static TRUE_SPEC: CommandSpec = CommandSpec {
    name: "true",
    summary: "succeed",
    usage: "true",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for True {
    fn spec(&self) -> &'static CommandSpec {
        &TRUE_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Ok(CommandOutput::empty())
    }
}

pub struct False;

static FALSE_SPEC: CommandSpec = CommandSpec {
    name: "false",
    summary: "fail",
    usage: "false",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for False {
    fn spec(&self) -> &'static CommandSpec {
        &FALSE_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Err(CommandError::silent())
    }
}
