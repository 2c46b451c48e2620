//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, CommandOutput, ExecResult};
use crate::shell::Shell;

pub struct Mkdir;

static MKDIR_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("parents", 'p')];

static MKDIR_SPEC: CommandSpec = CommandSpec {
    name: "mkdir",
    summary: "make directories",
    usage: "mkdir [-p] directory...",
    flags: MKDIR_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Mkdir {
    fn spec(&self) -> &'static CommandSpec {
        &MKDIR_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("mkdir: missing operand"));
        }
        let creds = shell.credentials();
        for arg in &inv.args {
            let abs = shell.resolve_path(arg);
            if inv.flags.is_set("parents") {
                shell.vfs.create_directory_all(&abs, &creds)?;
            } else {
                shell.vfs.create_directory(&abs, &creds)?;
            }
        }
        Ok(CommandOutput::empty())
    }
}
