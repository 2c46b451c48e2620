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

static RECURSIVE_ONLY: &[FlagSpec] = &[FlagSpec::boolean("recursive", 'R')];

pub struct Chown;

static CHOWN_SPEC: CommandSpec = CommandSpec {
    name: "chown",
    summary: "change file ownership",
    usage: "chown [-R] owner path...",
    flags: RECURSIVE_ONLY,
    root_required: false,
};

impl BuiltinUtility for Chown {
    fn spec(&self) -> &'static CommandSpec {
        &CHOWN_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.len() < 2 {
            return Err(CommandError::failed("chown: missing operand"));
        }
        let owner = &inv.args[0];
        if !shell.users.exists(owner) {
            return Err(CommandError::failed(format!(
                "chown: unknown user '{owner}'"
            )));
        }
        let creds = shell.credentials();
        for arg in &inv.args[1..] {
            let abs = shell.resolve_path(arg);
            shell
                .vfs
                .chown(&abs, owner, inv.flags.is_set("recursive"), &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}

pub struct Chgrp;

static CHGRP_SPEC: CommandSpec = CommandSpec {
    name: "chgrp",
    summary: "change file group",
    usage: "chgrp [-R] group path...",
    flags: RECURSIVE_ONLY,
    root_required: false,
};

impl BuiltinUtility for Chgrp {
    fn spec(&self) -> &'static CommandSpec {
        &CHGRP_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.len() < 2 {
            return Err(CommandError::failed("chgrp: missing operand"));
        }
        let group = &inv.args[0];
        if !shell.groups.exists(group) {
            return Err(CommandError::failed(format!(
                "chgrp: unknown group '{group}'"
            )));
        }
        let creds = shell.credentials();
        for arg in &inv.args[1..] {
            let abs = shell.resolve_path(arg);
            shell
                .vfs
                .chgrp(&abs, group, inv.flags.is_set("recursive"), &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}
