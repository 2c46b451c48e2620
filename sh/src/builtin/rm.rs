//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{BuiltinUtility, Invocation};
use crate::effect::Effect;
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, CommandOutput, ErrorKind, ExecResult};
use crate::shell::Shell;

pub struct Rm;

static RM_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("recursive", 'r'),
    FlagSpec::boolean("force", 'f'),
    FlagSpec::hidden_marker("confirmed"),
];

static RM_SPEC: CommandSpec = CommandSpec {
    name: "rm",
    summary: "remove files or directories",
    usage: "rm [-r] [-f] path...",
    flags: RM_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Rm {
    fn spec(&self) -> &'static CommandSpec {
        &RM_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("rm: missing operand"));
        }
        let recursive = inv.flags.is_set("recursive");
        let force = inv.flags.is_set("force");

        // removing a directory tree is destructive enough to ask first,
        // unless forced or already confirmed by the host
        if recursive && !force && !inv.flags.is_set("confirmed") {
            let removes_directory = inv.args.iter().any(|arg| {
                shell
                    .vfs
                    .get_node(&shell.resolve_path(arg))
                    .map(|n| n.is_directory())
                    .unwrap_or(false)
            });
            if removes_directory {
                let command = format!("rm -r --confirmed {}", inv.args.join(" "));
                return Ok(CommandOutput::effect(Effect::Confirm {
                    message: format!(
                        "rm: remove {} and all contents?",
                        inv.args.join(", ")
                    ),
                    on_confirm_command: command,
                }));
            }
        }

        let creds = shell.credentials();
        for arg in &inv.args {
            let abs = shell.resolve_path(arg);
            if shell.vfs.get_node(&abs).is_none() {
                if force {
                    continue;
                }
                return Err(CommandError::new(
                    ErrorKind::NotFound,
                    format!("rm: {arg}: no such file or directory"),
                ));
            }
            shell.vfs.remove(&abs, recursive, &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}

pub struct Rmdir;

static RMDIR_SPEC: CommandSpec = CommandSpec {
    name: "rmdir",
    summary: "remove empty directories",
    usage: "rmdir directory...",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Rmdir {
    fn spec(&self) -> &'static CommandSpec {
        &RMDIR_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("rmdir: missing operand"));
        }
        let creds = shell.credentials();
        for arg in &inv.args {
            let abs = shell.resolve_path(arg);
            let node = shell.vfs.get_node(&abs).ok_or_else(|| {
                CommandError::new(
                    ErrorKind::NotFound,
                    format!("rmdir: {arg}: no such file or directory"),
                )
            })?;
            if !node.is_directory() {
                return Err(CommandError::new(
                    ErrorKind::WrongType,
                    format!("rmdir: {arg}: not a directory"),
                ));
            }
            shell.vfs.remove(&abs, false, &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}
