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
use crate::flags::CommandSpec;
use crate::result::{CommandError, CommandOutput, ErrorKind, ExecResult};
use crate::shell::{home_dir, Shell};
use vfs::Perm;

pub struct Cd;

static CD_SPEC: CommandSpec = CommandSpec {
    name: "cd",
    summary: "change the working directory",
    usage: "cd [directory]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Cd {
    fn spec(&self) -> &'static CommandSpec {
        &CD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = match inv.args.first() {
            Some(arg) => arg.clone(),
            None => shell
                .env
                .get("HOME")
                .map(str::to_string)
                .unwrap_or_else(|| home_dir(&inv.user)),
        };
        let abs = shell.resolve_path(&target);
        let node = shell.vfs.get_node(&abs).ok_or_else(|| {
            CommandError::new(
                ErrorKind::NotFound,
                format!("cd: {abs}: no such file or directory"),
            )
        })?;
        if !node.is_directory() {
            return Err(CommandError::new(
                ErrorKind::WrongType,
                format!("cd: {abs}: not a directory"),
            ));
        }
        if !node.allows(&shell.credentials(), Perm::Execute) {
            return Err(CommandError::new(
                ErrorKind::PermissionDenied,
                format!("cd: {abs}: permission denied"),
            ));
        }
        Ok(CommandOutput::effect(Effect::ChangeDirectory { path: abs }))
    }
}

pub struct Pwd;

static PWD_SPEC: CommandSpec = CommandSpec {
    name: "pwd",
    summary: "print the working directory",
    usage: "pwd",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Pwd {
    fn spec(&self) -> &'static CommandSpec {
        &PWD_SPEC
    }

    fn exec(&self, _: Invocation, shell: &mut Shell) -> ExecResult {
        Ok(shell.cwd().into())
    }
}
