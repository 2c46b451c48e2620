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
use crate::shell::Shell;
use vfs::Perm;

pub struct Run;

static RUN_SPEC: CommandSpec = CommandSpec {
    name: "run",
    summary: "run a shell script from the filesystem",
    usage: "run script [argument...]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Run {
    fn spec(&self) -> &'static CommandSpec {
        &RUN_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let script = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("run: missing script operand"))?;
        let abs = shell.resolve_path(script);
        let creds = shell.credentials();
        let node = shell.vfs.get_node(&abs).ok_or_else(|| {
            CommandError::new(
                ErrorKind::NotFound,
                format!("run: {script}: no such file or directory"),
            )
        })?;
        let file = node.as_file().ok_or_else(|| {
            CommandError::new(ErrorKind::WrongType, format!("run: {script}: is a directory"))
        })?;
        // scripts need both read and execute permission
        if !node.allows(&creds, Perm::Read) || !node.allows(&creds, Perm::Execute) {
            return Err(CommandError::new(
                ErrorKind::PermissionDenied,
                format!("run: {script}: permission denied"),
            ));
        }
        let lines: Vec<String> = file
            .content
            .lines()
            .map(str::to_string)
            .filter(|line| !line.trim().is_empty())
            .collect();
        Ok(CommandOutput::effect(Effect::ExecuteScript {
            lines,
            args: inv.args[1..].to_vec(),
        }))
    }
}
