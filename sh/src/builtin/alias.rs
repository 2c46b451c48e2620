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

pub struct Alias;

static ALIAS_SPEC: CommandSpec = CommandSpec {
    name: "alias",
    summary: "define or display command aliases",
    usage: "alias [name[=value]...]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Alias {
    fn spec(&self) -> &'static CommandSpec {
        &ALIAS_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            let lines: Vec<String> = shell
                .aliases
                .get_all()
                .into_iter()
                .map(|(name, value)| format!("alias {name}='{value}'"))
                .collect();
            return Ok(lines.join("\n").into());
        }
        let mut lines = Vec::new();
        for arg in &inv.args {
            match arg.split_once('=') {
                Some((name, value)) => {
                    if name.is_empty() {
                        return Err(CommandError::failed("alias: empty alias name"));
                    }
                    shell.aliases.set(name, value);
                }
                None => match shell.aliases.get(arg) {
                    Some(value) => lines.push(format!("alias {arg}='{value}'")),
                    None => {
                        return Err(CommandError::failed(format!("alias: {arg}: not found")));
                    }
                },
            }
        }
        Ok(lines.join("\n").into())
    }
}

pub struct Unalias;

static UNALIAS_SPEC: CommandSpec = CommandSpec {
    name: "unalias",
    summary: "remove alias definitions",
    usage: "unalias name...",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Unalias {
    fn spec(&self) -> &'static CommandSpec {
        &UNALIAS_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("unalias: missing operand"));
        }
        for arg in &inv.args {
            if !shell.aliases.remove(arg) {
                return Err(CommandError::failed(format!("unalias: {arg}: not found")));
            }
        }
        Ok(CommandOutput::empty())
    }
}
