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

fn sorted_listing(shell: &Shell) -> String {
    let mut pairs: Vec<(&String, &String)> = shell.env.get_all().iter().collect();
    pairs.sort_by_key(|(name, _)| name.as_str());
    pairs
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `set NAME=VALUE` (or `set NAME VALUE`); alone it lists the scope.
fn assign(shell: &mut Shell, command: &str, args: &[String]) -> ExecResult {
    if args.is_empty() {
        return Ok(sorted_listing(shell).into());
    }
    let (name, value) = match args[0].split_once('=') {
        Some((name, value)) => (name.to_string(), value.to_string()),
        None => {
            let value = args.get(1).cloned().unwrap_or_default();
            (args[0].clone(), value)
        }
    };
    shell
        .env
        .set(&name, &value)
        .map_err(|err| CommandError::failed(format!("{command}: {err}")))?;
    Ok(CommandOutput::empty())
}

pub struct SetVar;

static SET_SPEC: CommandSpec = CommandSpec {
    name: "set",
    summary: "set a shell variable or list them all",
    usage: "set [NAME=value]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for SetVar {
    fn spec(&self) -> &'static CommandSpec {
        &SET_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        assign(shell, "set", &inv.args)
    }
}

pub struct Export;

static EXPORT_SPEC: CommandSpec = CommandSpec {
    name: "export",
    summary: "set a shell variable",
    usage: "export NAME=value",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Export {
    fn spec(&self) -> &'static CommandSpec {
        &EXPORT_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        // every variable is visible to child scopes here, so export is
        // assignment under another name
        assign(shell, "export", &inv.args)
    }
}

pub struct Unset;

static UNSET_SPEC: CommandSpec = CommandSpec {
    name: "unset",
    summary: "remove shell variables",
    usage: "unset NAME...",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Unset {
    fn spec(&self) -> &'static CommandSpec {
        &UNSET_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("unset: missing operand"));
        }
        for name in &inv.args {
            shell.env.unset(name);
        }
        Ok(CommandOutput::empty())
    }
}

pub struct Env;

static ENV_SPEC: CommandSpec = CommandSpec {
    name: "env",
    summary: "print the environment",
    usage: "env",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Env {
    fn spec(&self) -> &'static CommandSpec {
        &ENV_SPEC
    }

    fn exec(&self, _: Invocation, shell: &mut Shell) -> ExecResult {
        Ok(sorted_listing(shell).into())
    }
}
