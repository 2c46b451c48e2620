//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{read_file_arg, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec, Flags};
use crate::result::{CommandError, ExecResult};
use crate::shell::Shell;

static LINES_FLAG: &[FlagSpec] = &[FlagSpec::value("lines", 'n')];

const DEFAULT_LINES: usize = 10;

fn line_limit(flags: &Flags, command: &str) -> Result<usize, CommandError> {
    match flags.value("lines") {
        Some(value) => value
            .parse()
            .map_err(|_| CommandError::failed(format!("{command}: invalid line count '{value}'"))),
        None => Ok(DEFAULT_LINES),
    }
}

/// Gathers `(label, content)` inputs, labelling only with several files.
fn inputs(
    inv: &Invocation,
    shell: &Shell,
) -> Result<Vec<(Option<String>, String)>, CommandError> {
    if inv.args.is_empty() {
        return Ok(vec![(None, inv.stdin.clone())]);
    }
    let label = inv.args.len() > 1;
    inv.args
        .iter()
        .map(|arg| {
            let content = read_file_arg(shell, arg)?;
            Ok((label.then(|| arg.clone()), content))
        })
        .collect()
}

fn render(sections: Vec<(Option<String>, Vec<&str>)>) -> String {
    let mut out = Vec::new();
    for (i, (label, lines)) in sections.into_iter().enumerate() {
        if let Some(label) = label {
            if i > 0 {
                out.push(String::new());
            }
            out.push(format!("==> {label} <=="));
        }
        out.extend(lines.into_iter().map(str::to_string));
    }
    out.join("\n")
}

pub struct Head;

static HEAD_SPEC: CommandSpec = CommandSpec {
    name: "head",
    summary: "output the first lines of files",
    usage: "head [-n lines] [file...]",
    flags: LINES_FLAG,
    root_required: false,
};

impl BuiltinUtility for Head {
    fn spec(&self) -> &'static CommandSpec {
        &HEAD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let limit = line_limit(&inv.flags, "head")?;
        let inputs = inputs(&inv, shell)?;
        let sections = inputs
            .iter()
            .map(|(label, content)| (label.clone(), content.lines().take(limit).collect()))
            .collect();
        Ok(render(sections).into())
    }
}

pub struct Tail;

static TAIL_SPEC: CommandSpec = CommandSpec {
    name: "tail",
    summary: "output the last lines of files",
    usage: "tail [-n lines] [file...]",
    flags: LINES_FLAG,
    root_required: false,
};

impl BuiltinUtility for Tail {
    fn spec(&self) -> &'static CommandSpec {
        &TAIL_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let limit = line_limit(&inv.flags, "tail")?;
        let inputs = inputs(&inv, shell)?;
        let sections = inputs
            .iter()
            .map(|(label, content)| {
                let lines: Vec<&str> = content.lines().collect();
                let start = lines.len().saturating_sub(limit);
                (label.clone(), lines[start..].to_vec())
            })
            .collect();
        Ok(render(sections).into())
    }
}
