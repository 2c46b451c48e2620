//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{read_inputs, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::ExecResult;
use crate::shell::Shell;

pub struct Cat;

static CAT_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("number", 'n')];

static CAT_SPEC: CommandSpec = CommandSpec {
    name: "cat",
    summary: "concatenate and print files",
    usage: "cat [-n] [file...]",
    flags: CAT_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Cat {
    fn spec(&self) -> &'static CommandSpec {
        &CAT_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let content = read_inputs(&inv.args, &inv.stdin, shell)?;
        if !inv.flags.is_set("number") {
            return Ok(content.into());
        }
        let numbered: Vec<String> = content
            .lines()
            .enumerate()
            .map(|(i, line)| format!("{:>6}\t{}", i + 1, line))
            .collect();
        Ok(numbered.join("\n").into())
    }
}
