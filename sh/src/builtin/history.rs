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
use crate::result::{CommandOutput, ExecResult};
use crate::shell::Shell;

pub struct HistoryCmd;

static HISTORY_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("clear", 'c')];

static HISTORY_SPEC: CommandSpec = CommandSpec {
    name: "history",
    summary: "display or clear the command history",
    usage: "history [-c]",
    flags: HISTORY_FLAGS,
    root_required: false,
};

impl BuiltinUtility for HistoryCmd {
    fn spec(&self) -> &'static CommandSpec {
        &HISTORY_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.flags.is_set("clear") {
            shell.history.clear();
            return Ok(CommandOutput::empty());
        }
        let lines: Vec<String> = shell
            .history
            .get_all()
            .enumerate()
            .map(|(i, entry)| format!("{:>5}  {}", i + 1, entry))
            .collect();
        Ok(lines.join("\n").into())
    }
}
