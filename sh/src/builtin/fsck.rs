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
use crate::result::{CommandOutput, ExecResult};
use crate::shell::Shell;

pub struct Fsck;

static FSCK_FLAGS: &[FlagSpec] = &[FlagSpec::long_only("repair")];

static FSCK_SPEC: CommandSpec = CommandSpec {
    name: "fsck",
    summary: "check filesystem ownership consistency",
    usage: "fsck [--repair]",
    flags: FSCK_FLAGS,
    root_required: true,
};

impl BuiltinUtility for Fsck {
    fn spec(&self) -> &'static CommandSpec {
        &FSCK_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let users = shell.users.name_set();
        let groups = shell.groups.name_set();
        let report = shell.vfs.fsck(&users, &groups, inv.flags.is_set("repair"));
        let mut lines: Vec<String> = report
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.path, issue.message))
            .collect();
        lines.push(format!(
            "{} issue(s) found, {} repaired",
            report.issues.len(),
            report.repaired
        ));
        Ok(lines.join("\n").into())
    }
}

pub struct Sync;

static SYNC_SPEC: CommandSpec = CommandSpec {
    name: "sync",
    summary: "flush session state to persistent storage",
    usage: "sync",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Sync {
    fn spec(&self) -> &'static CommandSpec {
        &SYNC_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Ok(CommandOutput::effect(Effect::SyncSessionState))
    }
}
