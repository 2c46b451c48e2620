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

pub struct Touch;

static TOUCH_SPEC: CommandSpec = CommandSpec {
    name: "touch",
    summary: "create empty files or refresh timestamps",
    usage: "touch file...",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Touch {
    fn spec(&self) -> &'static CommandSpec {
        &TOUCH_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("touch: missing operand"));
        }
        let creds = shell.credentials();
        for arg in &inv.args {
            let abs = shell.resolve_path(arg);
            shell.vfs.touch(&abs, &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}
