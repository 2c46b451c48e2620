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
use crate::result::{CommandError, CommandOutput, ExecResult};
use crate::shell::Shell;
use vfs::modestr;

pub struct Chmod;

static CHMOD_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("recursive", 'R')];

static CHMOD_SPEC: CommandSpec = CommandSpec {
    name: "chmod",
    summary: "change file mode bits",
    usage: "chmod [-R] mode path...",
    flags: CHMOD_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Chmod {
    fn spec(&self) -> &'static CommandSpec {
        &CHMOD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.len() < 2 {
            return Err(CommandError::failed("chmod: missing operand"));
        }
        let mode = modestr::parse(&inv.args[0])
            .map_err(|err| CommandError::failed(format!("chmod: {err}")))?;
        let creds = shell.credentials();
        for arg in &inv.args[1..] {
            let abs = shell.resolve_path(arg);
            shell
                .vfs
                .chmod(&abs, &mode, inv.flags.is_set("recursive"), &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}
