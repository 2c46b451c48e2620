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
use crate::result::{CommandError, CommandOutput, ErrorKind, ExecResult};
use crate::shell::Shell;

pub struct Cp;

static CP_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("recursive", 'r'),
    FlagSpec::boolean("force", 'f'),
    FlagSpec::hidden_marker("confirmed"),
];

static CP_SPEC: CommandSpec = CommandSpec {
    name: "cp",
    summary: "copy files and directories",
    usage: "cp [-r] [-f] source... destination",
    flags: CP_FLAGS,
    root_required: false,
};

fn split_sources(args: &[String]) -> Result<(&[String], &String), CommandError> {
    if args.len() < 2 {
        return Err(CommandError::failed("missing destination operand"));
    }
    let (dest, sources) = args.split_last().unwrap();
    Ok((sources, dest))
}

impl BuiltinUtility for Cp {
    fn spec(&self) -> &'static CommandSpec {
        &CP_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let (sources, dest) = split_sources(&inv.args).map_err(|e| {
            CommandError::failed(format!("cp: {}", e.message))
        })?;
        let dest_abs = shell.resolve_path(dest);
        let dest_is_dir = shell
            .vfs
            .get_node(&dest_abs)
            .map(|n| n.is_directory())
            .unwrap_or(false);
        if sources.len() > 1 && !dest_is_dir {
            return Err(CommandError::new(
                ErrorKind::WrongType,
                format!("cp: {dest}: target is not a directory"),
            ));
        }

        // overwriting an existing file asks first unless forced
        if !inv.flags.is_set("force") && !inv.flags.is_set("confirmed") {
            for source in sources {
                let final_dest = if dest_is_dir {
                    let base = vfs::path::basename(&shell.resolve_path(source)).to_string();
                    format!("{}/{}", dest_abs.trim_end_matches('/'), base)
                } else {
                    dest_abs.clone()
                };
                if shell.vfs.get_node(&final_dest).is_some_and(|n| !n.is_directory()) {
                    let mut command = String::from("cp --confirmed");
                    if inv.flags.is_set("recursive") {
                        command.push_str(" -r");
                    }
                    command.push(' ');
                    command.push_str(&inv.args.join(" "));
                    return Ok(CommandOutput::effect(Effect::Confirm {
                        message: format!("cp: overwrite '{dest}'?"),
                        on_confirm_command: command,
                    }));
                }
            }
        }

        let creds = shell.credentials();
        for source in sources {
            let src_abs = shell.resolve_path(source);
            shell
                .vfs
                .copy_node(&src_abs, &dest_abs, inv.flags.is_set("recursive"), &creds)?;
        }
        Ok(CommandOutput::empty())
    }
}

pub struct Mv;

static MV_FLAGS: &[FlagSpec] = &[FlagSpec::boolean("force", 'f')];

static MV_SPEC: CommandSpec = CommandSpec {
    name: "mv",
    summary: "move or rename files and directories",
    usage: "mv [-f] source... destination",
    flags: MV_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Mv {
    fn spec(&self) -> &'static CommandSpec {
        &MV_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let (sources, dest) = split_sources(&inv.args).map_err(|e| {
            CommandError::failed(format!("mv: {}", e.message))
        })?;
        let dest_abs = shell.resolve_path(dest);
        let creds = shell.credentials();
        for source in sources {
            let src_abs = shell.resolve_path(source);
            match shell.vfs.rename_node(&src_abs, &dest_abs, &creds) {
                Ok(_) => {}
                Err(vfs::VfsError::Exists(existing)) if inv.flags.is_set("force") => {
                    // forced move replaces the destination
                    shell.vfs.remove(&existing, true, &creds)?;
                    shell.vfs.rename_node(&src_abs, &dest_abs, &creds)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(CommandOutput::empty())
    }
}
