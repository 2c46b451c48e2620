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
use crate::result::{CommandError, CommandOutput, ExecResult};
use crate::shell::Shell;

pub struct Groupadd;

static GROUPADD_SPEC: CommandSpec = CommandSpec {
    name: "groupadd",
    summary: "create a new group",
    usage: "groupadd group",
    flags: &[],
    root_required: true,
};

impl BuiltinUtility for Groupadd {
    fn spec(&self) -> &'static CommandSpec {
        &GROUPADD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let name = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("groupadd: missing group name"))?;
        shell
            .groups
            .create(name)
            .map_err(|err| CommandError::failed(format!("groupadd: {err}")))?;
        Ok(CommandOutput::effect(Effect::SyncGroupState))
    }
}

pub struct Groupdel;

static GROUPDEL_SPEC: CommandSpec = CommandSpec {
    name: "groupdel",
    summary: "delete a group",
    usage: "groupdel group",
    flags: &[],
    root_required: true,
};

impl BuiltinUtility for Groupdel {
    fn spec(&self) -> &'static CommandSpec {
        &GROUPDEL_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let name = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("groupdel: missing group name"))?;
        let users = shell.users.clone();
        shell
            .groups
            .delete(name, &users)
            .map_err(|err| CommandError::failed(format!("groupdel: {err}")))?;
        Ok(CommandOutput::effect(Effect::SyncGroupState))
    }
}

pub struct Usermod;

static USERMOD_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("append", 'a'),
    FlagSpec::value("groups", 'G'),
];

static USERMOD_SPEC: CommandSpec = CommandSpec {
    name: "usermod",
    summary: "modify a user's group memberships",
    usage: "usermod -a -G group user",
    flags: USERMOD_FLAGS,
    root_required: true,
};

impl BuiltinUtility for Usermod {
    fn spec(&self) -> &'static CommandSpec {
        &USERMOD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let group = inv
            .flags
            .value("groups")
            .ok_or_else(|| CommandError::failed("usermod: -G group required"))?
            .to_string();
        if !inv.flags.is_set("append") {
            return Err(CommandError::failed(
                "usermod: only append mode (-a -G) is supported",
            ));
        }
        let user = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("usermod: missing user name"))?;
        if !shell.users.exists(user) {
            return Err(CommandError::failed(format!(
                "usermod: unknown user '{user}'"
            )));
        }
        shell
            .groups
            .add_user(&group, user)
            .map_err(|err| CommandError::failed(format!("usermod: {err}")))?;
        Ok(CommandOutput::effect(Effect::SyncGroupState))
    }
}
