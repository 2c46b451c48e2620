//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Account and session commands. Everything that needs a credential prompt
//! returns an effect; the host runs the prompt, verifies through the user
//! manager, and re-enters the shell.

use crate::builtin::{BuiltinUtility, Invocation};
use crate::effect::Effect;
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, CommandOutput, ErrorKind, ExecResult};
use crate::shell::Shell;

pub struct Whoami;

static WHOAMI_SPEC: CommandSpec = CommandSpec {
    name: "whoami",
    summary: "print the effective user name",
    usage: "whoami",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Whoami {
    fn spec(&self) -> &'static CommandSpec {
        &WHOAMI_SPEC
    }

    fn exec(&self, inv: Invocation, _: &mut Shell) -> ExecResult {
        Ok(inv.user.into())
    }
}

pub struct Groups;

static GROUPS_SPEC: CommandSpec = CommandSpec {
    name: "groups",
    summary: "print group memberships",
    usage: "groups [user]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Groups {
    fn spec(&self) -> &'static CommandSpec {
        &GROUPS_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let user = inv.args.first().cloned().unwrap_or(inv.user);
        let entry = shell.users.get(&user).ok_or_else(|| {
            CommandError::failed(format!("groups: unknown user '{user}'"))
        })?;
        let set = shell.groups.effective_groups(&user, &entry.primary_group);
        Ok(set.into_iter().collect::<Vec<_>>().join(" ").into())
    }
}

pub struct Su;

static SU_SPEC: CommandSpec = CommandSpec {
    name: "su",
    summary: "switch to another user",
    usage: "su [user]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Su {
    fn spec(&self) -> &'static CommandSpec {
        &SU_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = inv.args.first().map(String::as_str).unwrap_or("root");
        if !shell.users.exists(target) {
            return Err(CommandError::new(
                ErrorKind::AuthFailed,
                format!("su: unknown user '{target}'"),
            ));
        }
        Ok(CommandOutput::effect(Effect::Su {
            username: target.to_string(),
            command: None,
        }))
    }
}

fn quote_token(token: &str) -> String {
    if token.chars().any(char::is_whitespace) {
        format!("'{token}'")
    } else {
        token.to_string()
    }
}

pub struct Sudo;

static SUDO_SPEC: CommandSpec = CommandSpec {
    name: "sudo",
    summary: "run a command as root",
    usage: "sudo command...",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Sudo {
    fn spec(&self) -> &'static CommandSpec {
        &SUDO_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            return Err(CommandError::failed("sudo: missing command"));
        }
        let allowed = shell
            .vfs
            .get_node("/etc/sudoers")
            .and_then(|node| node.as_file())
            .map(|file| file.content.lines().any(|line| line.trim() == inv.user))
            .unwrap_or(false);
        if !allowed && inv.user != "root" {
            return Err(CommandError::new(
                ErrorKind::PermissionDenied,
                format!("sudo: {} is not in the sudoers file", inv.user),
            ));
        }
        let command = inv
            .args
            .iter()
            .map(|token| quote_token(token))
            .collect::<Vec<_>>()
            .join(" ");
        // the host verifies the caller's password and re-executes the
        // inner command with a root user context
        Ok(CommandOutput::effect(Effect::Su {
            username: "root".to_string(),
            command: Some(command),
        }))
    }
}

pub struct Login;

static LOGIN_SPEC: CommandSpec = CommandSpec {
    name: "login",
    summary: "log in as a user, replacing the session stack",
    usage: "login user",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Login {
    fn spec(&self) -> &'static CommandSpec {
        &LOGIN_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("login: missing user name"))?;
        if !shell.users.exists(target) {
            return Err(CommandError::new(
                ErrorKind::AuthFailed,
                format!("login: unknown user '{target}'"),
            ));
        }
        Ok(CommandOutput::effect(Effect::Login {
            username: target.clone(),
        }))
    }
}

pub struct Logout;

static LOGOUT_SPEC: CommandSpec = CommandSpec {
    name: "logout",
    summary: "return to the previous session user",
    usage: "logout",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Logout {
    fn spec(&self) -> &'static CommandSpec {
        &LOGOUT_SPEC
    }

    fn exec(&self, _: Invocation, shell: &mut Shell) -> ExecResult {
        if shell.session_stack().len() <= 1 {
            return Err(CommandError::failed(
                "logout: not within a nested session",
            ));
        }
        Ok(CommandOutput::effect(Effect::Logout))
    }
}

pub struct Passwd;

static PASSWD_SPEC: CommandSpec = CommandSpec {
    name: "passwd",
    summary: "change a user's password",
    usage: "passwd [user]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Passwd {
    fn spec(&self) -> &'static CommandSpec {
        &PASSWD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = inv.args.first().cloned().unwrap_or_else(|| inv.user.clone());
        if target != inv.user && inv.user != "root" {
            return Err(CommandError::new(
                ErrorKind::PermissionDenied,
                "passwd: only root may change another user's password",
            ));
        }
        if !shell.users.exists(&target) {
            return Err(CommandError::new(
                ErrorKind::AuthFailed,
                format!("passwd: unknown user '{target}'"),
            ));
        }
        Ok(CommandOutput::effect(Effect::Passwd { username: target }))
    }
}

pub struct Useradd;

static USERADD_SPEC: CommandSpec = CommandSpec {
    name: "useradd",
    summary: "create a new user account",
    usage: "useradd user",
    flags: &[],
    root_required: true,
};

impl BuiltinUtility for Useradd {
    fn spec(&self) -> &'static CommandSpec {
        &USERADD_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("useradd: missing user name"))?;
        if shell.users.exists(target) {
            return Err(CommandError::new(
                ErrorKind::Exists,
                format!("useradd: user '{target}' already exists"),
            ));
        }
        Ok(CommandOutput::effect(Effect::Useradd {
            username: target.clone(),
        }))
    }
}

pub struct RemoveUser;

static REMOVEUSER_FLAGS: &[FlagSpec] = &[FlagSpec::hidden_marker("confirmed")];

static REMOVEUSER_SPEC: CommandSpec = CommandSpec {
    name: "removeuser",
    summary: "delete a user account",
    usage: "removeuser user",
    flags: REMOVEUSER_FLAGS,
    root_required: true,
};

impl BuiltinUtility for RemoveUser {
    fn spec(&self) -> &'static CommandSpec {
        &REMOVEUSER_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let target = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("removeuser: missing user name"))?;
        if target == "root" {
            return Err(CommandError::failed("removeuser: cannot remove root"));
        }
        if !shell.users.exists(target) {
            return Err(CommandError::new(
                ErrorKind::AuthFailed,
                format!("removeuser: unknown user '{target}'"),
            ));
        }
        if !inv.flags.is_set("confirmed") {
            return Ok(CommandOutput::effect(Effect::Confirm {
                message: format!("removeuser: delete account '{target}'?"),
                on_confirm_command: format!("removeuser --confirmed {target}"),
            }));
        }
        Ok(CommandOutput::effect(Effect::RemoveUser {
            username: target.clone(),
        }))
    }
}

pub struct Visudo;

static VISUDO_SPEC: CommandSpec = CommandSpec {
    name: "visudo",
    summary: "edit the sudoers file",
    usage: "visudo",
    flags: &[],
    root_required: true,
};

impl BuiltinUtility for Visudo {
    fn spec(&self) -> &'static CommandSpec {
        &VISUDO_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Ok(CommandOutput::effect(Effect::Visudo))
    }
}
