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
use crate::flags::CommandSpec;
use crate::result::{CommandError, CommandOutput, ExecResult};
use crate::shell::Shell;
use chrono::Utc;

pub struct Clear;

static CLEAR_SPEC: CommandSpec = CommandSpec {
    name: "clear",
    summary: "clear the terminal screen",
    usage: "clear",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Clear {
    fn spec(&self) -> &'static CommandSpec {
        &CLEAR_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Ok(CommandOutput::effect(Effect::ClearScreen))
    }
}

pub struct Date;

static DATE_SPEC: CommandSpec = CommandSpec {
    name: "date",
    summary: "print the current date and time",
    usage: "date",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Date {
    fn spec(&self) -> &'static CommandSpec {
        &DATE_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Ok(Utc::now()
            .format("%a %b %e %H:%M:%S UTC %Y")
            .to_string()
            .into())
    }
}

pub struct Sleep;

static SLEEP_SPEC: CommandSpec = CommandSpec {
    name: "sleep",
    summary: "delay for a number of seconds",
    usage: "sleep seconds",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Sleep {
    fn spec(&self) -> &'static CommandSpec {
        &SLEEP_SPEC
    }

    fn exec(&self, inv: Invocation, _: &mut Shell) -> ExecResult {
        let arg = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("sleep: missing operand"))?;
        let seconds: f64 = arg
            .parse()
            .map_err(|_| CommandError::failed(format!("sleep: invalid time interval '{arg}'")))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CommandError::failed(format!(
                "sleep: invalid time interval '{arg}'"
            )));
        }
        Ok(CommandOutput::effect(Effect::Delay {
            milliseconds: (seconds * 1000.0) as u64,
        }))
    }
}

pub struct Reboot;

static REBOOT_SPEC: CommandSpec = CommandSpec {
    name: "reboot",
    summary: "restart the session",
    usage: "reboot",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Reboot {
    fn spec(&self) -> &'static CommandSpec {
        &REBOOT_SPEC
    }

    fn exec(&self, _: Invocation, _: &mut Shell) -> ExecResult {
        Ok(CommandOutput::effect(Effect::Reboot))
    }
}
