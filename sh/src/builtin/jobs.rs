//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Job-control commands. None of these mutate job state directly; they
//! emit `signal_job` effects and the host delivers the signal.

use crate::builtin::{BuiltinUtility, Invocation};
use crate::effect::{Effect, JobSignal};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, CommandOutput, ExecResult};
use crate::shell::Shell;

fn parse_job_id(arg: &str) -> Result<u32, CommandError> {
    arg.trim_start_matches('%')
        .parse()
        .map_err(|_| CommandError::failed(format!("'{arg}' is not a valid job id")))
}

fn require_job(shell: &Shell, id: u32, command: &str) -> Result<(), CommandError> {
    if shell.jobs.get(id).is_none() {
        return Err(CommandError::failed(format!("{command}: no such job: {id}")));
    }
    Ok(())
}

pub struct Jobs;

static JOBS_SPEC: CommandSpec = CommandSpec {
    name: "jobs",
    summary: "list background jobs",
    usage: "jobs",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Jobs {
    fn spec(&self) -> &'static CommandSpec {
        &JOBS_SPEC
    }

    fn exec(&self, _: Invocation, shell: &mut Shell) -> ExecResult {
        let lines: Vec<String> = shell
            .jobs
            .iter()
            .map(|(id, job)| format!("[{id}]  {:<8} {}", job.status.to_string(), job.command))
            .collect();
        Ok(lines.join("\n").into())
    }
}

pub struct Ps;

static PS_SPEC: CommandSpec = CommandSpec {
    name: "ps",
    summary: "report background job status",
    usage: "ps",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Ps {
    fn spec(&self) -> &'static CommandSpec {
        &PS_SPEC
    }

    fn exec(&self, _: Invocation, shell: &mut Shell) -> ExecResult {
        let mut lines = vec!["  ID STATUS   COMMAND".to_string()];
        for (id, job) in shell.jobs.iter() {
            lines.push(format!("{id:>4} {:<8} {}", job.status.to_string(), job.command));
        }
        Ok(lines.join("\n").into())
    }
}

pub struct Kill;

static KILL_FLAGS: &[FlagSpec] = &[FlagSpec::value("signal", 's')];

static KILL_SPEC: CommandSpec = CommandSpec {
    name: "kill",
    summary: "send a signal to a background job",
    usage: "kill [-s SIGNAL] [-TERM|-STOP|-CONT] job_id",
    flags: KILL_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Kill {
    fn spec(&self) -> &'static CommandSpec {
        &KILL_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let mut signal = JobSignal::Term;
        let mut id_arg = None;
        if let Some(name) = inv.flags.value("signal") {
            signal = name
                .parse()
                .map_err(|_| CommandError::failed(format!("kill: invalid signal '{name}'")))?;
        }
        for arg in &inv.args {
            if let Some(name) = arg.strip_prefix('-') {
                signal = name
                    .parse()
                    .map_err(|_| CommandError::failed(format!("kill: invalid signal '{name}'")))?;
            } else {
                id_arg = Some(arg.clone());
            }
        }
        let id_arg = id_arg.ok_or_else(|| CommandError::failed("kill: missing job id"))?;
        let id = parse_job_id(&id_arg).map_err(|e| CommandError::failed(format!("kill: {}", e.message)))?;
        require_job(shell, id, "kill")?;
        Ok(CommandOutput::effect(Effect::SignalJob {
            job_id: id,
            signal,
        }))
    }
}

pub struct Bg;

static BG_SPEC: CommandSpec = CommandSpec {
    name: "bg",
    summary: "resume a paused job in the background",
    usage: "bg job_id",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Bg {
    fn spec(&self) -> &'static CommandSpec {
        &BG_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let arg = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("bg: missing job id"))?;
        let id = parse_job_id(arg).map_err(|e| CommandError::failed(format!("bg: {}", e.message)))?;
        require_job(shell, id, "bg")?;
        Ok(CommandOutput::effect(Effect::SignalJob {
            job_id: id,
            signal: JobSignal::Cont,
        }))
    }
}

pub struct Fg;

static FG_SPEC: CommandSpec = CommandSpec {
    name: "fg",
    summary: "resume a paused job in the foreground",
    usage: "fg job_id",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Fg {
    fn spec(&self) -> &'static CommandSpec {
        &FG_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let arg = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("fg: missing job id"))?;
        let id = parse_job_id(arg).map_err(|e| CommandError::failed(format!("fg: {}", e.message)))?;
        require_job(shell, id, "fg")?;
        Ok(CommandOutput::effect(Effect::SignalJob {
            job_id: id,
            signal: JobSignal::Cont,
        }))
    }
}
