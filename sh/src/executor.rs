//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Plan evaluation: conditional chaining over `last_ok`, whole-string pipe
//! threading between segments, final redirection into the VFS, and effect
//! collection into the result envelope.

use crate::builtin::{self, Invocation};
use crate::flags;
use crate::parser::{ChainOp, Pipeline, Plan, RedirMode, Redirection, Segment};
use crate::result::{CommandError, CommandOutput, ErrorKind, ExecOutcome, ExecResult};
use crate::shell::Shell;

pub fn execute_plan(shell: &mut Shell, plan: &Plan, external_stdin: Option<String>) -> ExecOutcome {
    let mut last_ok = true;
    let mut outcome = ExecOutcome::ok_empty();
    let mut outputs: Vec<String> = Vec::new();
    let mut effects = Vec::new();
    let mut entry_op: Option<ChainOp> = None;

    for chained in &plan.pipelines {
        let run = match entry_op {
            Some(ChainOp::And) => last_ok,
            Some(ChainOp::Or) => !last_ok,
            Some(ChainOp::Seq) | None => true,
        };
        if run {
            let mut result = run_pipeline(shell, &chained.pipeline, external_stdin.clone());
            if result.success {
                if let Some(redirection) = &chained.pipeline.redirection {
                    match apply_redirection(shell, redirection, &result.output) {
                        // a redirected pipeline yields no terminal output
                        Ok(()) => result.output.clear(),
                        Err(err) => {
                            result = ExecOutcome::from_error(err);
                        }
                    }
                }
            }
            last_ok = result.success;
            effects.append(&mut result.effects);
            if !result.output.is_empty() {
                outputs.push(std::mem::take(&mut result.output));
            }
            outcome = result;
        }
        entry_op = chained.operator;
    }

    outcome.output = outputs.join("\n");
    outcome.effects = effects;
    outcome
}

fn run_pipeline(shell: &mut Shell, pipeline: &Pipeline, external_stdin: Option<String>) -> ExecOutcome {
    let mut stdin = external_stdin.unwrap_or_default();
    let mut effects = Vec::new();
    let mut output = String::new();
    for segment in &pipeline.segments {
        match run_segment(shell, segment, std::mem::take(&mut stdin)) {
            Ok(CommandOutput {
                output: seg_output,
                effects: mut seg_effects,
            }) => {
                effects.append(&mut seg_effects);
                stdin = seg_output.clone();
                output = seg_output;
            }
            Err(err) => {
                let mut failed = ExecOutcome::from_error(err);
                failed.effects = effects;
                return failed;
            }
        }
    }
    ExecOutcome {
        success: true,
        output,
        error: None,
        effects,
    }
}

fn run_segment(shell: &mut Shell, segment: &Segment, stdin: String) -> ExecResult {
    let builtin = builtin::get_builtin(&segment.name).ok_or_else(|| {
        let mut err = CommandError::new(
            ErrorKind::CommandNotFound,
            format!("{}: command not found", segment.name),
        );
        if let Some(candidate) = builtin::suggest(&segment.name) {
            err = err.with_suggestion(format!("did you mean '{candidate}'?"));
        }
        err
    })?;
    let spec = builtin.spec();
    if spec.root_required && shell.current_user() != "root" {
        return Err(CommandError::new(
            ErrorKind::PermissionDenied,
            format!("{}: may only be run by root", spec.name),
        ));
    }
    let parsed = flags::parse_flags(spec, &segment.tokens)?;
    let invocation = Invocation {
        args: parsed.args,
        flags: parsed.flags,
        stdin,
        user: shell.current_user().to_string(),
    };
    builtin.exec(invocation, shell)
}

fn apply_redirection(
    shell: &mut Shell,
    redirection: &Redirection,
    output: &str,
) -> Result<(), CommandError> {
    let abs = shell.resolve_path(&redirection.path);
    let creds = shell.credentials();
    let result = match redirection.mode {
        RedirMode::Overwrite => shell.vfs.write_file(&abs, output, &creds),
        RedirMode::Append => shell.vfs.append_file(&abs, output, &creds),
    };
    result.map_err(CommandError::from)
}
