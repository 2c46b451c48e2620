//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{read_inputs, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::ExecResult;
use crate::shell::Shell;
use std::cmp::Ordering;

pub struct Sort;

static SORT_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("reverse", 'r'),
    FlagSpec::boolean("numeric", 'n'),
    FlagSpec::boolean("unique", 'u'),
];

static SORT_SPEC: CommandSpec = CommandSpec {
    name: "sort",
    summary: "sort lines of text",
    usage: "sort [-r] [-n] [-u] [file...]",
    flags: SORT_FLAGS,
    root_required: false,
};

fn numeric_compare(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| s.trim().parse::<f64>().unwrap_or(0.0);
    parse(a).partial_cmp(&parse(b)).unwrap_or(Ordering::Equal)
}

impl BuiltinUtility for Sort {
    fn spec(&self) -> &'static CommandSpec {
        &SORT_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let content = read_inputs(&inv.args, &inv.stdin, shell)?;
        let mut lines: Vec<&str> = content.lines().collect();
        if inv.flags.is_set("numeric") {
            lines.sort_by(|a, b| numeric_compare(a, b));
        } else {
            lines.sort_unstable();
        }
        if inv.flags.is_set("unique") {
            lines.dedup();
        }
        if inv.flags.is_set("reverse") {
            lines.reverse();
        }
        Ok(lines.join("\n").into())
    }
}

pub struct Uniq;

static UNIQ_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("count", 'c'),
    FlagSpec::boolean("repeated", 'd'),
];

static UNIQ_SPEC: CommandSpec = CommandSpec {
    name: "uniq",
    summary: "filter adjacent repeated lines",
    usage: "uniq [-c] [-d] [file...]",
    flags: UNIQ_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Uniq {
    fn spec(&self) -> &'static CommandSpec {
        &UNIQ_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let content = read_inputs(&inv.args, &inv.stdin, shell)?;
        let mut groups: Vec<(usize, &str)> = Vec::new();
        for line in content.lines() {
            match groups.last_mut() {
                Some((count, prev)) if *prev == line => *count += 1,
                _ => groups.push((1, line)),
            }
        }
        let lines: Vec<String> = groups
            .into_iter()
            .filter(|(count, _)| !inv.flags.is_set("repeated") || *count > 1)
            .map(|(count, line)| {
                if inv.flags.is_set("count") {
                    format!("{count:>7} {line}")
                } else {
                    line.to_string()
                }
            })
            .collect();
        Ok(lines.join("\n").into())
    }
}
