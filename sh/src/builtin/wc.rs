//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{read_file_arg, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::ExecResult;
use crate::shell::Shell;

pub struct Wc;

static WC_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("lines", 'l'),
    FlagSpec::boolean("words", 'w'),
    FlagSpec::boolean("bytes", 'c'),
];

static WC_SPEC: CommandSpec = CommandSpec {
    name: "wc",
    summary: "print line, word, and byte counts",
    usage: "wc [-l] [-w] [-c] [file...]",
    flags: WC_FLAGS,
    root_required: false,
};

struct Counts {
    lines: usize,
    words: usize,
    bytes: usize,
}

fn count(content: &str) -> Counts {
    Counts {
        lines: content.lines().count(),
        words: content.split_whitespace().count(),
        bytes: content.len(),
    }
}

fn render(counts: &Counts, show: (bool, bool, bool), label: Option<&str>) -> String {
    let mut fields = Vec::new();
    if show.0 {
        fields.push(format!("{:>7}", counts.lines));
    }
    if show.1 {
        fields.push(format!("{:>7}", counts.words));
    }
    if show.2 {
        fields.push(format!("{:>7}", counts.bytes));
    }
    let mut line = fields.join(" ");
    if let Some(label) = label {
        line.push(' ');
        line.push_str(label);
    }
    line
}

impl BuiltinUtility for Wc {
    fn spec(&self) -> &'static CommandSpec {
        &WC_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let any = inv.flags.is_set("lines") || inv.flags.is_set("words") || inv.flags.is_set("bytes");
        let show = if any {
            (
                inv.flags.is_set("lines"),
                inv.flags.is_set("words"),
                inv.flags.is_set("bytes"),
            )
        } else {
            (true, true, true)
        };
        if inv.args.is_empty() {
            let counts = count(&inv.stdin);
            return Ok(render(&counts, show, None).into());
        }
        let mut lines = Vec::new();
        let mut total = Counts {
            lines: 0,
            words: 0,
            bytes: 0,
        };
        for arg in &inv.args {
            let content = read_file_arg(shell, arg)?;
            let counts = count(&content);
            total.lines += counts.lines;
            total.words += counts.words;
            total.bytes += counts.bytes;
            lines.push(render(&counts, show, Some(arg)));
        }
        if inv.args.len() > 1 {
            lines.push(render(&total, show, Some("total")));
        }
        Ok(lines.join("\n").into())
    }
}
