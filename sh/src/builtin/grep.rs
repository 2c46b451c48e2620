//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{collect_files, read_file_arg, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, ErrorKind, ExecResult};
use crate::shell::Shell;
use regex::RegexBuilder;

pub struct Grep;

static GREP_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("ignore_case", 'i'),
    FlagSpec::boolean("line_number", 'n'),
    FlagSpec::boolean("invert", 'v'),
    FlagSpec::boolean("count", 'c'),
    FlagSpec::boolean("recursive", 'r'),
];

static GREP_SPEC: CommandSpec = CommandSpec {
    name: "grep",
    summary: "print lines matching a pattern",
    usage: "grep [-i] [-n] [-v] [-c] [-r] pattern [path...]",
    flags: GREP_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Grep {
    fn spec(&self) -> &'static CommandSpec {
        &GREP_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let pattern = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("grep: missing pattern"))?;
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(inv.flags.is_set("ignore_case"))
            .build()
            .map_err(|err| CommandError::failed(format!("grep: invalid pattern: {err}")))?;

        // inputs: named files, every file under named dirs with -r, or stdin
        let mut inputs: Vec<(Option<String>, String)> = Vec::new();
        if inv.args.len() > 1 {
            for arg in &inv.args[1..] {
                let abs = shell.resolve_path(arg);
                let node = shell.vfs.get_node(&abs).ok_or_else(|| {
                    CommandError::new(
                        ErrorKind::NotFound,
                        format!("grep: {arg}: no such file or directory"),
                    )
                })?;
                if node.is_directory() {
                    if !inv.flags.is_set("recursive") {
                        return Err(CommandError::new(
                            ErrorKind::WrongType,
                            format!("grep: {arg}: is a directory"),
                        ));
                    }
                    let mut files = Vec::new();
                    collect_files(node, &abs, &mut files);
                    for file in files {
                        let content = read_file_arg(shell, &file)?;
                        inputs.push((Some(file), content));
                    }
                } else {
                    inputs.push((Some(abs.clone()), read_file_arg(shell, arg)?));
                }
            }
        } else {
            inputs.push((None, inv.stdin.clone()));
        }

        let label_lines = inputs.len() > 1;
        let invert = inv.flags.is_set("invert");
        let mut lines = Vec::new();
        let mut total = 0usize;
        for (label, content) in &inputs {
            let mut count = 0usize;
            for (number, line) in content.lines().enumerate() {
                if regex.is_match(line) == invert {
                    continue;
                }
                count += 1;
                if inv.flags.is_set("count") {
                    continue;
                }
                let mut rendered = String::new();
                if label_lines {
                    if let Some(label) = label {
                        rendered.push_str(label);
                        rendered.push(':');
                    }
                }
                if inv.flags.is_set("line_number") {
                    rendered.push_str(&(number + 1).to_string());
                    rendered.push(':');
                }
                rendered.push_str(line);
                lines.push(rendered);
            }
            if inv.flags.is_set("count") {
                match label {
                    Some(label) if label_lines => lines.push(format!("{label}:{count}")),
                    _ => lines.push(count.to_string()),
                }
            }
            total += count;
        }
        if total == 0 && !inv.flags.is_set("count") {
            // no matches: unsuccessful but not noisy, like grep's exit 1
            return Err(CommandError::silent());
        }
        Ok(lines.join("\n").into())
    }
}
