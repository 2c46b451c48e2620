//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{all_builtins, get_builtin, BuiltinUtility, Invocation};
use crate::flags::CommandSpec;
use crate::result::{CommandError, ExecResult};
use crate::shell::Shell;
use std::fmt::Write;

pub struct Help;

static HELP_SPEC: CommandSpec = CommandSpec {
    name: "help",
    summary: "list commands or show detailed help",
    usage: "help [command...]",
    flags: &[],
    root_required: false,
};

fn format_detail(spec: &CommandSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "NAME");
    let _ = writeln!(out, "    {} - {}", spec.name, spec.summary);
    let _ = writeln!(out);
    let _ = writeln!(out, "USAGE");
    let _ = write!(out, "    {}", spec.usage);
    let visible: Vec<_> = spec.flags.iter().filter(|f| !f.hidden).collect();
    if !visible.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out);
        let _ = writeln!(out, "OPTIONS");
        for (i, flag) in visible.iter().enumerate() {
            let mut forms = Vec::new();
            if let Some(short) = flag.short {
                forms.push(format!("-{short}"));
            }
            if let Some(long) = flag.long {
                forms.push(format!("--{long}"));
            }
            let value = if flag.takes_value { " <value>" } else { "" };
            let _ = write!(out, "    {}{}", forms.join(", "), value);
            if i + 1 < visible.len() {
                let _ = writeln!(out);
            }
        }
    }
    out
}

impl BuiltinUtility for Help {
    fn spec(&self) -> &'static CommandSpec {
        &HELP_SPEC
    }

    fn exec(&self, inv: Invocation, _: &mut Shell) -> ExecResult {
        if inv.args.is_empty() {
            let mut specs: Vec<&CommandSpec> =
                all_builtins().iter().map(|b| b.spec()).collect();
            specs.sort_by_key(|spec| spec.name);
            let width = specs.iter().map(|s| s.name.len()).max().unwrap_or(0);
            let lines: Vec<String> = specs
                .iter()
                .map(|spec| format!("{:<width$}  {}", spec.name, spec.summary))
                .collect();
            return Ok(lines.join("\n").into());
        }
        let mut sections = Vec::new();
        for name in &inv.args {
            match get_builtin(name) {
                Some(builtin) => sections.push(format_detail(builtin.spec())),
                None => {
                    return Err(CommandError::failed(format!(
                        "help: no such command: {name}"
                    )));
                }
            }
        }
        Ok(sections.join("\n\n").into())
    }
}
