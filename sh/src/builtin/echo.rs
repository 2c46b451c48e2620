//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec};
use crate::result::{CommandError, ExecResult};
use crate::shell::Shell;

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

pub struct Echo;

static ECHO_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("no_newline", 'n'),
    FlagSpec::boolean("escapes", 'e'),
];

static ECHO_SPEC: CommandSpec = CommandSpec {
    name: "echo",
    summary: "write arguments to standard output",
    usage: "echo [-n] [-e] [text...]",
    flags: ECHO_FLAGS,
    root_required: false,
};

impl BuiltinUtility for Echo {
    fn spec(&self) -> &'static CommandSpec {
        &ECHO_SPEC
    }

    fn exec(&self, inv: Invocation, _: &mut Shell) -> ExecResult {
        let joined = inv.args.join(" ");
        if inv.flags.is_set("escapes") {
            Ok(unescape(&joined).into())
        } else {
            Ok(joined.into())
        }
    }
}

pub struct Printf;

static PRINTF_SPEC: CommandSpec = CommandSpec {
    name: "printf",
    summary: "format and print arguments",
    usage: "printf format [argument...]",
    flags: &[],
    root_required: false,
};

impl BuiltinUtility for Printf {
    fn spec(&self) -> &'static CommandSpec {
        &PRINTF_SPEC
    }

    fn exec(&self, inv: Invocation, _: &mut Shell) -> ExecResult {
        let format = inv
            .args
            .first()
            .ok_or_else(|| CommandError::failed("printf: missing format operand"))?;
        let format = unescape(format);
        let mut values = inv.args[1..].iter();
        let mut out = String::new();
        let mut chars = format.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('s') => out.push_str(values.next().map(String::as_str).unwrap_or("")),
                Some('d') => {
                    let raw = values.next().map(String::as_str).unwrap_or("0");
                    let n: i64 = raw.parse().map_err(|_| {
                        CommandError::failed(format!("printf: '{raw}': not a number"))
                    })?;
                    out.push_str(&n.to_string());
                }
                Some('%') => out.push('%'),
                Some(other) => {
                    return Err(CommandError::failed(format!(
                        "printf: unsupported conversion '%{other}'"
                    )));
                }
                None => out.push('%'),
            }
        }
        Ok(out.into())
    }
}
