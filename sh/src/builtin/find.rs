//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{child_path, BuiltinUtility, Invocation};
use crate::flags::CommandSpec;
use crate::result::{CommandError, ErrorKind, ExecResult};
use crate::shell::Shell;
use regex::Regex;
use vfs::{path, Node};

pub struct Find;

// find's -name/-type are classic single-dash predicates, parsed by the
// command itself rather than the schema
static FIND_SPEC: CommandSpec = CommandSpec {
    name: "find",
    summary: "search for files in a directory hierarchy",
    usage: "find [path] [-name pattern] [-type f|d]",
    flags: &[],
    root_required: false,
};

fn glob_to_regex(pattern: &str) -> Result<Regex, CommandError> {
    let mut regex = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            c if "\\.+()[]{}^$|".contains(c) => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex.push('$');
    Regex::new(&regex)
        .map_err(|err| CommandError::failed(format!("find: bad pattern '{pattern}': {err}")))
}

struct Predicates {
    name: Option<Regex>,
    node_type: Option<char>,
}

impl Predicates {
    fn matches(&self, name: &str, node: &Node) -> bool {
        if let Some(regex) = &self.name {
            if !regex.is_match(name) {
                return false;
            }
        }
        match self.node_type {
            Some('f') => !node.is_directory(),
            Some('d') => node.is_directory(),
            _ => true,
        }
    }
}

fn walk(node: &Node, abs: &str, predicates: &Predicates, out: &mut Vec<String>) {
    if predicates.matches(path::basename(abs), node) {
        out.push(abs.to_string());
    }
    if let Some(dir) = node.as_directory() {
        for (name, child) in &dir.children {
            walk(child, &child_path(abs, name), predicates, out);
        }
    }
}

impl BuiltinUtility for Find {
    fn spec(&self) -> &'static CommandSpec {
        &FIND_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let mut start = ".".to_string();
        let mut name_pattern = None;
        let mut node_type = None;
        let mut iter = inv.args.iter().peekable();
        if let Some(first) = iter.peek() {
            if !first.starts_with('-') {
                start = iter.next().unwrap().clone();
            }
        }
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-name" => {
                    let pattern = iter.next().ok_or_else(|| {
                        CommandError::failed("find: -name requires a pattern")
                    })?;
                    name_pattern = Some(glob_to_regex(pattern)?);
                }
                "-type" => {
                    let kind = iter.next().ok_or_else(|| {
                        CommandError::failed("find: -type requires 'f' or 'd'")
                    })?;
                    match kind.as_str() {
                        "f" | "d" => node_type = Some(kind.chars().next().unwrap()),
                        other => {
                            return Err(CommandError::failed(format!(
                                "find: invalid type '{other}'"
                            )));
                        }
                    }
                }
                other => {
                    return Err(CommandError::failed(format!(
                        "find: unknown predicate '{other}'"
                    )));
                }
            }
        }

        let abs = shell.resolve_path(&start);
        let node = shell.vfs.get_node(&abs).ok_or_else(|| {
            CommandError::new(
                ErrorKind::NotFound,
                format!("find: {start}: no such file or directory"),
            )
        })?;
        let predicates = Predicates {
            name: name_pattern,
            node_type,
        };
        let mut matches = Vec::new();
        walk(node, &abs, &predicates, &mut matches);
        Ok(matches.join("\n").into())
    }
}
