//
// Copyright (c) 2025 the vshell-rs authors
//
// This file is part of the vshell-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::builtin::{child_path, BuiltinUtility, Invocation};
use crate::flags::{CommandSpec, FlagSpec, Flags};
use crate::result::{CommandError, ErrorKind, ExecResult};
use crate::shell::Shell;
use vfs::{Node, Perm};

pub struct Ls;

static LS_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("long", 'l'),
    FlagSpec::boolean("all", 'a'),
    FlagSpec::boolean("recursive", 'R'),
    FlagSpec::boolean("directory", 'd'),
];

static LS_SPEC: CommandSpec = CommandSpec {
    name: "ls",
    summary: "list directory contents",
    usage: "ls [-l] [-a] [-R] [-d] [path...]",
    flags: LS_FLAGS,
    root_required: false,
};

fn entry_line(name: &str, node: &Node, long: bool) -> String {
    if !long {
        return name.to_string();
    }
    let meta = node.meta();
    let size = match node {
        Node::File(f) => f.content.len(),
        Node::Directory(d) => d.children.len(),
    };
    format!(
        "{} {:<8} {:<8} {:>8} {} {}",
        node.mode_string(),
        meta.owner,
        meta.group,
        size,
        meta.mtime,
        name
    )
}

fn list_directory(node: &Node, flags: &Flags, lines: &mut Vec<String>) {
    let dir = node.as_directory().expect("caller checked");
    for (name, child) in &dir.children {
        if !flags.is_set("all") && name.starts_with('.') {
            continue;
        }
        lines.push(entry_line(name, child, flags.is_set("long")));
    }
}

fn list_recursive(abs: &str, node: &Node, flags: &Flags, lines: &mut Vec<String>) {
    lines.push(format!("{abs}:"));
    list_directory(node, flags, lines);
    let dir = node.as_directory().expect("caller checked");
    for (name, child) in &dir.children {
        if !flags.is_set("all") && name.starts_with('.') {
            continue;
        }
        if child.is_directory() {
            lines.push(String::new());
            list_recursive(&child_path(abs, name), child, flags, lines);
        }
    }
}

impl BuiltinUtility for Ls {
    fn spec(&self) -> &'static CommandSpec {
        &LS_SPEC
    }

    fn exec(&self, inv: Invocation, shell: &mut Shell) -> ExecResult {
        let targets: Vec<String> = if inv.args.is_empty() {
            vec![".".to_string()]
        } else {
            inv.args.clone()
        };
        let creds = shell.credentials();
        let with_headers = targets.len() > 1;
        let mut lines = Vec::new();
        for (i, target) in targets.iter().enumerate() {
            let abs = shell.resolve_path(target);
            let node = shell.vfs.get_node(&abs).ok_or_else(|| {
                CommandError::new(
                    ErrorKind::NotFound,
                    format!("ls: {target}: no such file or directory"),
                )
            })?;
            if !node.is_directory() || inv.flags.is_set("directory") {
                lines.push(entry_line(target, node, inv.flags.is_set("long")));
                continue;
            }
            if !node.allows(&creds, Perm::Read) {
                return Err(CommandError::new(
                    ErrorKind::PermissionDenied,
                    format!("ls: {target}: permission denied"),
                ));
            }
            if inv.flags.is_set("recursive") {
                if i > 0 {
                    lines.push(String::new());
                }
                list_recursive(&abs, node, &inv.flags, &mut lines);
            } else {
                if with_headers {
                    if i > 0 {
                        lines.push(String::new());
                    }
                    lines.push(format!("{target}:"));
                }
                list_directory(node, &inv.flags, &mut lines);
            }
        }
        Ok(lines.join("\n").into())
    }
}
